//! # Taskboard Client
//!
//! 任务看板 REST API 的客户端：
//!
//! - [`TaskClient`] 负责 HTTP 调用
//! - [`TaskListStore`] 持有当前过滤条件和最近一次拉取的列表，每次修改后重新拉取
//! - [`BoardView`] 是文本界面的状态：创建表单、过滤标签、单个编辑会话
//! - [`FilterPreference`] 把过滤条件保存在本地文件里
//! - [`board`] 解析交互式看板的命令

pub mod api;
pub mod board;
pub mod error;
pub mod form;
pub mod preference;
pub mod store;
pub mod view;

pub use api::TaskClient;
pub use board::{Answer, BOARD_HELP};
pub use error::{ClientError, ClientResult};
pub use form::{EditSession, TaskForm, CREATE_FAILED, TITLE_REQUIRED};
pub use preference::{FilterPreference, DEFAULT_FILTER_FILE};
pub use store::{FetchTicket, TaskListStore};
pub use view::{AlwaysConfirm, BoardView, Confirm, DELETE_PROMPT, EMPTY_MESSAGE};
