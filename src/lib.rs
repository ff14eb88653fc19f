//! 任务看板服务：加载配置、连接数据库、运行 HTTP API，收到信号后优雅关闭

pub mod app;
pub mod shutdown;
