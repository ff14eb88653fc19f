use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskboard_domain::StatusFilter;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_FILTER_FILE: &str = ".taskboard-filter.toml";

#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    filter: StatusFilter,
}

/// 本地保存的过滤条件：启动时加载，切换时保存
#[derive(Debug, Clone)]
pub struct FilterPreference {
    path: PathBuf,
}

impl FilterPreference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在或内容无法识别时返回 `All`
    pub fn load(&self) -> StatusFilter {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "过滤条件文件不存在，使用默认值");
                return StatusFilter::All;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "读取过滤条件文件失败");
                return StatusFilter::All;
            }
        };

        match toml::from_str::<PreferenceFile>(&content) {
            Ok(file) => file.filter,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "过滤条件文件格式错误，使用默认值");
                StatusFilter::All
            }
        }
    }

    pub fn save(&self, filter: StatusFilter) -> ClientResult<()> {
        let content = toml::to_string(&PreferenceFile { filter })
            .map_err(|e| ClientError::Preference(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| {
            ClientError::Preference(format!("{}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), filter = %filter, "过滤条件已保存");
        Ok(())
    }
}

impl Default for FilterPreference {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_FILE)
    }
}
