//! 控制层错误类型
//!
//! 只在内部流转，公共接口一律在边界处转换为状态码。

use std::path::PathBuf;
use thiserror::Error;
use xarm_protocol::{ApiCode, Status};

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The conversion is incomplete: {0}")]
    Convert(String),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ControlError {
    /// 对外的状态码
    pub fn status(&self) -> Status {
        match self {
            ControlError::Convert(_) => ApiCode::ConvertFailed.code(),
            _ => ApiCode::ApiException.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ControlError::Convert("loop block".into()).status(), -11);
        assert_eq!(ControlError::NotFound(PathBuf::from("a.gcode")).status(), -3);
    }

    #[test]
    fn test_display() {
        let err = ControlError::NotFound(PathBuf::from("/tmp/a.gcode"));
        assert_eq!(err.to_string(), "File not found: /tmp/a.gcode");
    }
}
