//! 驱动层错误类型定义

use thiserror::Error;
use xarm_protocol::{ApiCode, Status, controller};

/// 驱动层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// 指令通道已关闭（连接断开）
    #[error("Command channel closed")]
    ChannelClosed,

    /// 等待回复超时
    #[error("Reply timeout")]
    Timeout,

    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(String),

    /// 通道不支持该指令
    #[error("Unsupported command: {0}")]
    Unsupported(&'static str),
}

impl DriverError {
    /// 转换为状态码
    ///
    /// 通道层失败统一折算为状态码返回给调用方，不向上抛出。
    pub fn status(&self) -> Status {
        match self {
            Self::ChannelClosed => ApiCode::NotConnected.code(),
            Self::Timeout => controller::ERR_TOUT,
            Self::Transport(_) => controller::ERR_NOTTCP,
            Self::Unsupported(_) => controller::ERR_OTHER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DriverError;

    /// 测试 DriverError 的 Display 实现
    #[test]
    fn test_driver_error_display() {
        assert_eq!(DriverError::ChannelClosed.to_string(), "Command channel closed");
        assert_eq!(DriverError::Timeout.to_string(), "Reply timeout");
        assert_eq!(
            DriverError::Transport("broken pipe".into()).to_string(),
            "Transport error: broken pipe"
        );
        assert_eq!(
            DriverError::Unsupported("get_ik").to_string(),
            "Unsupported command: get_ik"
        );
    }

    #[test]
    fn test_driver_error_status() {
        assert_eq!(DriverError::ChannelClosed.status(), -1);
        assert_eq!(DriverError::Timeout.status(), 3);
        assert_eq!(DriverError::Transport(String::new()).status(), 8);
        assert_eq!(DriverError::Unsupported("x").status(), 11);
    }
}
