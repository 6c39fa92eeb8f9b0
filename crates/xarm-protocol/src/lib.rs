//! # xArm Protocol
//!
//! 控制器指令与状态码定义（无传输依赖）
//!
//! ## 模块
//!
//! - `status`: API 状态码与控制器返回码
//! - `state`: 机械臂运动状态
//! - `command`: 指令通道上的指令枚举
//! - `reply`: 指令回复 `(status, payload…)`
//!
//! 二进制线协议和物理传输不在本 crate 范围内，
//! 上层只通过 [`ArmCommand`] / [`Reply`] 与指令通道交互。

pub mod command;
pub mod reply;
pub mod state;
pub mod status;

// 重新导出常用类型
pub use command::*;
pub use reply::*;
pub use state::*;
pub use status::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: &'static str, value: i64 },

    #[error("Reply payload too short: expected {expected}, got {actual}")]
    ShortPayload { expected: usize, actual: usize },
}

/// 角度 → 弧度
#[inline]
pub fn to_radians(deg: f64) -> f64 {
    deg.to_radians()
}

/// 弧度 → 角度
#[inline]
pub fn to_degrees(rad: f64) -> f64 {
    rad.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::InvalidValue {
            field: "RobotMode",
            value: 9,
        };
        assert_eq!(err.to_string(), "Invalid value for field RobotMode: 9");

        let err = ProtocolError::ShortPayload {
            expected: 7,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Reply payload too short: expected 7, got 2"
        );
    }

    #[test]
    fn test_angle_conversion() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((to_degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }
}
