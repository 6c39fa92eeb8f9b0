//! API 状态码
//!
//! 所有公开操作返回一个 `i32` 状态码（[`Status`]）：
//! - `0`：正常
//! - 正数：控制器上报的错误/警告分类（例如 1 = 有错误，2 = 有警告）
//! - 负数：本地 API 状态（未连接、未就绪、超限……）

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 状态码类型别名
///
/// 与控制器状态码保持同一取值空间，便于直接透传通道返回值。
pub type Status = i32;

/// 本地 API 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ApiCode {
    /// 已断开或未连接
    NotConnected = -1,
    /// 未使能或者未设置状态
    NotReady = -2,
    /// 接口异常（脚本/插件执行失败等）
    ApiException = -3,
    /// 命令不存在
    CmdNotExist = -4,
    /// 笛卡尔限位
    TcpLimit = -6,
    /// 关节角度限位
    JointLimit = -7,
    /// 超出范围
    OutOfRange = -8,
    /// 紧急停止
    EmergencyStop = -9,
    /// 不存在此 ID 的关节
    ServoNotExist = -10,
    /// 可视化程序转换失败
    ConvertFailed = -11,
    /// 正常
    Normal = 0,
    /// 有尚未清除的错误
    HasError = 1,
    /// 有尚未清除的警告
    HasWarn = 2,
}

impl ApiCode {
    /// 转换为原始状态码
    #[inline]
    pub fn code(self) -> Status {
        self.into()
    }

    /// 从原始状态码解析
    pub fn from_code(code: Status) -> Result<Self, ProtocolError> {
        Self::try_from(code).map_err(|_| ProtocolError::InvalidValue {
            field: "ApiCode",
            value: code as i64,
        })
    }

    /// 是否为本地失败状态（负数）
    pub fn is_failure(self) -> bool {
        self.code() < 0
    }
}

/// 控制器回复码分类
///
/// 控制器在返回码中用 1/2 表示"指令已接收，但存在错误/警告"，
/// 这两种情况下指令仍然进入了运动队列。
pub mod controller {
    use super::Status;

    /// 控制器存在错误
    pub const ERR_CODE: Status = 1;
    /// 控制器存在警告
    pub const WAR_CODE: Status = 2;
    /// 回复超时
    pub const ERR_TOUT: Status = 3;
    /// 写数据异常（连接不可用）
    pub const ERR_NOTTCP: Status = 8;
    /// 其他错误
    pub const ERR_OTHER: Status = 11;

    /// 指令是否已被控制器接收（正常、警告或错误但已入队）
    #[inline]
    pub fn is_accepted(code: Status) -> bool {
        code == 0 || code == ERR_CODE || code == WAR_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_code_values() {
        assert_eq!(ApiCode::Normal.code(), 0);
        assert_eq!(ApiCode::NotConnected.code(), -1);
        assert_eq!(ApiCode::NotReady.code(), -2);
        assert_eq!(ApiCode::ApiException.code(), -3);
        assert_eq!(ApiCode::CmdNotExist.code(), -4);
        assert_eq!(ApiCode::TcpLimit.code(), -6);
        assert_eq!(ApiCode::JointLimit.code(), -7);
        assert_eq!(ApiCode::OutOfRange.code(), -8);
        assert_eq!(ApiCode::EmergencyStop.code(), -9);
        assert_eq!(ApiCode::ServoNotExist.code(), -10);
        assert_eq!(ApiCode::ConvertFailed.code(), -11);
        assert_eq!(ApiCode::HasError.code(), 1);
        assert_eq!(ApiCode::HasWarn.code(), 2);
    }

    #[test]
    fn test_api_code_from_code() {
        assert_eq!(ApiCode::from_code(-8), Ok(ApiCode::OutOfRange));
        assert_eq!(ApiCode::from_code(0), Ok(ApiCode::Normal));
        // -5 没有定义
        assert!(ApiCode::from_code(-5).is_err());
        assert!(ApiCode::from_code(100).is_err());
    }

    #[test]
    fn test_failure_classification() {
        assert!(ApiCode::OutOfRange.is_failure());
        assert!(ApiCode::CmdNotExist.is_failure());
        assert!(!ApiCode::Normal.is_failure());
        assert!(!ApiCode::HasWarn.is_failure());
    }

    #[test]
    fn test_controller_accepted() {
        assert!(controller::is_accepted(0));
        assert!(controller::is_accepted(controller::ERR_CODE));
        assert!(controller::is_accepted(controller::WAR_CODE));
        assert!(!controller::is_accepted(3));
        assert!(!controller::is_accepted(-1));
    }
}
