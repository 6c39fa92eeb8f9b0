//! 机械臂运动状态

/// 机械臂运动状态（由控制器上报）
///
/// | 码值 | 状态 |
/// |------|------|
/// | 1 | 运动中 |
/// | 2 | 休眠 |
/// | 3 | 暂停 |
/// | 4 | 停止 |
/// | 5 | 错误/终止 |
/// | 其他 | 空闲 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RobotState {
    /// 空闲（默认）
    #[default]
    Idle = 0,
    /// 运动中
    Moving = 1,
    /// 休眠
    Sleeping = 2,
    /// 暂停
    Paused = 3,
    /// 停止
    Stopped = 4,
    /// 错误/终止
    Error = 5,
}

impl RobotState {
    /// 从控制器上报的状态码转换（未知值视为空闲）
    pub fn from_code(code: i64) -> Self {
        u8::try_from(code).map(Self::from).unwrap_or_default()
    }

    /// 转换为状态码
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_moving(self) -> bool {
        self == Self::Moving
    }

    pub fn is_paused(self) -> bool {
        self == Self::Paused
    }

    /// 是否为终止状态（停止或错误）
    ///
    /// 运动等待在该状态下立即退出。
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }
}

/// `set_state` 可下发的状态值
pub mod set_state {
    /// 开始运动
    pub const START: u8 = 0;
    /// 暂停
    pub const PAUSE: u8 = 3;
    /// 停止
    pub const STOP: u8 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_state_from_code() {
        assert_eq!(RobotState::from_code(1), RobotState::Moving);
        assert_eq!(RobotState::from_code(2), RobotState::Sleeping);
        assert_eq!(RobotState::from_code(3), RobotState::Paused);
        assert_eq!(RobotState::from_code(4), RobotState::Stopped);
        assert_eq!(RobotState::from_code(5), RobotState::Error);
        assert_eq!(RobotState::from_code(0), RobotState::Idle);
        // 未知值回退为空闲
        assert_eq!(RobotState::from_code(42), RobotState::Idle);
        assert_eq!(RobotState::from_code(-1), RobotState::Idle);
    }

    #[test]
    fn test_robot_state_predicates() {
        assert!(RobotState::Moving.is_moving());
        assert!(RobotState::Paused.is_paused());
        assert!(RobotState::Stopped.is_terminal());
        assert!(RobotState::Error.is_terminal());
        assert!(!RobotState::Sleeping.is_terminal());
        assert_eq!(RobotState::Stopped.code(), set_state::STOP);
    }
}
