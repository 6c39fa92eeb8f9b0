//! 调用前置条件
//!
//! 失败时返回对应的负状态码，由调用方原样返回给用户。

use xarm_driver::LiveState;
use xarm_protocol::{ApiCode, Status};

/// 指令通道已连接
pub fn require_connected(live: &LiveState) -> Result<(), Status> {
    if live.connected {
        Ok(())
    } else {
        Err(ApiCode::NotConnected.code())
    }
}

/// 已连接且已就绪
pub fn require_ready(live: &LiveState) -> Result<(), Status> {
    require_connected(live)?;
    if live.ready {
        Ok(())
    } else {
        Err(ApiCode::NotReady.code())
    }
}

/// 不处于暂停状态（`enabled == false` 时跳过检查）
///
/// 暂停中的控制器不接收新运动，直接拒绝而不是阻塞等待恢复。
pub fn require_not_paused(live: &LiveState, enabled: bool) -> Result<(), Status> {
    if enabled && live.state.is_paused() {
        Err(ApiCode::NotReady.code())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xarm_protocol::RobotState;

    #[test]
    fn test_connected_check_comes_first() {
        let live = LiveState::default();
        assert_eq!(require_ready(&live), Err(-1));

        let live = LiveState {
            connected: true,
            ..LiveState::default()
        };
        assert_eq!(require_connected(&live), Ok(()));
        assert_eq!(require_ready(&live), Err(-2));
        assert_eq!(require_ready(&LiveState::ready()), Ok(()));
    }

    #[test]
    fn test_paused_state_is_not_ready() {
        let live = LiveState {
            state: RobotState::Paused,
            ..LiveState::ready()
        };
        assert_eq!(require_not_paused(&live, true), Err(-2));
        assert_eq!(require_not_paused(&live, false), Ok(()));
        assert_eq!(require_not_paused(&LiveState::ready(), true), Ok(()));
    }
}
