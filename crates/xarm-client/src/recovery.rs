//! 急停与复位
//!
//! [`StopHandle`] 可以克隆到其他线程，在运动等待/队列等待阻塞时触发急停。

use crate::XArm;
use crate::types::MoveOptions;
use crate::wait::PauseWindow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use xarm_driver::{CommandChannel, LiveStateStore};
use xarm_protocol::{ApiCode, ArmCommand, RobotState, Status, controller, set_state};

/// 等待控制器确认停止的最长时间
pub const EMERGENCY_STOP_TIMEOUT: Duration = Duration::from_secs(3);
/// 重发停止指令的间隔
pub const EMERGENCY_STOP_RETRY: Duration = Duration::from_millis(100);

/// 急停句柄
///
/// 与 [`XArm`] 共享急停标志和暂停窗口。
#[derive(Clone)]
pub struct StopHandle {
    channel: Arc<dyn CommandChannel>,
    live: Arc<LiveStateStore>,
    stop: Arc<AtomicBool>,
    pause: Arc<PauseWindow>,
}

impl StopHandle {
    /// 急停
    ///
    /// 每 100ms 重发停止指令，直到控制器进入停止状态或 3s 超时；
    /// 之后置位急停标志（中断所有等待）并清空暂停窗口。
    ///
    /// # 返回
    ///
    /// 确认停止返回 `NORMAL`；通道失败返回对应负状态码；未确认返回超时码。
    pub fn emergency_stop(&self) -> Status {
        info!("emergency_stop: begin");
        let deadline = Instant::now() + EMERGENCY_STOP_TIMEOUT;
        let mut code = self.send_stop();
        while self.live.robot_state() != RobotState::Stopped && Instant::now() < deadline {
            thread::sleep(EMERGENCY_STOP_RETRY);
            code = self.send_stop();
        }
        self.stop.store(true, Ordering::SeqCst);
        self.pause.clear();

        if self.live.robot_state() == RobotState::Stopped {
            info!("emergency_stop: end");
            ApiCode::Normal.code()
        } else {
            warn!("emergency_stop: stop state not confirmed within {:?}, ret={}", EMERGENCY_STOP_TIMEOUT, code);
            if code < 0 { code } else { controller::ERR_TOUT }
        }
    }

    /// 下发一次停止指令并刷新状态
    fn send_stop(&self) -> Status {
        let code = match self.channel.execute(&ArmCommand::SetState {
            state: set_state::STOP,
        }) {
            Ok(reply) => reply.code,
            Err(e) => return e.status(),
        };
        if let Ok(reply) = self.channel.execute(&ArmCommand::GetState) {
            if let (true, Some(value)) = (reply.is_accepted(), reply.value(0)) {
                let state = RobotState::from_code(value as i64);
                if state != self.live.robot_state() {
                    self.live.update(|s| s.state = state);
                }
            }
        }
        code
    }

    /// 急停标志是否置位
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

impl XArm {
    /// 获取可跨线程使用的急停句柄
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            channel: self.channel.clone(),
            live: self.live.clone(),
            stop: self.stop.clone(),
            pause: self.pause.clone(),
        }
    }

    /// 急停，并用控制器实际位置覆盖暂存目标
    pub fn emergency_stop(&mut self) -> Status {
        let code = self.stop_handle().emergency_stop();
        if self.is_connected() {
            let _ = self.sync_staged();
        }
        code
    }

    /// 复位：清除警告/错误、重新使能，然后回零
    ///
    /// 没有上报流（或不是网络通道）时先主动查询错误码和状态。
    pub fn reset(&mut self, opts: &MoveOptions) -> Status {
        info!("reset: begin");
        if !self.live.snapshot().reporting || !self.channel.is_socket() {
            let _ = self.get_err_warn_code();
            let _ = self.get_state();
        }

        let live = self.live.snapshot();
        if live.has_warn() {
            self.clean_warn();
        }
        if live.has_error() {
            self.clean_error();
            self.motion_enable(true, None);
            self.set_state(set_state::START);
        }
        if !self.live.ready() {
            self.motion_enable(true, None);
            self.set_state(set_state::START);
        }

        let code = self.move_gohome(opts);
        info!("reset: end, ret={}", code);
        code
    }
}
