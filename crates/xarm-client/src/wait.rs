//! 运动等待
//!
//! 阻塞直到机械臂稳定停止，或者发生以下任一情况：
//! - 急停请求
//! - 连接断开
//! - 控制器报错
//! - 进入终止状态（停止/错误）
//! - 超时
//!
//! "停止"需要连续多次读到非运动状态才成立（debounce），
//! 避免指令刚下发、控制器还没开始运动时误判。
//! 暂停窗口内或控制器暂停时计数清零。

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use xarm_driver::LiveState;

/// 等待参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitConfig {
    /// 运动中的轮询间隔
    pub poll_interval: Duration,
    /// 暂停窗口/暂停状态下的轮询间隔
    pub pause_poll_interval: Duration,
    /// 连续 N 次读到非运动状态视为停止
    pub settle_count: u32,
    /// 计数每累加 N 次主动查询一次控制器状态
    pub requery_every: u32,
    /// 队列满时的轮询间隔
    pub queue_poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            pause_poll_interval: Duration::from_millis(20),
            settle_count: 10,
            requery_every: 4,
            queue_poll_interval: Duration::from_millis(100),
        }
    }
}

/// 暂停窗口
///
/// 控制器执行暂停指令期间状态不是"运动中"，等待逻辑不能把它当作停止。
/// 多次非阻塞暂停时截止时间累加。
#[derive(Debug, Default)]
pub struct PauseWindow {
    finish: Mutex<Option<Instant>>,
}

impl PauseWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 延长窗口 `seconds` 秒（窗口已过期则从现在开始计算）
    pub fn extend(&self, seconds: f64) {
        let Ok(duration) = Duration::try_from_secs_f64(seconds.max(0.0)) else {
            return;
        };
        let now = Instant::now();
        let mut finish = self.finish.lock();
        let base = match *finish {
            Some(t) if t > now => t,
            _ => now,
        };
        *finish = Some(base + duration);
    }

    /// 剩余时间（无窗口时为 0）
    pub fn remaining(&self) -> Duration {
        self.finish
            .lock()
            .map_or(Duration::ZERO, |t| t.saturating_duration_since(Instant::now()))
    }

    pub fn is_active(&self) -> bool {
        !self.remaining().is_zero()
    }

    pub fn clear(&self) {
        *self.finish.lock() = None;
    }
}

/// 被等待的一方
pub trait WaitTarget {
    /// 当前实时状态
    fn live(&self) -> Arc<LiveState>;
    /// 是否有急停请求
    fn stop_requested(&self) -> bool;
    /// 暂停窗口
    fn pause_window(&self) -> &PauseWindow;
    /// 主动向控制器查询一次运动状态
    fn refresh_state(&self);
}

/// 等待结束原因（仅用于日志与测试，状态码由调用方根据标志位决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitExit {
    Settled,
    StopRequested,
    Disconnected,
    ControllerError,
    Terminated,
    TimedOut,
}

/// 一次运动等待
pub struct MotionWait {
    timeout: Option<Duration>,
    config: WaitConfig,
    timed_out: Arc<AtomicBool>,
}

impl MotionWait {
    /// `timeout` 为 `None` 或 0 表示不限时
    pub fn new(timeout: Option<Duration>, config: WaitConfig) -> Self {
        Self {
            timeout: timeout.filter(|t| !t.is_zero()),
            config,
            timed_out: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 超时标志
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }

    fn arm_timer(&self, timeout: Duration) -> Option<Instant> {
        let flag = self.timed_out.clone();
        let spawned = thread::Builder::new()
            .name("xarm-wait-timer".into())
            .spawn(move || {
                thread::sleep(timeout);
                flag.store(true, Ordering::Release);
            });
        match spawned {
            Ok(_) => None,
            Err(e) => {
                // 定时线程创建失败时退化为循环内检查截止时间
                warn!("Failed to spawn wait timer: {}", e);
                Some(Instant::now() + timeout)
            },
        }
    }

    /// 执行等待
    pub fn run<T: WaitTarget + ?Sized>(&self, target: &T) -> WaitExit {
        // 暂停窗口内的时间不计入超时
        let deadline = self
            .timeout
            .and_then(|t| self.arm_timer(t + target.pause_window().remaining()));

        let exit = self.poll(target, deadline);
        debug!(?exit, "motion wait finished");
        exit
    }

    fn poll<T: WaitTarget + ?Sized>(&self, target: &T, deadline: Option<Instant>) -> WaitExit {
        let mut count = 0u32;
        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                self.timed_out.store(true, Ordering::Release);
            }
            if self.timed_out() {
                return WaitExit::TimedOut;
            }
            if target.stop_requested() {
                return WaitExit::StopRequested;
            }

            let live = target.live();
            if !live.connected {
                return WaitExit::Disconnected;
            }
            if live.has_error() {
                return WaitExit::ControllerError;
            }
            if live.state.is_terminal() {
                target.pause_window().clear();
                return WaitExit::Terminated;
            }

            if target.pause_window().is_active() || live.state.is_paused() {
                count = 0;
                thread::sleep(self.config.pause_poll_interval);
                continue;
            }

            if live.state.is_moving() {
                count = 0;
            } else {
                count += 1;
                if count >= self.config.settle_count {
                    return WaitExit::Settled;
                }
                if self.config.requery_every > 0 && count % self.config.requery_every == 0 {
                    target.refresh_state();
                }
            }
            thread::sleep(self.config.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::RwLock;
    use std::sync::atomic::AtomicU32;
    use xarm_protocol::RobotState;

    struct FakeArm {
        live: RwLock<LiveState>,
        stop: AtomicBool,
        pause: PauseWindow,
        refreshes: AtomicU32,
    }

    impl FakeArm {
        fn new(state: RobotState) -> Self {
            Self {
                live: RwLock::new(LiveState {
                    state,
                    ..LiveState::ready()
                }),
                stop: AtomicBool::new(false),
                pause: PauseWindow::new(),
                refreshes: AtomicU32::new(0),
            }
        }
    }

    impl WaitTarget for FakeArm {
        fn live(&self) -> Arc<LiveState> {
            Arc::new(self.live.read().clone())
        }

        fn stop_requested(&self) -> bool {
            self.stop.load(Ordering::SeqCst)
        }

        fn pause_window(&self) -> &PauseWindow {
            &self.pause
        }

        fn refresh_state(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fast_config() -> WaitConfig {
        WaitConfig {
            poll_interval: Duration::from_millis(2),
            pause_poll_interval: Duration::from_millis(1),
            ..WaitConfig::default()
        }
    }

    #[test]
    fn test_settles_after_debounce() {
        let arm = FakeArm::new(RobotState::Idle);
        let wait = MotionWait::new(None, fast_config());
        assert_eq!(wait.run(&arm), WaitExit::Settled);
        // 计数到 4、8 时各查询一次
        assert_eq!(arm.refreshes.load(Ordering::SeqCst), 2);
        assert!(!wait.timed_out());
    }

    #[test]
    fn test_timeout_while_moving() {
        let arm = FakeArm::new(RobotState::Moving);
        let wait = MotionWait::new(Some(Duration::from_millis(200)), WaitConfig::default());
        let start = Instant::now();
        assert_eq!(wait.run(&arm), WaitExit::TimedOut);
        let elapsed = start.elapsed();
        assert!(wait.timed_out());
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(400), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let arm = FakeArm::new(RobotState::Idle);
        let wait = MotionWait::new(Some(Duration::ZERO), fast_config());
        assert_eq!(wait.run(&arm), WaitExit::Settled);
        assert!(!wait.timed_out());
    }

    #[test]
    fn test_exit_conditions() {
        let arm = FakeArm::new(RobotState::Moving);
        arm.stop.store(true, Ordering::SeqCst);
        assert_eq!(MotionWait::new(None, fast_config()).run(&arm), WaitExit::StopRequested);

        let arm = FakeArm::new(RobotState::Moving);
        arm.live.write().error_code = 22;
        assert_eq!(MotionWait::new(None, fast_config()).run(&arm), WaitExit::ControllerError);

        let arm = FakeArm::new(RobotState::Moving);
        arm.live.write().connected = false;
        assert_eq!(MotionWait::new(None, fast_config()).run(&arm), WaitExit::Disconnected);
    }

    #[test]
    fn test_terminal_state_clears_pause_window() {
        let arm = FakeArm::new(RobotState::Stopped);
        arm.pause.extend(10.0);
        assert_eq!(MotionWait::new(None, fast_config()).run(&arm), WaitExit::Terminated);
        assert!(!arm.pause.is_active());
    }

    #[test]
    fn test_pause_window_delays_settling() {
        let arm = FakeArm::new(RobotState::Idle);
        arm.pause.extend(0.1);
        let start = Instant::now();
        assert_eq!(MotionWait::new(None, fast_config()).run(&arm), WaitExit::Settled);
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_pause_window_extends_additively() {
        let pause = PauseWindow::new();
        assert_eq!(pause.remaining(), Duration::ZERO);
        pause.extend(1.0);
        pause.extend(1.0);
        assert!(pause.remaining() > Duration::from_millis(1900));
        pause.clear();
        assert!(!pause.is_active());
        // 负值/非法值不改变窗口
        pause.extend(-1.0);
        pause.extend(f64::NAN);
        assert!(!pause.is_active());
    }
}
