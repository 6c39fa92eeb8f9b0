//! 圆弧直线连续轨迹
//!
//! 路点之间以圆弧过渡，整条轨迹可以重复多次（或无限循环）。
//! 执行期间注册状态回调：控制器进入停止状态时置位急停标志，循环在下一个路点前退出。

use crate::XArm;
use crate::types::{ArcLinesOptions, ArcWaypoint, JointTarget, MoveOptions, PoseTarget, ServoTarget};
use crate::wait::MotionWait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use xarm_protocol::{ApiCode, RobotState, Status};

/// 自动校准时回到起始关节姿态的速度 rad/s（50°/s）
pub const CALIBRATION_JOINT_SPEED: f64 = 0.872_664_6;

enum Pass {
    Done,
    Aborted,
    Failed(Status),
}

impl XArm {
    /// 执行圆弧直线轨迹
    ///
    /// # 返回
    ///
    /// - `NORMAL`：全部轮次完成
    /// - `HAS_ERROR`：控制器报错中止
    /// - `EMERGENCY_STOP`：急停或控制器进入停止状态
    /// - 其他负值：某条运动指令失败时的返回码
    pub fn move_arc_lines(&mut self, paths: &[ArcWaypoint], opts: &ArcLinesOptions) -> Status {
        if let Err(code) = self.check_motion() {
            return code;
        }
        let Some(first) = paths.first() else {
            return ApiCode::ApiException.code();
        };
        let is_radian = self.default_radian(opts.is_radian);
        let speed = opts.speed.unwrap_or(self.staged.tcp_speed);
        let mvacc = opts.mvacc.unwrap_or(self.staged.tcp_acc);
        let mvtime = opts.mvtime.unwrap_or(0.0);
        let line_opts = MoveOptions::new()
            .radian(is_radian)
            .speed(speed)
            .mvacc(mvacc)
            .mvtime(mvtime);

        info!("move_arc_lines: begin, paths={}, times={}", paths.len(), opts.times);
        let start_angles = if opts.automatic_calibration {
            let code = self.set_position(&PoseTarget::from_pose(first.pose), &line_opts.clone().wait(true));
            if code < 0 {
                error!("move_arc_lines: quit, calibration move failed, ret={}", code);
                return code;
            }
            let (_, angles) = self.get_servo_angle(Some(true));
            Some(angles)
        } else {
            None
        };

        self.set_pause_time(opts.first_pause_time, false);
        self.clear_stop();
        // 队列等待会清除急停标志，停止状态另记一份
        let halted = Arc::new(AtomicBool::new(false));
        let hook = {
            let stop = self.stop.clone();
            let halted = halted.clone();
            self.live.register_callback(Arc::new(move |state: RobotState| {
                if state == RobotState::Stopped {
                    halted.store(true, Ordering::SeqCst);
                    stop.store(true, Ordering::SeqCst);
                }
            }))
        };

        let result = self.run_arc_loops(paths, start_angles.as_deref(), &line_opts, opts, &halted);
        self.live.release_callback(hook);
        info!("move_arc_lines: end, ret={}", result);

        if opts.wait {
            MotionWait::new(None, self.wait_config).run(&*self);
        }
        self.clear_stop();
        result
    }

    fn run_arc_loops(
        &mut self,
        paths: &[ArcWaypoint],
        start_angles: Option<&[f64]>,
        line_opts: &MoveOptions,
        opts: &ArcLinesOptions,
        halted: &AtomicBool,
    ) -> Status {
        let mut finished = 0u32;
        while opts.times == 0 || finished < opts.times {
            if self.arc_aborted(halted) {
                break;
            }
            match self.arc_pass(paths, start_angles, line_opts, halted) {
                Pass::Done => {},
                Pass::Aborted => break,
                Pass::Failed(code) => {
                    error!("move_arc_lines: quit, api failed, ret={}", code);
                    return code;
                },
            }
            finished += 1;
            self.set_pause_time(opts.repeat_pause_time, false);
        }

        if self.has_error() {
            error!("move_arc_lines: quit, controller error");
            ApiCode::HasError.code()
        } else if self.is_stop_requested() || halted.load(Ordering::SeqCst) {
            error!("move_arc_lines: quit, emergency stop");
            ApiCode::EmergencyStop.code()
        } else {
            ApiCode::Normal.code()
        }
    }

    fn arc_aborted(&self, halted: &AtomicBool) -> bool {
        self.has_error() || self.is_stop_requested() || halted.load(Ordering::SeqCst)
    }

    fn arc_pass(
        &mut self,
        paths: &[ArcWaypoint],
        start_angles: Option<&[f64]>,
        line_opts: &MoveOptions,
        halted: &AtomicBool,
    ) -> Pass {
        if let Some(angles) = start_angles {
            let joint_speed = self.staged.joint_speed;
            let target = ServoTarget::All(JointTarget::from_angles(angles));
            let code = self.set_servo_angle(
                &target,
                &MoveOptions::new().radian(true).speed(CALIBRATION_JOINT_SPEED),
            );
            if code < 0 {
                return Pass::Failed(code);
            }
            self.staged.joint_speed = joint_speed;
        }

        for waypoint in paths {
            if self.arc_aborted(halted) {
                return Pass::Aborted;
            }
            let radius = waypoint.radius.filter(|r| *r >= 0.0).unwrap_or(0.0);
            let code = self.set_position(
                &PoseTarget::from_pose(waypoint.pose),
                &line_opts.clone().radius(radius),
            );
            if code < 0 {
                return Pass::Failed(code);
            }
        }
        Pass::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xarm_driver::mock::MockChannel;
    use xarm_driver::{LiveState, LiveStateStore};
    use xarm_protocol::{ArmCommand, Reply};

    fn setup() -> (XArm, Arc<MockChannel>) {
        let store = Arc::new(LiveStateStore::new(LiveState::ready()));
        let channel = Arc::new(MockChannel::new(store.clone()));
        (XArm::new(channel.clone(), store), channel)
    }

    fn square() -> Vec<ArcWaypoint> {
        vec![
            [300.0, 0.0, 150.0, 180.0, 0.0, 0.0, 20.0].into(),
            [300.0, 200.0, 150.0, 180.0, 0.0, 0.0].into(),
            [500.0, 200.0, 150.0, 180.0, 0.0, 0.0, -1.0].into(),
        ]
    }

    #[test]
    fn test_runs_requested_times() {
        let (mut arm, channel) = setup();
        let opts = ArcLinesOptions {
            times: 2,
            automatic_calibration: false,
            ..ArcLinesOptions::default()
        };
        assert_eq!(arm.move_arc_lines(&square(), &opts), 0);
        assert_eq!(channel.count("move_lineb"), 6);
        // 初始暂停 + 每轮之后的暂停
        assert_eq!(channel.count("sleep_instruction"), 3);
        // 回调已注销
        assert!(!arm.is_stop_requested());
    }

    #[test]
    fn test_waypoint_radius_defaults_to_zero() {
        let (mut arm, channel) = setup();
        let opts = ArcLinesOptions {
            automatic_calibration: false,
            ..ArcLinesOptions::default()
        };
        arm.move_arc_lines(&square(), &opts);
        let radii: Vec<f64> = channel
            .commands()
            .iter()
            .filter_map(|c| match c {
                ArmCommand::MoveLineB { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![20.0, 0.0, 0.0]);
    }

    #[test]
    fn test_calibration_moves_first() {
        let (mut arm, channel) = setup();
        arm.move_arc_lines(&square(), &ArcLinesOptions::default());
        let names: Vec<&str> = channel.commands().iter().map(|c| c.name()).collect();
        let first_line = names.iter().position(|n| *n == "move_line").unwrap();
        let joint = names.iter().position(|n| *n == "move_joint").unwrap();
        assert!(first_line < joint);
        // 校准关节速度不残留到暂存值
        assert_eq!(arm.staged().joint_speed(), crate::staging::DEFAULT_JOINT_SPEED);
    }

    #[test]
    fn test_failed_move_returns_code() {
        let (mut arm, channel) = setup();
        channel.push_reply("move_lineb", Reply::status(-8));
        let opts = ArcLinesOptions {
            automatic_calibration: false,
            ..ArcLinesOptions::default()
        };
        assert_eq!(arm.move_arc_lines(&square(), &opts), -8);
        assert_eq!(channel.count("move_lineb"), 1);
    }

    #[test]
    fn test_controller_error_stops_loop() {
        let (mut arm, channel) = setup();
        channel.live().update(|s| s.error_code = 31);
        let opts = ArcLinesOptions {
            times: 0,
            automatic_calibration: false,
            ..ArcLinesOptions::default()
        };
        // 有错误时运动前置条件仍满足（已就绪），循环立即退出
        assert_eq!(arm.move_arc_lines(&square(), &opts), 1);
        assert_eq!(channel.count("move_lineb"), 0);
    }

    #[test]
    fn test_stopped_state_aborts_infinite_loop() {
        let (mut arm, channel) = setup();
        let live = channel.live().clone();
        let opts = ArcLinesOptions {
            times: 0,
            automatic_calibration: false,
            ..ArcLinesOptions::default()
        };
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            live.update(|s| s.state = RobotState::Stopped);
        });
        assert_eq!(arm.move_arc_lines(&square(), &opts), -9);
        handle.join().unwrap();
    }

    #[test]
    fn test_empty_paths() {
        let (mut arm, _) = setup();
        assert_eq!(arm.move_arc_lines(&[], &ArcLinesOptions::default()), -3);
    }
}
