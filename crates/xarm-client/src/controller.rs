//! 控制器状态指令：使能、状态、模式、错误码、位置读取

use crate::XArm;
use crate::kinematics::pose_from_radians;
use xarm_protocol::{ArmCommand, Pose, RobotState, Status, controller, set_state};

/// 全部关节
pub const ALL_SERVOS: u8 = 8;

impl XArm {
    pub fn get_version(&self) -> (Status, String) {
        self.query_text(ArmCommand::GetVersion)
    }

    /// 关闭控制器系统
    pub fn shutdown_system(&self, value: i32) -> Status {
        self.send(ArmCommand::ShutdownSystem { value })
    }

    /// 使能/去使能关节，`servo_id` 为 `None` 时作用于全部关节
    pub fn motion_enable(&self, enable: bool, servo_id: Option<u8>) -> Status {
        let code = self.send(ArmCommand::MotionEnable {
            servo_id: servo_id.unwrap_or(ALL_SERVOS),
            enable,
        });
        let _ = self.get_state();
        code
    }

    /// 设置运动状态（0 运动、3 暂停、4 停止）
    ///
    /// 停止被接受时清空暂停窗口。
    pub fn set_state(&self, state: u8) -> Status {
        let code = self.send(ArmCommand::SetState { state });
        if state == set_state::STOP && controller::is_accepted(code) {
            self.pause.clear();
        }
        let _ = self.get_state();
        code
    }

    /// 查询运动状态并回写到实时状态
    pub fn get_state(&self) -> (Status, RobotState) {
        let (code, [value]) = self.query_array::<1>(ArmCommand::GetState);
        if !controller::is_accepted(code) {
            return (code, self.live.robot_state());
        }
        let state = RobotState::from_code(value as i64);
        if state != self.live.robot_state() {
            self.live.update(|s| s.state = state);
        }
        (code, state)
    }

    pub fn set_mode(&self, mode: u8) -> Status {
        self.send(ArmCommand::SetMode { mode })
    }

    /// 控制器队列中的指令数
    pub fn get_cmdnum(&self) -> (Status, u32) {
        let (code, [value]) = self.query_array::<1>(ArmCommand::GetCmdNum);
        if controller::is_accepted(code) {
            let cmd_num = value.max(0.0) as u32;
            self.live.update(|s| s.cmd_num = cmd_num);
            (code, cmd_num)
        } else {
            (code, self.live.snapshot().cmd_num)
        }
    }

    /// `[error_code, warn_code]`，同时回写到实时状态
    pub fn get_err_warn_code(&self) -> (Status, [i32; 2]) {
        let (code, [err, warn]) = self.query_array::<2>(ArmCommand::GetErrWarnCode);
        if controller::is_accepted(code) {
            let (err, warn) = (err as i32, warn as i32);
            self.live.update(|s| {
                s.error_code = err;
                s.warn_code = warn;
            });
            (code, [err, warn])
        } else {
            let live = self.live.snapshot();
            (code, [live.error_code, live.warn_code])
        }
    }

    pub fn clean_error(&self) -> Status {
        self.send(ArmCommand::CleanError)
    }

    pub fn clean_warn(&self) -> Status {
        self.send(ArmCommand::CleanWarn)
    }

    /// 松开关节抱闸（`None` 为全部关节）
    pub fn set_servo_attach(&self, servo_id: Option<u8>) -> Status {
        self.send(ArmCommand::SetBrake {
            servo_id: servo_id.unwrap_or(ALL_SERVOS),
            on: false,
        })
    }

    /// 关节抱闸（`None` 为全部关节）
    pub fn set_servo_detach(&self, servo_id: Option<u8>) -> Status {
        self.send(ArmCommand::SetBrake {
            servo_id: servo_id.unwrap_or(ALL_SERVOS),
            on: true,
        })
    }

    /// 当前笛卡尔位姿
    pub fn get_position(&self, is_radian: Option<bool>) -> (Status, Pose) {
        let (code, pose) = self.query_array::<6>(ArmCommand::GetPosition);
        (code, pose_from_radians(pose, self.default_radian(is_radian)))
    }

    /// 当前关节角（前 `axis` 个）
    pub fn get_servo_angle(&self, is_radian: Option<bool>) -> (Status, Vec<f64>) {
        let (code, angles) = self.query_array::<7>(ArmCommand::GetServoAngle);
        let is_radian = self.default_radian(is_radian);
        let angles = angles
            .iter()
            .take(self.settings.axis as usize)
            .map(|a| if is_radian { *a } else { a.to_degrees() })
            .collect();
        (code, angles)
    }

    /// 恢复出厂参数
    pub fn clean_conf(&self) -> Status {
        self.send(ArmCommand::CleanConf)
    }

    /// 保存当前参数
    pub fn save_conf(&self) -> Status {
        self.send(ArmCommand::SaveConf)
    }

    /// 用控制器当前位置覆盖暂存目标
    pub fn sync_staged(&mut self) -> Status {
        let (code, pose) = self.get_position(Some(true));
        if !controller::is_accepted(code) {
            return code;
        }
        let (code, angles) = self.get_servo_angle(Some(true));
        if !controller::is_accepted(code) {
            return code;
        }
        self.staged.sync_pose(pose);
        self.staged.sync_angles(&angles);
        code
    }
}
