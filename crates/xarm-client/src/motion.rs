//! 运动指令
//!
//! 非流式指令的统一流程：
//! 1. 前置条件（已就绪、未暂停）
//! 2. 等待控制器队列有空位
//! 3. 暂存快照 → 合成目标、钳位速度 → 可选限位查询
//! 4. 下发，按需等待；被拒绝且未在运动时回滚暂存目标
//!
//! 流式指令（`set_servo_angle_j` / `set_servo_cartesian*`）只检查就绪状态，
//! 不排队、不暂存、不等待。

use crate::arm::{XArm, into_status};
use crate::guard;
use crate::normalize;
use crate::staging::{RestoreScope, StagedSnapshot};
use crate::types::{MoveOptions, PoseTarget, ServoTarget, coerce};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use xarm_protocol::{ApiCode, ArmCommand, Pose, Status};

fn flag(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}

impl XArm {
    // ==================== 暂存辅助 ====================

    fn stage_linear_rates(&mut self, opts: &MoveOptions) {
        let limits = self.limits.motion;
        let staged = &mut self.staged;
        staged.tcp_speed = normalize::linear_rate(staged.tcp_speed, opts.velocity(), limits.tcp_speed);
        staged.tcp_acc = normalize::linear_rate(staged.tcp_acc, opts.mvacc.as_ref(), limits.tcp_acc);
        staged.mvtime = normalize::move_time(staged.mvtime, opts.mvtime.as_ref());
    }

    fn stage_joint_rates(&mut self, opts: &MoveOptions, is_radian: bool) {
        let limits = self.limits.motion;
        let staged = &mut self.staged;
        staged.joint_speed =
            normalize::joint_rate(staged.joint_speed, opts.velocity(), is_radian, limits.joint_speed);
        staged.joint_acc =
            normalize::joint_rate(staged.joint_acc, opts.mvacc.as_ref(), is_radian, limits.joint_acc);
        staged.mvtime = normalize::move_time(staged.mvtime, opts.mvtime.as_ref());
    }

    /// 向控制器查询限位，命中时回滚并返回 `reject`
    fn reject_on_limit(
        &mut self,
        command: ArmCommand,
        reject: ApiCode,
        snapshot: &StagedSnapshot,
    ) -> Result<(), Status> {
        let (_, hit) = self.limit_query(&command);
        if hit == Some(true) {
            warn!("{} hit, motion rejected", command.name());
            self.staged.restore(snapshot);
            return Err(reject.code());
        }
        Ok(())
    }

    // ==================== 笛卡尔运动 ====================

    /// 直线运动到笛卡尔目标
    ///
    /// 缺省分量沿用暂存目标；`opts.radius` 非负时使用带圆弧过渡的直线运动。
    ///
    /// # 返回
    ///
    /// - 不等待：控制器返回码
    /// - 等待：`HAS_ERROR` / `HAS_WARN` / `NORMAL`
    /// - 本地拒绝：`NOT_CONNECTED` / `NOT_READY` / `OUT_OF_RANGE` / `TCP_LIMIT` / `EMERGENCY_STOP`
    pub fn set_position(&mut self, target: &PoseTarget, opts: &MoveOptions) -> Status {
        into_status(self.try_set_position(target, opts))
    }

    fn try_set_position(&mut self, target: &PoseTarget, opts: &MoveOptions) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::Position);
        let is_radian = self.default_radian(opts.is_radian);

        let (guard, staged) = self.guard_and_staging();
        if let Err(code) =
            normalize::compose_pose(&mut staged.pose, target, opts.relative, is_radian, &guard)
        {
            staged.restore(&snapshot);
            return Err(code);
        }
        self.stage_linear_rates(opts);

        if opts.check {
            let pose = self.staged.pose;
            self.reject_on_limit(ArmCommand::IsTcpLimit { pose }, ApiCode::TcpLimit, &snapshot)?;
        }

        let s = &self.staged;
        let command = match opts.radius.filter(|r| *r >= 0.0) {
            Some(radius) => ArmCommand::MoveLineB {
                pose: s.pose,
                speed: s.tcp_speed,
                acc: s.tcp_acc,
                mvtime: s.mvtime,
                radius,
            },
            None => ArmCommand::MoveLine {
                pose: s.pose,
                speed: s.tcp_speed,
                acc: s.tcp_acc,
                mvtime: s.mvtime,
            },
        };
        let code = self.call(&command).code;
        info!(
            "set_position, ret={}, pose={:?}, velo={}, acc={}, radius={:?}",
            code, s.pose, s.tcp_speed, s.tcp_acc, opts.radius
        );
        Ok(self.complete_motion("set_position", code, snapshot, opts))
    }

    /// 基于工具坐标系的直线运动
    ///
    /// 不修改暂存的笛卡尔目标，只暂存速度/加速度/时间。
    pub fn set_tool_position(&mut self, pose: Pose, opts: &MoveOptions) -> Status {
        into_status(self.try_set_tool_position(pose, opts))
    }

    fn try_set_tool_position(&mut self, pose: Pose, opts: &MoveOptions) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::TcpRates);
        let pose = normalize::pose_to_radians(pose, self.default_radian(opts.is_radian));
        self.stage_linear_rates(opts);

        let s = &self.staged;
        let command = ArmCommand::MoveLineTool {
            pose,
            speed: s.tcp_speed,
            acc: s.tcp_acc,
            mvtime: s.mvtime,
        };
        let code = self.call(&command).code;
        info!(
            "set_tool_position, ret={}, pose={:?}, velo={}, acc={}",
            code, pose, s.tcp_speed, s.tcp_acc
        );
        Ok(self.complete_motion("set_tool_position", code, snapshot, opts))
    }

    /// 轴角姿态的直线运动
    ///
    /// 姿态分量为轴角向量；`opts.tool_coord` 选择工具坐标系，`opts.relative` 选择相对运动。
    pub fn set_position_aa(&mut self, pose: Pose, opts: &MoveOptions) -> Status {
        into_status(self.try_set_position_aa(pose, opts))
    }

    fn try_set_position_aa(&mut self, pose: Pose, opts: &MoveOptions) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::TcpRates);
        let pose = normalize::pose_to_radians(pose, self.default_radian(opts.is_radian));
        self.stage_linear_rates(opts);

        let s = &self.staged;
        let command = ArmCommand::MoveLineAa {
            pose,
            speed: s.tcp_speed,
            acc: s.tcp_acc,
            mvtime: s.mvtime,
            coord: u8::from(opts.tool_coord),
            relative: opts.relative,
        };
        let code = self.call(&command).code;
        info!(
            "set_position_aa, ret={}, pose={:?}, velo={}, acc={}, tool_coord={}, relative={}",
            code, pose, s.tcp_speed, s.tcp_acc, opts.tool_coord, opts.relative
        );
        Ok(self.complete_motion("set_position_aa", code, snapshot, opts))
    }

    /// 轴角姿态的伺服笛卡尔运动（流式）
    pub fn set_servo_cartesian_aa(&mut self, pose: Pose, opts: &MoveOptions) -> Status {
        if let Err(code) = guard::require_ready(&self.live.snapshot()) {
            return code;
        }
        let pose = normalize::pose_to_radians(pose, self.default_radian(opts.is_radian));
        let command = ArmCommand::MoveServoCartAa {
            pose,
            speed: coerce(opts.velocity()).unwrap_or(self.staged.tcp_speed),
            acc: coerce(opts.mvacc.as_ref()).unwrap_or(self.staged.tcp_acc),
            tool_coord: opts.tool_coord,
            relative: opts.relative,
        };
        let code = self.call(&command).code;
        debug!("set_servo_cartesian_aa, ret={}, pose={:?}", code, pose);
        code
    }

    /// 伺服笛卡尔运动（流式）
    ///
    /// 指令的时间字段携带坐标系标志：1 为工具坐标系，0 为基坐标系。
    pub fn set_servo_cartesian(&mut self, pose: Pose, opts: &MoveOptions) -> Status {
        if let Err(code) = guard::require_ready(&self.live.snapshot()) {
            return code;
        }
        let pose = normalize::pose_to_radians(pose, self.default_radian(opts.is_radian));
        let command = ArmCommand::MoveServoCartesian {
            pose,
            speed: coerce(opts.velocity()).unwrap_or(self.staged.tcp_speed),
            acc: coerce(opts.mvacc.as_ref()).unwrap_or(self.staged.tcp_acc),
            mvtime: flag(opts.tool_coord),
        };
        let code = self.call(&command).code;
        debug!("set_servo_cartesian, ret={}, pose={:?}", code, pose);
        code
    }

    /// 圆弧运动：经过 `pose1` 到 `pose2`，走完整圆的 `percent`%
    ///
    /// 不修改暂存的笛卡尔目标。
    pub fn move_circle(&mut self, pose1: Pose, pose2: Pose, percent: f64, opts: &MoveOptions) -> Status {
        into_status(self.try_move_circle(pose1, pose2, percent, opts))
    }

    fn try_move_circle(
        &mut self,
        pose1: Pose,
        pose2: Pose,
        percent: f64,
        opts: &MoveOptions,
    ) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::TcpRates);
        let is_radian = self.default_radian(opts.is_radian);
        let pose1 = normalize::pose_to_radians(pose1, is_radian);
        let pose2 = normalize::pose_to_radians(pose2, is_radian);
        self.stage_linear_rates(opts);

        let s = &self.staged;
        let command = ArmCommand::MoveCircle {
            pose1,
            pose2,
            speed: s.tcp_speed,
            acc: s.tcp_acc,
            mvtime: s.mvtime,
            percent,
        };
        let code = self.call(&command).code;
        info!(
            "move_circle, ret={}, pose1={:?}, pose2={:?}, percent={}%, velo={}, acc={}",
            code, pose1, pose2, percent, s.tcp_speed, s.tcp_acc
        );
        Ok(self.complete_motion("move_circle", code, snapshot, opts))
    }

    // ==================== 关节运动 ====================

    /// 关节运动
    ///
    /// - [`ServoTarget::All`]：前 `axis` 个关节，缺省关节沿用暂存值
    /// - [`ServoTarget::Single`]：只修改一个关节，`id` 超出轴数返回 `SERVO_NOT_EXIST`
    pub fn set_servo_angle(&mut self, target: &ServoTarget, opts: &MoveOptions) -> Status {
        into_status(self.try_set_servo_angle(target, opts))
    }

    fn try_set_servo_angle(&mut self, target: &ServoTarget, opts: &MoveOptions) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::Angles);
        let is_radian = self.default_radian(opts.is_radian);
        let axis = self.settings.axis as usize;

        let (guard, staged) = self.guard_and_staging();
        let composed = match target {
            ServoTarget::All(joints) => normalize::compose_joints(
                &mut staged.angles,
                joints,
                axis,
                opts.relative,
                is_radian,
                &guard,
            ),
            ServoTarget::Single { id, angle } => {
                let id = *id as usize;
                if id == 0 || id > axis {
                    return Err(ApiCode::ServoNotExist.code());
                }
                let Some(value) = angle.as_f64() else {
                    warn!("set_servo_angle: invalid angle {:?} for joint {}", angle, id);
                    return Err(ApiCode::ApiException.code());
                };
                normalize::compose_joint(&mut staged.angles, id - 1, value, opts.relative, is_radian, &guard)
            },
        };
        if let Err(code) = composed {
            staged.restore(&snapshot);
            return Err(code);
        }
        self.stage_joint_rates(opts, is_radian);

        if opts.check {
            let angles = self.staged.angles;
            self.reject_on_limit(ArmCommand::IsJointLimit { angles }, ApiCode::JointLimit, &snapshot)?;
        }

        let s = &self.staged;
        let command = ArmCommand::MoveJoint {
            angles: s.angles,
            speed: s.joint_speed,
            acc: s.joint_acc,
            mvtime: s.mvtime,
        };
        let code = self.call(&command).code;
        info!(
            "set_servo_angle, ret={}, angles={:?}, velo={}, acc={}",
            code, s.angles, s.joint_speed, s.joint_acc
        );
        Ok(self.complete_motion("set_servo_angle", code, snapshot, opts))
    }

    /// 关节伺服运动（流式）
    ///
    /// 不足 7 个的关节补 0；速度等参数原样下发，未提供时取暂存值。
    pub fn set_servo_angle_j(&mut self, angles: &[f64], opts: &MoveOptions) -> Status {
        let live = self.live.snapshot();
        if let Err(code) = guard::require_ready(&live) {
            return code;
        }
        let is_radian = self.default_radian(opts.is_radian);
        let axis = self.settings.axis as usize;
        let guard = self.range_guard();

        let mut target = [0.0; 7];
        for (i, (slot, angle)) in target.iter_mut().zip(angles).enumerate() {
            *slot = if is_radian { *angle } else { angle.to_radians() };
            if i < axis && guard.is_out_of_joint_range(*slot, i) {
                return ApiCode::OutOfRange.code();
            }
        }

        let command = ArmCommand::MoveServoJ {
            angles: target,
            speed: coerce(opts.velocity()).unwrap_or(self.staged.joint_speed),
            acc: coerce(opts.mvacc.as_ref()).unwrap_or(self.staged.joint_acc),
            mvtime: coerce(opts.mvtime.as_ref()).unwrap_or(self.staged.mvtime),
        };
        let code = self.call(&command).code;
        debug!("set_servo_angle_j, ret={}, angles={:?}", code, target);
        code
    }

    /// 回零
    pub fn move_gohome(&mut self, opts: &MoveOptions) -> Status {
        into_status(self.try_move_gohome(opts))
    }

    fn try_move_gohome(&mut self, opts: &MoveOptions) -> Result<Status, Status> {
        self.check_motion()?;
        self.wait_until_cmdnum_below_max()?;
        let snapshot = self.staged.snapshot(RestoreScope::JointRates);
        let is_radian = self.default_radian(opts.is_radian);
        self.stage_joint_rates(opts, is_radian);

        let s = &self.staged;
        let command = ArmCommand::MoveGohome {
            speed: s.joint_speed,
            acc: s.joint_acc,
            mvtime: s.mvtime,
        };
        let code = self.call(&command).code;
        info!("move_gohome, ret={}, velo={}, acc={}", code, s.joint_speed, s.joint_acc);
        Ok(self.complete_motion("move_gohome", code, snapshot, opts))
    }

    // ==================== 暂停 ====================

    /// 在控制器队列中插入暂停
    ///
    /// `wait == true` 时本地阻塞 `seconds` 秒；否则延长暂停窗口，
    /// 运动等待在窗口内不会判定为停止。
    pub fn set_pause_time(&mut self, seconds: f64, wait: bool) -> Status {
        if let Err(code) = guard::require_connected(&self.live.snapshot()) {
            return code;
        }
        if !seconds.is_finite() || seconds < 0.0 {
            return ApiCode::OutOfRange.code();
        }
        let code = self.call(&ArmCommand::SleepInstruction { seconds }).code;
        if wait {
            thread::sleep(Duration::from_secs_f64(seconds));
        } else {
            self.pause.extend(seconds);
        }
        info!("set_pause_time, ret={}, sltime={}", code, seconds);
        code
    }
}
