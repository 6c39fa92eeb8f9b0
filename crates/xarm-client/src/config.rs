//! 控制器固件配置：偏移、负载、灵敏度、加速度与加加速度、减速模式

use crate::XArm;
use crate::kinematics::pose_from_radians;
use crate::normalize;
use crate::types::{ReducedStates, TcpLoad};
use tracing::{info, warn};
use xarm_protocol::{ApiCode, ArmCommand, JointRanges, Pose, Status, controller};

#[inline]
fn rad(value: f64, is_radian: bool) -> f64 {
    if is_radian { value } else { value.to_radians() }
}

#[inline]
fn unrad(value: f64, is_radian: bool) -> f64 {
    if is_radian { value } else { value.to_degrees() }
}

/// 底座倾斜 `tilt`、绕竖直轴旋转 `rotation`（弧度）时的重力方向
pub fn mount_gravity_direction(tilt: f64, rotation: f64) -> [f64; 3] {
    [
        rotation.cos() * tilt.sin(),
        -rotation.sin() * tilt.sin(),
        -tilt.cos(),
    ]
}

impl XArm {
    // ==================== 加速度 / 加加速度 ====================

    pub fn set_tcp_jerk(&self, jerk: f64) -> Status {
        self.send(ArmCommand::SetTcpJerk { jerk })
    }

    pub fn get_tcp_jerk(&self) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetTcpJerk);
        (code, v)
    }

    pub fn set_tcp_maxacc(&self, acc: f64) -> Status {
        self.send(ArmCommand::SetTcpMaxAcc { acc })
    }

    pub fn get_tcp_maxacc(&self) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetTcpMaxAcc);
        (code, v)
    }

    pub fn set_joint_jerk(&self, jerk: f64, is_radian: Option<bool>) -> Status {
        let jerk = rad(jerk, self.default_radian(is_radian));
        self.send(ArmCommand::SetJointJerk { jerk })
    }

    pub fn get_joint_jerk(&self, is_radian: Option<bool>) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetJointJerk);
        (code, unrad(v, self.default_radian(is_radian)))
    }

    pub fn set_joint_maxacc(&self, acc: f64, is_radian: Option<bool>) -> Status {
        let acc = rad(acc, self.default_radian(is_radian));
        self.send(ArmCommand::SetJointMaxAcc { acc })
    }

    pub fn get_joint_maxacc(&self, is_radian: Option<bool>) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetJointMaxAcc);
        (code, unrad(v, self.default_radian(is_radian)))
    }

    // ==================== 偏移 ====================

    /// 设置 TCP 偏移，成功后本地范围检查随之平移
    pub fn set_tcp_offset(&mut self, offset: Pose, is_radian: Option<bool>) -> Status {
        let offset = normalize::pose_to_radians(offset, self.default_radian(is_radian));
        let code = self.send(ArmCommand::SetTcpOffset { offset });
        if controller::is_accepted(code) {
            self.tcp_offset = offset;
        }
        info!("set_tcp_offset, ret={}, offset={:?}", code, offset);
        code
    }

    pub fn get_tcp_offset(&self, is_radian: Option<bool>) -> (Status, Pose) {
        let (code, offset) = self.query_array::<6>(ArmCommand::GetTcpOffset);
        (code, pose_from_radians(offset, self.default_radian(is_radian)))
    }

    /// 设置世界坐标偏移，成功后本地范围检查随之平移
    pub fn set_world_offset(&mut self, offset: Pose, is_radian: Option<bool>) -> Status {
        let offset = normalize::pose_to_radians(offset, self.default_radian(is_radian));
        let code = self.send(ArmCommand::SetWorldOffset { offset });
        if controller::is_accepted(code) {
            self.world_offset = offset;
        }
        info!("set_world_offset, ret={}, offset={:?}", code, offset);
        code
    }

    pub fn get_world_offset(&self, is_radian: Option<bool>) -> (Status, Pose) {
        let (code, offset) = self.query_array::<6>(ArmCommand::GetWorldOffset);
        (code, pose_from_radians(offset, self.default_radian(is_radian)))
    }

    // ==================== 负载与灵敏度 ====================

    pub fn set_tcp_load(&self, load: TcpLoad) -> Status {
        self.send(ArmCommand::SetTcpLoad {
            weight: load.weight,
            center: load.center,
        })
    }

    pub fn get_tcp_load(&self) -> (Status, TcpLoad) {
        let (code, [weight, x, y, z]) = self.query_array::<4>(ArmCommand::GetTcpLoad);
        (code, TcpLoad { weight, center: [x, y, z] })
    }

    /// 碰撞灵敏度（0-5）
    pub fn set_collision_sensitivity(&self, value: u8) -> Status {
        if value > 5 {
            return ApiCode::OutOfRange.code();
        }
        self.send(ArmCommand::SetCollisionSensitivity { value })
    }

    pub fn get_collision_sensitivity(&self) -> (Status, u8) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetCollisionSensitivity);
        (code, v as u8)
    }

    /// 拖动示教灵敏度（1-5）
    pub fn set_teach_sensitivity(&self, value: u8) -> Status {
        if !(1..=5).contains(&value) {
            return ApiCode::OutOfRange.code();
        }
        self.send(ArmCommand::SetTeachSensitivity { value })
    }

    pub fn get_teach_sensitivity(&self) -> (Status, u8) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetTeachSensitivity);
        (code, v as u8)
    }

    pub fn set_gravity_direction(&self, direction: [f64; 3]) -> Status {
        self.send(ArmCommand::SetGravityDirection { direction })
    }

    pub fn get_gravity_direction(&self) -> (Status, [f64; 3]) {
        self.query_array::<3>(ArmCommand::GetGravityDirection)
    }

    /// 按安装角度设置重力方向
    pub fn set_mount_direction(&self, base_tilt: f64, rotation: f64, is_radian: Option<bool>) -> Status {
        let is_radian = self.default_radian(is_radian);
        let direction = mount_gravity_direction(rad(base_tilt, is_radian), rad(rotation, is_radian));
        self.set_gravity_direction(direction)
    }

    /// 上报力矩（0）还是电流（1）
    pub fn set_report_tau_or_i(&self, value: u8) -> Status {
        if value > 1 {
            return ApiCode::OutOfRange.code();
        }
        self.send(ArmCommand::SetReportTauOrI { value })
    }

    pub fn get_report_tau_or_i(&self) -> (Status, u8) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetReportTauOrI);
        (code, v as u8)
    }

    // ==================== 减速模式 ====================

    pub fn set_reduced_mode(&self, on: bool) -> Status {
        self.send(ArmCommand::SetReducedMode { on })
    }

    pub fn get_reduced_mode(&self) -> (Status, bool) {
        let (code, states) = self.get_reduced_states(Some(true));
        (code, states.on)
    }

    /// 减速模式下的笛卡尔最大速度 mm/s
    pub fn set_reduced_max_tcp_speed(&self, speed: f64) -> Status {
        self.send(ArmCommand::SetReducedLineSpeed { speed })
    }

    /// 减速模式下的关节最大速度
    pub fn set_reduced_max_joint_speed(&self, speed: f64, is_radian: Option<bool>) -> Status {
        let speed = rad(speed, self.default_radian(is_radian));
        self.send(ArmCommand::SetReducedJointSpeed { speed })
    }

    /// 笛卡尔边界 `[x, x, y, y, z, z]`（每对按 max、min 排序后下发）
    pub fn set_reduced_tcp_boundary(&self, boundary: [f64; 6]) -> Status {
        let mut limits = [0i32; 6];
        for pair in 0..3 {
            let (a, b) = (boundary[pair * 2], boundary[pair * 2 + 1]);
            limits[pair * 2] = a.max(b).round() as i32;
            limits[pair * 2 + 1] = a.min(b).round() as i32;
        }
        self.send(ArmCommand::SetXyzLimits { limits })
    }

    /// 关节范围 `[j1_min, j1_max, …]`
    ///
    /// 每对按 min、max 排序并钳位到机型范围；与机型范围无交集时返回 `OUT_OF_RANGE`。
    pub fn set_reduced_joint_range(&self, ranges: &[f64], is_radian: Option<bool>) -> Status {
        let is_radian = self.default_radian(is_radian);
        let mut out: JointRanges = [0.0; 14];
        for (i, pair) in ranges.chunks(2).take(self.settings.axis as usize).enumerate() {
            let (a, b) = match *pair {
                [a, b] => (rad(a, is_radian), rad(b, is_radian)),
                _ => return ApiCode::OutOfRange.code(),
            };
            let (mut low, mut high) = (a.min(b), a.max(b));
            if let Some(range) = self.limits.ranges.joint(i) {
                if low >= range.high || high <= range.low {
                    warn!("set_reduced_joint_range: joint {} range [{}, {}] is outside the model range", i + 1, low, high);
                    return ApiCode::OutOfRange.code();
                }
                low = low.max(range.low);
                high = high.min(range.high);
            }
            out[i * 2] = low;
            out[i * 2 + 1] = high;
        }
        self.send(ArmCommand::SetReducedJointRange { ranges: out })
    }

    /// 安全围栏开关
    pub fn set_fense_mode(&self, on: bool) -> Status {
        self.send(ArmCommand::SetFenceOn { on })
    }

    /// 碰撞回弹开关
    pub fn set_collision_rebound(&self, on: bool) -> Status {
        self.send(ArmCommand::SetCollisionRebound { on })
    }

    /// 读取全部减速模式参数
    pub fn get_reduced_states(&self, is_radian: Option<bool>) -> (Status, ReducedStates) {
        let (code, values) = self.query_array::<25>(ArmCommand::GetReducedStates);
        if !controller::is_accepted(code) {
            return (code, ReducedStates::default());
        }
        (code, ReducedStates::from_values(&values, self.default_radian(is_radian)))
    }
}
