//! 运动学与限位查询（由控制器计算）

use crate::XArm;
use crate::arm::reply_array;
use crate::guard;
use crate::normalize;
use crate::types::{JointTarget, PoseTarget, coerce};
use xarm_protocol::{ArmCommand, JointAngles, Pose, Status};

/// 用目标覆盖暂存值（缺省分量沿用暂存值）
fn fill_pose(staged: Pose, target: &PoseTarget, is_radian: bool) -> Pose {
    let mut pose = staged;
    for (i, slot) in pose.iter_mut().enumerate() {
        if let Some(v) = coerce(target.get(i)) {
            *slot = if i > 2 && !is_radian { v.to_radians() } else { v };
        }
    }
    pose
}

fn fill_joints(staged: JointAngles, target: &JointTarget, is_radian: bool) -> JointAngles {
    let mut angles = staged;
    for (i, slot) in angles.iter_mut().enumerate() {
        if let Some(v) = coerce(target.get(i)) {
            *slot = if is_radian { v } else { v.to_radians() };
        }
    }
    angles
}

impl XArm {
    /// 限位查询，控制器拒绝时结果为 `None`
    pub(crate) fn limit_query(&self, command: &ArmCommand) -> (Status, Option<bool>) {
        if let Err(code) = guard::require_connected(&self.live.snapshot()) {
            return (code, None);
        }
        let reply = self.call(command);
        match reply_array::<1>(&reply) {
            Ok([hit]) => (reply.code, Some(hit != 0.0)),
            Err(code) => (code, None),
        }
    }

    /// 笛卡尔目标是否超出控制器限位
    pub fn is_tcp_limit(&self, target: &PoseTarget, is_radian: Option<bool>) -> (Status, Option<bool>) {
        let pose = fill_pose(self.staged.pose, target, self.default_radian(is_radian));
        self.limit_query(&ArmCommand::IsTcpLimit { pose })
    }

    /// 关节目标是否超出控制器限位
    pub fn is_joint_limit(&self, target: &JointTarget, is_radian: Option<bool>) -> (Status, Option<bool>) {
        let angles = fill_joints(self.staged.angles, target, self.default_radian(is_radian));
        self.limit_query(&ArmCommand::IsJointLimit { angles })
    }

    /// 逆运动学：笛卡尔位姿 → 前 `axis` 个关节角
    pub fn get_inverse_kinematics(
        &self,
        pose: Pose,
        input_is_radian: Option<bool>,
        return_is_radian: Option<bool>,
    ) -> (Status, Vec<f64>) {
        let pose = normalize::pose_to_radians(pose, self.default_radian(input_is_radian));
        let reply = self.query(ArmCommand::GetIk { pose });
        let return_is_radian = self.default_radian(return_is_radian);
        match reply_array::<7>(&reply) {
            Ok(angles) => {
                let angles = angles
                    .iter()
                    .take(self.settings.axis as usize)
                    .map(|a| if return_is_radian { *a } else { a.to_degrees() })
                    .collect();
                (reply.code, angles)
            },
            Err(code) => (code, Vec::new()),
        }
    }

    /// 正运动学：关节角 → 笛卡尔位姿
    pub fn get_forward_kinematics(
        &self,
        angles: &[f64],
        input_is_radian: Option<bool>,
        return_is_radian: Option<bool>,
    ) -> (Status, Pose) {
        let input_is_radian = self.default_radian(input_is_radian);
        let mut joints = [0.0; 7];
        for (slot, a) in joints.iter_mut().zip(angles) {
            *slot = if input_is_radian { *a } else { a.to_radians() };
        }
        let reply = self.query(ArmCommand::GetFk { angles: joints });
        match reply_array::<6>(&reply) {
            Ok(pose) => (reply.code, pose_from_radians(pose, self.default_radian(return_is_radian))),
            Err(code) => (code, [0.0; 6]),
        }
    }
}

/// 姿态分量按需转换为角度
pub(crate) fn pose_from_radians(pose: Pose, is_radian: bool) -> Pose {
    let mut out = pose;
    if !is_radian {
        for v in &mut out[3..] {
            *v = v.to_degrees();
        }
    }
    out
}
