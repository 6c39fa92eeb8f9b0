//! 参数规范化
//!
//! 把用户参数合成为暂存目标：
//! - 姿态/关节角度统一转换为弧度
//! - 相对运动叠加到当前暂存值
//! - 速度/加速度钳位到 [`MotionLimits`](xarm_tools::MotionLimits)
//!
//! 所有函数只修改传入的暂存值；失败时调用方负责整体回滚。

use crate::guard::RangeGuard;
use crate::types::{JointTarget, Param, PoseTarget, coerce};
use xarm_protocol::{ApiCode, JointAngles, Pose, Status};
use xarm_tools::Bounds;

#[inline]
fn angle_to_radians(value: f64, is_radian: bool) -> f64 {
    if is_radian { value } else { value.to_radians() }
}

/// 姿态分量（索引 3..6）转换为弧度
pub fn pose_to_radians(pose: Pose, is_radian: bool) -> Pose {
    let mut out = pose;
    for v in &mut out[3..] {
        *v = angle_to_radians(*v, is_radian);
    }
    out
}

/// 合成笛卡尔目标
///
/// 未给出或无法解析的分量保持不变。
///
/// # 错误
///
/// 合成后的姿态分量越界时返回 `OUT_OF_RANGE`，此时 `staged` 可能已部分修改。
pub fn compose_pose(
    staged: &mut Pose,
    target: &PoseTarget,
    relative: bool,
    is_radian: bool,
    guard: &RangeGuard<'_>,
) -> Result<(), Status> {
    for (i, slot) in staged.iter_mut().enumerate() {
        let Some(value) = coerce(target.get(i)) else {
            continue;
        };
        let value = if i > 2 { angle_to_radians(value, is_radian) } else { value };
        let next = if relative { *slot + value } else { value };
        if guard.is_out_of_tcp_range(next, i) {
            return Err(ApiCode::OutOfRange.code());
        }
        *slot = next;
    }
    Ok(())
}

/// 合成单个关节目标
pub fn compose_joint(
    staged: &mut JointAngles,
    index: usize,
    value: f64,
    relative: bool,
    is_radian: bool,
    guard: &RangeGuard<'_>,
) -> Result<(), Status> {
    let Some(slot) = staged.get_mut(index) else {
        return Err(ApiCode::ServoNotExist.code());
    };
    let value = angle_to_radians(value, is_radian);
    let next = if relative { *slot + value } else { value };
    if guard.is_out_of_joint_range(next, index) {
        return Err(ApiCode::OutOfRange.code());
    }
    *slot = next;
    Ok(())
}

/// 合成多关节目标（只处理前 `axis` 个关节）
pub fn compose_joints(
    staged: &mut JointAngles,
    target: &JointTarget,
    axis: usize,
    relative: bool,
    is_radian: bool,
    guard: &RangeGuard<'_>,
) -> Result<(), Status> {
    for i in 0..axis.min(staged.len()) {
        if let Some(value) = coerce(target.get(i)) {
            compose_joint(staged, i, value, relative, is_radian, guard)?;
        }
    }
    Ok(())
}

/// 笛卡尔速度/加速度：解析后钳位，未提供时沿用 `current`
pub fn linear_rate(current: f64, param: Option<&Param>, bounds: Bounds) -> f64 {
    coerce(param).map_or(current, |v| bounds.clamp(v))
}

/// 关节速度/加速度：先转换为弧度单位再钳位
pub fn joint_rate(current: f64, param: Option<&Param>, is_radian: bool, bounds: Bounds) -> f64 {
    coerce(param).map_or(current, |v| bounds.clamp(angle_to_radians(v, is_radian)))
}

/// 运动时间：原样保存
pub fn move_time(current: f64, param: Option<&Param>) -> f64 {
    coerce(param).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use xarm_tools::{AxisRangeTable, DeviceModel, MotionLimits};

    fn table() -> AxisRangeTable {
        AxisRangeTable::for_model(DeviceModel::XArm7)
    }

    #[test]
    fn test_compose_pose_absolute_and_relative() {
        let table = table();
        let guard = RangeGuard::new(&table);
        let mut staged = [100.0, 0.0, 200.0, PI, 0.0, 0.0];

        let target = PoseTarget::new().x(300).yaw(90);
        compose_pose(&mut staged, &target, false, false, &guard).unwrap();
        assert_eq!(staged[0], 300.0);
        assert_eq!(staged[1], 0.0);
        assert!((staged[5] - PI / 2.0).abs() < 1e-12);

        let target = PoseTarget::new().x(10).z("-5");
        compose_pose(&mut staged, &target, true, false, &guard).unwrap();
        assert_eq!(staged[0], 310.0);
        assert_eq!(staged[2], 195.0);
    }

    #[test]
    fn test_compose_pose_skips_unparseable_text() {
        let table = table();
        let guard = RangeGuard::new(&table);
        let mut staged = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0];
        let target = PoseTarget::new().x("abc").y("20");
        compose_pose(&mut staged, &target, false, true, &guard).unwrap();
        assert_eq!(staged[..3], [1.0, 20.0, 3.0]);
    }

    #[test]
    fn test_compose_pose_out_of_range() {
        let table = table();
        let guard = RangeGuard::new(&table).with_tcp_check(true, &[0.0; 6], &[0.0; 6]);
        let mut staged = [0.0; 6];
        let target = PoseTarget::new().roll(200);
        assert_eq!(compose_pose(&mut staged, &target, false, false, &guard), Err(-8));
        assert_eq!(staged[3], 0.0);
    }

    #[test]
    fn test_compose_joints_limits_to_axis() {
        let table = table();
        let guard = RangeGuard::new(&table);
        let mut staged = [0.0; 7];
        let target = JointTarget::from_angles(&[90.0, 0.0, 0.0, 0.0, 0.0, 0.0, 45.0]);
        compose_joints(&mut staged, &target, 6, false, false, &guard).unwrap();
        assert!((staged[0] - PI / 2.0).abs() < 1e-12);
        // 第 7 轴超出 axis，不修改
        assert_eq!(staged[6], 0.0);
    }

    #[test]
    fn test_compose_joint_invalid_index() {
        let table = table();
        let guard = RangeGuard::new(&table);
        let mut staged = [0.0; 7];
        assert_eq!(compose_joint(&mut staged, 7, 1.0, false, true, &guard), Err(-10));
    }

    #[test]
    fn test_rates_are_clamped() {
        let limits = MotionLimits::default();
        assert_eq!(linear_rate(100.0, Some(&Param::Num(10_000.0)), limits.tcp_speed), 1000.0);
        assert_eq!(linear_rate(100.0, Some(&Param::Num(0.0)), limits.tcp_speed), 0.1);
        assert_eq!(linear_rate(100.0, Some(&Param::from("x")), limits.tcp_speed), 100.0);
        assert_eq!(linear_rate(100.0, None, limits.tcp_speed), 100.0);

        // 1000°/s 超出 4 rad/s 上限
        let v = joint_rate(0.3, Some(&Param::Num(1000.0)), false, limits.joint_speed);
        assert_eq!(v, 4.0);
        let v = joint_rate(0.3, Some(&Param::Num(1.0)), true, limits.joint_speed);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_move_time_is_stored_as_is() {
        assert_eq!(move_time(0.0, Some(&Param::Num(12.5))), 12.5);
        assert_eq!(move_time(3.0, None), 3.0);
    }

    #[test]
    fn test_pose_to_radians() {
        let pose = pose_to_radians([1.0, 2.0, 3.0, 180.0, 90.0, 0.0], false);
        assert_eq!(pose[..3], [1.0, 2.0, 3.0]);
        assert!((pose[3] - PI).abs() < 1e-12);
        assert_eq!(pose_to_radians([0.0, 0.0, 0.0, 1.0, 1.0, 1.0], true)[3], 1.0);
    }
}
