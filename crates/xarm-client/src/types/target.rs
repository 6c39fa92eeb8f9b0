//! 运动目标
//!
//! 缺省分量沿用暂存目标中的对应值（相对运动时视为 0 增量）。

use super::Param;
use xarm_protocol::Pose;

/// 笛卡尔目标 `[x, y, z, roll, pitch, yaw]`
///
/// 长度单位 mm，姿态单位由调用方的 `is_radian` 决定。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseTarget(pub [Option<Param>; 6]);

impl PoseTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// 六个分量全部给定
    pub fn from_pose(pose: Pose) -> Self {
        Self(pose.map(|v| Some(Param::Num(v))))
    }

    /// 设置第 `index` 个分量（超出 0..6 忽略）
    pub fn component(mut self, index: usize, value: impl Into<Param>) -> Self {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(value.into());
        }
        self
    }

    pub fn x(self, v: impl Into<Param>) -> Self {
        self.component(0, v)
    }

    pub fn y(self, v: impl Into<Param>) -> Self {
        self.component(1, v)
    }

    pub fn z(self, v: impl Into<Param>) -> Self {
        self.component(2, v)
    }

    pub fn roll(self, v: impl Into<Param>) -> Self {
        self.component(3, v)
    }

    pub fn pitch(self, v: impl Into<Param>) -> Self {
        self.component(4, v)
    }

    pub fn yaw(self, v: impl Into<Param>) -> Self {
        self.component(5, v)
    }

    pub fn get(&self, index: usize) -> Option<&Param> {
        self.0.get(index).and_then(Option::as_ref)
    }
}

impl From<Pose> for PoseTarget {
    fn from(pose: Pose) -> Self {
        Self::from_pose(pose)
    }
}

/// 关节目标（最多 7 个关节）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointTarget(pub [Option<Param>; 7]);

impl JointTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按顺序给定前 `angles.len()` 个关节（多余部分忽略）
    pub fn from_angles(angles: &[f64]) -> Self {
        let mut target = Self::default();
        for (slot, v) in target.0.iter_mut().zip(angles) {
            *slot = Some(Param::Num(*v));
        }
        target
    }

    /// 设置第 `index` 个关节（0 起）
    pub fn joint(mut self, index: usize, value: impl Into<Param>) -> Self {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(value.into());
        }
        self
    }

    pub fn get(&self, index: usize) -> Option<&Param> {
        self.0.get(index).and_then(Option::as_ref)
    }
}

/// `set_servo_angle` 的目标
#[derive(Debug, Clone, PartialEq)]
pub enum ServoTarget {
    /// 多关节
    All(JointTarget),
    /// 单关节，`id` 为 1 起的关节号
    Single { id: u8, angle: Param },
}

impl From<JointTarget> for ServoTarget {
    fn from(target: JointTarget) -> Self {
        ServoTarget::All(target)
    }
}

/// 圆弧直线轨迹的路点
///
/// `radius` 为空或为负时按 0 处理（尖角过渡）。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcWaypoint {
    pub pose: Pose,
    pub radius: Option<f64>,
}

impl From<[f64; 6]> for ArcWaypoint {
    fn from(pose: [f64; 6]) -> Self {
        Self { pose, radius: None }
    }
}

impl From<[f64; 7]> for ArcWaypoint {
    fn from(v: [f64; 7]) -> Self {
        Self {
            pose: [v[0], v[1], v[2], v[3], v[4], v[5]],
            radius: Some(v[6]),
        }
    }
}
