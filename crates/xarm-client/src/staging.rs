//! 暂存运动目标
//!
//! 保存"最后一次接受的"笛卡尔/关节目标以及速度、加速度、运动时间。
//! 缺省参数从这里取值，相对运动在这里叠加。
//!
//! 每次运动调用先按 [`RestoreScope`] 取 [`StagedSnapshot`]，控制器拒绝且机械臂未运动时
//! 只恢复该运动写入的字段。运动时间不回滚。

use xarm_protocol::{JointAngles, Pose};

/// 初始笛卡尔目标（回零位姿）
pub const DEFAULT_POSE: Pose = [201.5, 0.0, 140.5, std::f64::consts::PI, 0.0, 0.0];
/// 初始笛卡尔速度 mm/s
pub const DEFAULT_TCP_SPEED: f64 = 100.0;
/// 初始笛卡尔加速度 mm/s²
pub const DEFAULT_TCP_ACC: f64 = 2000.0;
/// 初始关节速度 rad/s（20°/s）
pub const DEFAULT_JOINT_SPEED: f64 = 0.349_065_850_398_865_9;
/// 初始关节加速度 rad/s²（500°/s²）
pub const DEFAULT_JOINT_ACC: f64 = 8.726_646_259_971_648;

/// 暂存目标
#[derive(Debug, Clone, PartialEq)]
pub struct StagedMotion {
    pub(crate) pose: Pose,
    pub(crate) angles: JointAngles,
    pub(crate) tcp_speed: f64,
    pub(crate) tcp_acc: f64,
    pub(crate) joint_speed: f64,
    pub(crate) joint_acc: f64,
    pub(crate) mvtime: f64,
}

impl Default for StagedMotion {
    fn default() -> Self {
        Self {
            pose: DEFAULT_POSE,
            angles: [0.0; 7],
            tcp_speed: DEFAULT_TCP_SPEED,
            tcp_acc: DEFAULT_TCP_ACC,
            joint_speed: DEFAULT_JOINT_SPEED,
            joint_acc: DEFAULT_JOINT_ACC,
            mvtime: 0.0,
        }
    }
}

/// 回滚范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreScope {
    /// 笛卡尔目标 + 笛卡尔速度/加速度
    Position,
    /// 只有笛卡尔速度/加速度
    TcpRates,
    /// 关节目标 + 关节速度/加速度
    Angles,
    /// 只有关节速度/加速度
    JointRates,
}

/// 回滚用快照
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct StagedSnapshot {
    scope: RestoreScope,
    saved: StagedMotion,
}

impl StagedSnapshot {
    pub fn scope(&self) -> RestoreScope {
        self.scope
    }
}

impl StagedMotion {
    pub fn snapshot(&self, scope: RestoreScope) -> StagedSnapshot {
        StagedSnapshot {
            scope,
            saved: self.clone(),
        }
    }

    /// 恢复快照范围内的字段
    pub fn restore(&mut self, snapshot: &StagedSnapshot) {
        let saved = &snapshot.saved;
        match snapshot.scope {
            RestoreScope::Position => {
                self.pose = saved.pose;
                self.tcp_speed = saved.tcp_speed;
                self.tcp_acc = saved.tcp_acc;
            },
            RestoreScope::TcpRates => {
                self.tcp_speed = saved.tcp_speed;
                self.tcp_acc = saved.tcp_acc;
            },
            RestoreScope::Angles => {
                self.angles = saved.angles;
                self.joint_speed = saved.joint_speed;
                self.joint_acc = saved.joint_acc;
            },
            RestoreScope::JointRates => {
                self.joint_speed = saved.joint_speed;
                self.joint_acc = saved.joint_acc;
            },
        }
    }

    /// 笛卡尔目标（姿态为弧度）
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// 关节目标（弧度）
    pub fn angles(&self) -> JointAngles {
        self.angles
    }

    pub fn tcp_speed(&self) -> f64 {
        self.tcp_speed
    }

    pub fn tcp_acc(&self) -> f64 {
        self.tcp_acc
    }

    pub fn joint_speed(&self) -> f64 {
        self.joint_speed
    }

    pub fn joint_acc(&self) -> f64 {
        self.joint_acc
    }

    pub fn mvtime(&self) -> f64 {
        self.mvtime
    }

    /// 用控制器实际位置覆盖暂存目标
    pub(crate) fn sync_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub(crate) fn sync_angles(&mut self, angles: &[f64]) {
        for (slot, v) in self.angles.iter_mut().zip(angles) {
            *slot = *v;
        }
    }
}
