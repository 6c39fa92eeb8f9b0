//! # 运动限制
//!
//! 速度/加速度钳位范围（[`MotionLimits`]）与各轴角度范围表（[`AxisRangeTable`]）。
//!
//! 内置 xArm5/6/7 的默认值，也可以从 TOML 文件加载覆盖：
//!
//! ```toml
//! [motion.tcp_speed]
//! min = 0.1
//! max = 500.0
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum LimitsError {
    #[error("Failed to read limits file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid limits file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize limits: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 标量范围 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 钳位到范围内（越界不报错）
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// 速度/加速度限制
///
/// 笛卡尔量单位为 mm/s、mm/s²，关节量单位为 rad/s、rad/s²。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionLimits {
    pub tcp_speed: Bounds,
    pub tcp_acc: Bounds,
    pub joint_speed: Bounds,
    pub joint_acc: Bounds,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            tcp_speed: Bounds::new(0.1, 1000.0),
            tcp_acc: Bounds::new(1.0, 50000.0),
            joint_speed: Bounds::new(0.01, 4.0),
            joint_acc: Bounds::new(0.01, 20.0),
        }
    }
}

/// 单轴角度范围（弧度）
///
/// `low == high` 表示该轴不受约束。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub low: f64,
    pub high: f64,
}

impl AxisRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.low == self.high
    }
}

/// 机型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceModel {
    XArm5,
    XArm6,
    XArm7,
}

impl DeviceModel {
    /// 按轴数识别机型（未知轴数按 7 轴处理）
    pub fn from_axis(axis: u8) -> Self {
        match axis {
            5 => Self::XArm5,
            6 => Self::XArm6,
            _ => Self::XArm7,
        }
    }

    pub fn axis(self) -> u8 {
        match self {
            Self::XArm5 => 5,
            Self::XArm6 => 6,
            Self::XArm7 => 7,
        }
    }
}

/// 各轴角度范围表
///
/// - `joints`: 每个关节的范围
/// - `tcp`: 笛卡尔 6 个分量的范围，只有姿态分量（索引 3..6）参与检查
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRangeTable {
    pub joints: Vec<AxisRange>,
    pub tcp: Vec<AxisRange>,
}

impl AxisRangeTable {
    /// 内置机型默认表
    pub fn for_model(model: DeviceModel) -> Self {
        const J1: AxisRange = AxisRange::new(-TAU, TAU);
        const J2: AxisRange = AxisRange::new(-2.059488, 2.094_395_102_393_195_3);
        const J3: AxisRange = AxisRange::new(-3.92699, 0.191_986_217_719_376_24);
        const WRIST: AxisRange = AxisRange::new(-1.69297, PI);
        const LINEAR_XY: AxisRange = AxisRange::new(-750.0, 750.0);
        const LINEAR_Z: AxisRange = AxisRange::new(-400.0, 1000.0);
        const ROT: AxisRange = AxisRange::new(-PI, PI);

        match model {
            DeviceModel::XArm5 => Self {
                joints: vec![J1, J2, J3, WRIST, J1],
                // 5 轴机型 roll/pitch 不可控
                tcp: vec![
                    LINEAR_XY,
                    LINEAR_XY,
                    LINEAR_Z,
                    AxisRange::new(PI, PI),
                    AxisRange::new(0.0, 0.0),
                    ROT,
                ],
            },
            DeviceModel::XArm6 => Self {
                joints: vec![J1, J2, J3, J1, WRIST, J1],
                tcp: vec![LINEAR_XY, LINEAR_XY, LINEAR_Z, ROT, ROT, ROT],
            },
            DeviceModel::XArm7 => Self {
                joints: vec![
                    J1,
                    J2,
                    J1,
                    AxisRange::new(-0.191_986_217_719_376_24, 3.92699),
                    J1,
                    WRIST,
                    J1,
                ],
                tcp: vec![LINEAR_XY, LINEAR_XY, LINEAR_Z, ROT, ROT, ROT],
            },
        }
    }

    pub fn joint(&self, index: usize) -> Option<AxisRange> {
        self.joints.get(index).copied()
    }

    pub fn tcp(&self, index: usize) -> Option<AxisRange> {
        self.tcp.get(index).copied()
    }
}

impl Default for AxisRangeTable {
    fn default() -> Self {
        Self::for_model(DeviceModel::XArm7)
    }
}

/// 限制配置文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub motion: MotionLimits,
    pub ranges: AxisRangeTable,
}

impl LimitsConfig {
    /// 指定机型的默认配置
    pub fn for_model(model: DeviceModel) -> Self {
        Self {
            motion: MotionLimits::default(),
            ranges: AxisRangeTable::for_model(model),
        }
    }

    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LimitsError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 保存为 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LimitsError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self::for_model(DeviceModel::XArm7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp() {
        let b = Bounds::new(0.1, 1000.0);
        assert_eq!(b.clamp(10000.0), 1000.0);
        assert_eq!(b.clamp(0.0), 0.1);
        assert_eq!(b.clamp(50.0), 50.0);
    }

    #[test]
    fn test_builtin_tables() {
        for model in [DeviceModel::XArm5, DeviceModel::XArm6, DeviceModel::XArm7] {
            let table = AxisRangeTable::for_model(model);
            assert_eq!(table.joints.len(), model.axis() as usize);
            assert_eq!(table.tcp.len(), 6);
            assert_eq!(DeviceModel::from_axis(model.axis()), model);
        }

        let xarm5 = AxisRangeTable::for_model(DeviceModel::XArm5);
        assert!(xarm5.tcp(3).unwrap().is_unconstrained());
        assert!(xarm5.tcp(4).unwrap().is_unconstrained());
        assert!(!xarm5.tcp(5).unwrap().is_unconstrained());
        assert!(xarm5.joint(5).is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("limits.toml");

        let mut config = LimitsConfig::for_model(DeviceModel::XArm6);
        config.motion.tcp_speed.max = 500.0;
        config.save_to_file(&path).unwrap();

        let loaded = LimitsConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_motion_section_uses_defaults() {
        let content = r#"
[motion.tcp_speed]
min = 1.0
max = 200.0

[ranges]
joints = [{ low = -1.0, high = 1.0 }]
tcp = []
"#;
        let config: LimitsConfig = toml::from_str(content).unwrap();
        assert_eq!(config.motion.tcp_speed, Bounds::new(1.0, 200.0));
        assert_eq!(config.motion.joint_acc, MotionLimits::default().joint_acc);
        assert_eq!(config.ranges.joints.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LimitsConfig::load_from_file("/nonexistent/limits.toml").unwrap_err();
        assert!(matches!(err, LimitsError::Io(_)));
    }
}
