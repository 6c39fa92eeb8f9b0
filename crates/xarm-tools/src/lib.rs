//! # xArm Tools
//!
//! xArm 应用共享的数据结构与配置文件

pub mod limits;

pub use limits::{
    AxisRange, AxisRangeTable, Bounds, DeviceModel, LimitsConfig, LimitsError, MotionLimits,
};
