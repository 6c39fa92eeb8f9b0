//! # xArm Client
//!
//! xArm 运动指令层：在指令通道之上提供带校验的运动 API。
//!
//! ## 职责
//!
//! - **前置条件**：连接、就绪、暂停检查，失败返回负状态码
//! - **参数规范化**：角度单位转换、相对运动合成、速度/加速度钳位
//! - **暂存目标**：缺省参数沿用上一次接受的值，控制器拒绝时回滚
//! - **范围检查**：本地姿态/关节角度范围检查
//! - **运动等待**：带 debounce 的停止判定、暂停窗口、超时
//! - **组合动作**：圆弧直线轨迹、复位、急停
//!
//! ## 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use xarm_client::{MoveOptions, PoseTarget, XArm};
//! use xarm_driver::{LiveState, LiveStateStore, mock::MockChannel};
//!
//! let live = Arc::new(LiveStateStore::new(LiveState::ready()));
//! let channel = Arc::new(MockChannel::new(live.clone()));
//! let mut arm = XArm::new(channel, live);
//!
//! let code = arm.set_position(&PoseTarget::new().x(300).z(200), &MoveOptions::new().speed(100));
//! assert_eq!(code, 0);
//! ```
//!
//! 所有运动 API 返回状态码（[`Status`]）：负数为本地拒绝，
//! 0/1/2 为控制器接受（1/2 表示有未清除的错误/警告）。

mod arm;
mod config;
mod controller;
pub mod guard;
mod io;
mod kinematics;
mod motion;
pub mod normalize;
mod recovery;
mod sequence;
mod settings;
pub mod staging;
pub mod types;
pub mod wait;

pub use arm::{XArm, XArmBuilder};
pub use config::mount_gravity_direction;
pub use controller::ALL_SERVOS;
pub use io::CGPIO_CHANNELS;
pub use recovery::{EMERGENCY_STOP_RETRY, EMERGENCY_STOP_TIMEOUT, StopHandle};
pub use sequence::CALIBRATION_JOINT_SPEED;
pub use settings::ArmSettings;
pub use staging::{RestoreScope, StagedMotion, StagedSnapshot};
pub use types::{
    ArcLinesOptions, ArcWaypoint, JointTarget, MoveOptions, Param, PoseTarget, ReducedStates,
    ServoTarget, TcpLoad,
};
pub use wait::{MotionWait, PauseWindow, WaitConfig, WaitExit, WaitTarget};

pub use xarm_protocol::{ApiCode, Status};
