//! xArm SDK - xArm 机械臂运动指令 Rust SDK
//!
//! 在指令通道之上提供带校验的运动 API、G-code 脚本执行与固件配置同步。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 状态码、运动状态、指令/回复类型
//! - **驱动层** (`driver`): 指令通道抽象、实时状态、钩子
//! - **工具层** (`tools`): 限位表与配置文件
//! - **客户端层** (`client`): 前置条件、参数规范化、暂存目标、运动等待
//! - **控制层** (`control`): G-code 解释器、脚本、配置同步
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use xarm_sdk::prelude::*;
//!
//! xarm_sdk::init_logger();
//! let mut arm = XArm::new(channel, live);
//! arm.set_position(&PoseTarget::new().x(300).z(200), &MoveOptions::new().speed(100));
//! ```
//!
//! 通道由调用方提供（实现 [`CommandChannel`]），实时状态由上报监听线程发布到
//! [`LiveStateStore`]。

mod logging;
pub mod prelude;

pub use xarm_client as client;
pub use xarm_control as control;
pub use xarm_driver as driver;
pub use xarm_protocol as protocol;
pub use xarm_tools as tools;

pub use logging::{DEFAULT_DIRECTIVE, init_logger};

// --- 用户以此为界 ---

// 客户端层（推荐入口）
pub use client::{ArmSettings, MoveOptions, PoseTarget, StopHandle, XArm, XArmBuilder};

// 控制层
pub use control::{FirmwareConfig, GcodeInterpreter, ScriptConfig, run_gcode_file, run_program};

// 驱动层
pub use driver::{CommandChannel, DriverError, LiveState, LiveStateStore};

// 状态码
pub use protocol::{ApiCode, RobotState, Status};
