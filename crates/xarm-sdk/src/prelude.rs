//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use xarm_sdk::prelude::*;
//! ```

// 客户端层
pub use crate::client::types::*;
pub use crate::client::{ArmSettings, StopHandle, WaitConfig, XArm, XArmBuilder};

// 控制层
pub use crate::control::{
    FirmwareConfig, GcodeInterpreter, Outcome, ProgramConverter, ScriptConfig, run_gcode_file,
    run_program,
};

// 驱动层（常用 Trait 与状态）
pub use crate::driver::{CommandChannel, LiveState, LiveStateStore};

// 限位配置
pub use crate::tools::LimitsConfig;

// 状态码与错误类型
pub use crate::control::ControlError;
pub use crate::driver::DriverError;
pub use crate::protocol::{ApiCode, RobotState, Status};
pub use crate::tools::LimitsError;
