//! # xArm Control
//!
//! 运动指令层之上的文本协议与配置工具：
//!
//! - [`gcode`]：G-code 解释器，一行文本映射为一次带校验的调用
//! - [`script`]：脚本文件执行（可循环、可重新初始化）
//! - [`config_sync`]：固件配置读取与差量同步
//! - [`plugin`]：可视化程序经转换器转为 G-code 后执行
//!
//! 内部的文件读写、解析错误使用 [`ControlError`] / `anyhow` 流转，
//! 对外接口统一返回状态码。

pub mod config_sync;
pub mod error;
pub mod gcode;
pub mod plugin;
pub mod script;

pub use config_sync::FirmwareConfig;
pub use error::ControlError;
pub use gcode::{GcodeInterpreter, GcodeLine, Outcome};
pub use plugin::{APP_ENTRY, ProgramConverter, run_program};
pub use script::{ScriptConfig, run_gcode_file};
