//! 驱动层模块
//!
//! 本模块定义运动层与外部协作者之间的边界：
//! - 指令通道（[`CommandChannel`]）：一条指令 → `(status, payload…)`
//! - 实时状态（[`LiveStateStore`]）：由上报监听线程发布，ArcSwap 无锁读取
//! - 钩子系统：运动状态变化回调
//!
//! 启用 `mock` feature 后提供 [`mock::MockChannel`]，用于无硬件测试。

mod channel;
mod error;
pub mod hooks;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod state;

pub use channel::CommandChannel;
pub use error::DriverError;
pub use hooks::{HookId, HookManager, StateCallback, StateChangeForwarder};
pub use state::{LiveState, LiveStateStore};
