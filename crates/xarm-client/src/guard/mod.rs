//! 调用前检查：连接/就绪前置条件与本地范围检查

pub mod precondition;
mod range;

pub use precondition::{require_connected, require_not_paused, require_ready};
pub use range::{RANGE_TOLERANCE, RangeGuard};
