//! 运动 API 参数类型

mod config;
mod options;
mod param;
mod target;

pub use config::{ReducedStates, TcpLoad};
pub use options::{ArcLinesOptions, MoveOptions};
pub use param::{Param, coerce};
pub use target::{ArcWaypoint, JointTarget, PoseTarget, ServoTarget};
