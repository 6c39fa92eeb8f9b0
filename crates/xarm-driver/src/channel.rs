//! 指令通道抽象
//!
//! 二进制线协议、帧格式、校验与重传都在通道实现内部完成，
//! 运动层只看到"一条指令 → 一个回复"。

use crate::DriverError;
use std::sync::Arc;
use xarm_protocol::{ArmCommand, Reply};

/// 指令通道
///
/// 实现必须线程安全：急停句柄可能在其他线程下发指令。
pub trait CommandChannel: Send + Sync {
    /// 执行一条指令并等待回复
    ///
    /// # 错误
    ///
    /// 通道层失败（断开、超时、写失败）返回 [`DriverError`]，
    /// 控制器层面的错误通过 [`Reply::code`] 表达。
    fn execute(&self, command: &ArmCommand) -> Result<Reply, DriverError>;

    /// 是否为带实时上报的网络通道
    ///
    /// 本地限位检查只在这类通道上启用（串口通道没有上报流）。
    fn is_socket(&self) -> bool {
        true
    }
}

impl<T: CommandChannel + ?Sized> CommandChannel for Arc<T> {
    fn execute(&self, command: &ArmCommand) -> Result<Reply, DriverError> {
        (**self).execute(command)
    }

    fn is_socket(&self) -> bool {
        (**self).is_socket()
    }
}
