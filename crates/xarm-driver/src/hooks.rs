//! 钩子系统（Hook System）
//!
//! 在上报的运动状态发生变化时触发自定义回调。
//!
//! 回调在状态发布线程（通常是上报监听线程）中同步执行，
//! 必须快速返回；耗时处理请通过 [`StateChangeForwarder`] 转到其他线程。
//!
//! # 使用示例
//!
//! ```rust
//! use xarm_driver::hooks::{HookManager, StateChangeForwarder};
//! use xarm_protocol::RobotState;
//! use std::sync::Arc;
//!
//! let mut hooks = HookManager::new();
//! let (forwarder, rx) = StateChangeForwarder::new();
//! let id = hooks.add_callback(Arc::new(forwarder));
//!
//! hooks.trigger_all(RobotState::Stopped);
//! assert_eq!(rx.try_recv().unwrap(), RobotState::Stopped);
//!
//! assert!(hooks.remove_callback(id));
//! ```

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use xarm_protocol::RobotState;

/// 状态变化回调 Trait
///
/// # 性能要求
///
/// - **非阻塞**: 在发布线程中同步调用，禁止 I/O 和长时间持锁
pub trait StateCallback: Send + Sync {
    /// 当上报的运动状态变化时调用
    fn on_state_changed(&self, state: RobotState);
}

/// 闭包即回调
impl<F> StateCallback for F
where
    F: Fn(RobotState) + Send + Sync,
{
    fn on_state_changed(&self, state: RobotState) {
        self(state)
    }
}

/// 回调句柄（用于注销）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// 钩子管理器
///
/// 回调列表本身不是线程安全的，需要外部同步（通常通过 `RwLock<HookManager>`）。
#[derive(Default)]
pub struct HookManager {
    /// 回调列表
    callbacks: Vec<(HookId, Arc<dyn StateCallback>)>,
    next_id: u64,
}

impl HookManager {
    /// 创建新的钩子管理器
    #[must_use]
    pub const fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// 添加回调，返回用于注销的句柄
    pub fn add_callback(&mut self, callback: Arc<dyn StateCallback>) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// 注销回调
    ///
    /// 返回 `false` 表示该句柄已不存在。
    pub fn remove_callback(&mut self, id: HookId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(hook_id, _)| *hook_id != id);
        self.callbacks.len() != before
    }

    /// 移除所有回调
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    /// 触发所有回调
    pub fn trigger_all(&self, state: RobotState) {
        for (_, callback) in self.callbacks.iter() {
            callback.on_state_changed(state);
        }
    }

    /// 获取回调数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// 检查是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// 把状态变化转发到 channel 的回调
///
/// 发布线程只做一次非阻塞发送。
pub struct StateChangeForwarder {
    sender: Sender<RobotState>,
}

impl StateChangeForwarder {
    /// 创建转发回调及其接收端
    pub fn new() -> (Self, Receiver<RobotState>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl StateCallback for StateChangeForwarder {
    fn on_state_changed(&self, state: RobotState) {
        // 接收端已丢弃时静默忽略
        let _ = self.sender.try_send(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_hook_manager_add_remove() {
        let mut hooks = HookManager::new();
        assert!(hooks.is_empty());

        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let id = hooks.add_callback(Arc::new(move |_state: RobotState| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hooks.len(), 1);

        hooks.trigger_all(RobotState::Moving);
        hooks.trigger_all(RobotState::Stopped);
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(hooks.remove_callback(id));
        assert!(!hooks.remove_callback(id));
        hooks.trigger_all(RobotState::Moving);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hook_ids_are_unique() {
        let mut hooks = HookManager::new();
        let a = hooks.add_callback(Arc::new(|_s: RobotState| {}));
        let b = hooks.add_callback(Arc::new(|_s: RobotState| {}));
        assert_ne!(a, b);

        // 只移除指定的回调
        assert!(hooks.remove_callback(a));
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn test_forwarder() {
        let (forwarder, rx) = StateChangeForwarder::new();
        forwarder.on_state_changed(RobotState::Paused);
        assert_eq!(rx.try_recv().unwrap(), RobotState::Paused);

        // 接收端丢弃后不 panic
        drop(rx);
        forwarder.on_state_changed(RobotState::Idle);
    }
}
