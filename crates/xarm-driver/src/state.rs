//! 实时状态存储
//!
//! 上报监听线程（外部组件）持续把控制器状态发布到 [`LiveStateStore`]，
//! 运动层只做无锁快照读取。
//!
//! # 读写模型
//!
//! - **写**：上报监听线程调用 [`LiveStateStore::publish`]；
//!   运动层仅在显式查询（如 `get_state`）后调用 [`LiveStateStore::update`] 回写
//! - **读**：[`LiveStateStore::snapshot`] 基于 ArcSwap，wait-free
//!
//! 读到的值可能短暂过期，上层通过轮询保证正确性。

use crate::hooks::{HookId, HookManager, StateCallback};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use xarm_protocol::RobotState;

/// 控制器实时状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    /// 指令通道是否已连接
    pub connected: bool,
    /// 是否就绪（已使能且状态已设置）
    pub ready: bool,
    /// 运动状态
    pub state: RobotState,
    /// 控制器错误码（0 表示无错误）
    pub error_code: i32,
    /// 控制器警告码（0 表示无警告）
    pub warn_code: i32,
    /// 控制器运动队列中的指令数
    pub cmd_num: u32,
    /// 控制模式
    pub mode: u8,
    /// 上报流是否开启
    ///
    /// 未开启上报时，`state`/`error_code` 等字段只在显式查询后更新，
    /// 运动等待和限位检查均不可用。
    pub reporting: bool,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            connected: false,
            ready: false,
            state: RobotState::Idle,
            error_code: 0,
            warn_code: 0,
            cmd_num: 0,
            mode: 0,
            reporting: true,
        }
    }
}

impl LiveState {
    /// 已连接、已就绪、无错误的初始状态
    pub fn ready() -> Self {
        Self {
            connected: true,
            ready: true,
            ..Self::default()
        }
    }

    /// 是否有未清除的错误
    pub fn has_error(&self) -> bool {
        self.error_code != 0
    }

    /// 是否有未清除的警告
    pub fn has_warn(&self) -> bool {
        self.warn_code != 0
    }
}

/// 实时状态存储
pub struct LiveStateStore {
    state: ArcSwap<LiveState>,
    hooks: RwLock<HookManager>,
}

impl LiveStateStore {
    /// 创建状态存储
    pub fn new(initial: LiveState) -> Self {
        Self {
            state: ArcSwap::from_pointee(initial),
            hooks: RwLock::new(HookManager::new()),
        }
    }

    /// 获取当前快照（wait-free）
    pub fn snapshot(&self) -> Arc<LiveState> {
        self.state.load_full()
    }

    /// 发布新状态
    ///
    /// 运动状态变化时同步触发已注册的回调。
    pub fn publish(&self, next: LiveState) {
        let new_state = next.state;
        let prev = self.state.swap(Arc::new(next));
        if prev.state != new_state {
            debug!(from = ?prev.state, to = ?new_state, "robot state changed");
            self.hooks.read().trigger_all(new_state);
        }
    }

    /// 基于当前快照修改部分字段后发布
    ///
    /// 与监听线程的发布之间不做事务保证：后发布者覆盖先发布者。
    pub fn update<F: FnOnce(&mut LiveState)>(&self, f: F) {
        let mut next = LiveState::clone(&self.state.load());
        f(&mut next);
        self.publish(next);
    }

    /// 注册状态变化回调
    pub fn register_callback(&self, callback: Arc<dyn StateCallback>) -> HookId {
        self.hooks.write().add_callback(callback)
    }

    /// 注销状态变化回调
    pub fn release_callback(&self, id: HookId) -> bool {
        self.hooks.write().remove_callback(id)
    }

    // ====== 便捷读取 ======

    pub fn connected(&self) -> bool {
        self.state.load().connected
    }

    pub fn ready(&self) -> bool {
        self.state.load().ready
    }

    pub fn robot_state(&self) -> RobotState {
        self.state.load().state
    }
}

impl Default for LiveStateStore {
    fn default() -> Self {
        Self::new(LiveState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_and_snapshot() {
        let store = LiveStateStore::new(LiveState::ready());
        assert!(store.connected());
        assert!(store.ready());

        store.update(|s| {
            s.cmd_num = 12;
            s.error_code = 31;
        });
        let snap = store.snapshot();
        assert_eq!(snap.cmd_num, 12);
        assert!(snap.has_error());
        assert!(!snap.has_warn());
    }

    #[test]
    fn test_callbacks_fire_only_on_state_change() {
        let store = LiveStateStore::new(LiveState::ready());
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let id = store.register_callback(Arc::new(move |state: RobotState| {
            assert_eq!(state, RobotState::Moving);
            h.fetch_add(1, Ordering::SeqCst);
        }));

        store.update(|s| s.state = RobotState::Moving);
        // 状态未变，不触发
        store.update(|s| s.cmd_num = 3);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(store.release_callback(id));
        store.update(|s| s.state = RobotState::Idle);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_snapshot_is_stable_across_publish() {
        let store = LiveStateStore::new(LiveState::ready());
        let before = store.snapshot();
        store.update(|s| s.state = RobotState::Paused);
        // 旧快照不受影响
        assert_eq!(before.state, RobotState::Idle);
        assert_eq!(store.robot_state(), RobotState::Paused);
    }
}
