//! 日志初始化
//!
//! 安装 `tracing-subscriber` 的 fmt 输出，并把 `log` crate 的记录桥接到 tracing。

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// 未设置 `RUST_LOG` 时的过滤规则
pub const DEFAULT_DIRECTIVE: &str = "xarm=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// 初始化日志
///
/// 可以重复调用，只有第一次生效。已有全局 subscriber 时返回 `false`。
pub fn init_logger() -> bool {
    *INSTALLED.get_or_init(|| {
        let _ = tracing_log::LogTracer::init_with_filter(log::LevelFilter::Trace);
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    })
}
