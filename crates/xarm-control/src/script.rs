//! G-code 脚本执行
//!
//! 逐行执行脚本文件，遇到第一个失败（单独的负状态码）或断开时停止。
//! 未知指令、查询类结果不会中断执行。

use crate::gcode::{GcodeInterpreter, Outcome};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use xarm_client::XArm;
use xarm_protocol::{ApiCode, Status};

/// 脚本执行配置
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// 整个文件的执行次数
    pub times: u32,

    /// 执行前是否重新初始化（清错、使能、设置模式与状态）
    pub init: bool,

    /// 初始化时设置的模式
    pub mode: u8,

    /// 初始化时设置的状态
    pub state: u8,

    /// 开始执行前的等待时间
    pub wait: Duration,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            times: 1,
            init: false,
            mode: 0,
            state: 0,
            wait: Duration::ZERO,
        }
    }
}

impl ScriptConfig {
    pub fn times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// 执行前以 `mode`/`state` 重新初始化
    pub fn init(mut self, mode: u8, state: u8) -> Self {
        self.init = true;
        self.mode = mode;
        self.state = state;
        self
    }

    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

/// 读取脚本并去掉空行
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read gcode file {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// 重新初始化：清错、清警告、使能、设置模式与状态
fn reinitialize(arm: &XArm, mode: u8, state: u8) {
    arm.clean_error();
    arm.clean_warn();
    arm.motion_enable(true, None);
    arm.set_mode(mode);
    arm.set_state(state);
}

/// 循环执行若干行指令
///
/// 返回第一个失败的状态码；全部执行完返回 `NORMAL`。
pub fn run_lines(arm: &mut XArm, lines: &[String], times: u32) -> Status {
    for round in 0..times {
        let mut gcode = GcodeInterpreter::new(arm);
        for line in lines {
            if !gcode.arm().is_connected() {
                error!("xArm is disconnected, script aborted");
                return ApiCode::NotConnected.code();
            }
            match gcode.execute(line) {
                Outcome::Status(code) if code < 0 => {
                    warn!("script stopped at round {}, line {:?}, ret={}", round + 1, line, code);
                    return code;
                },
                Outcome::Text(code, text) if code < 0 => {
                    warn!("{}, ret={}", text, code);
                },
                _ => {},
            }
        }
    }
    ApiCode::Normal.code()
}

/// 执行 G-code 脚本文件
///
/// # 返回
///
/// - 未连接 / 执行中断开：`NOT_CONNECTED`
/// - 文件不存在或无法读取：`API_EXCEPTION`
/// - 某行返回负状态码：该状态码
/// - 否则 `NORMAL`
pub fn run_gcode_file<P: AsRef<Path>>(arm: &mut XArm, path: P, config: &ScriptConfig) -> Status {
    if !arm.is_connected() {
        return ApiCode::NotConnected.code();
    }
    let path = path.as_ref();
    let lines = match load_script(path) {
        Ok(lines) => lines,
        Err(e) => {
            error!("{:#}", e);
            return ApiCode::ApiException.code();
        },
    };

    info!(
        "run_gcode_file, path={}, lines={}, times={}, init={}",
        path.display(),
        lines.len(),
        config.times,
        config.init
    );
    if config.init {
        reinitialize(arm, config.mode, config.state);
    }
    if !config.wait.is_zero() {
        thread::sleep(config.wait);
    }

    let code = run_lines(arm, &lines, config.times);
    info!("run_gcode_file finished, ret={}", code);
    code
}
