//! 可视化程序运行
//!
//! 程序文件（例如图形化编程导出的 `app.xml`）需要先由 [`ProgramConverter`]
//! 转换成 G-code 文本，再交给解释器执行。转换器由调用方注入，默认没有。

use crate::ControlError;
use crate::script::run_lines;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use xarm_client::XArm;
use xarm_protocol::{ApiCode, Status};

/// 程序目录中的默认入口文件
pub const APP_ENTRY: &str = "app.xml";

/// 程序转换器：把程序文件转换为 G-code 文本
pub trait ProgramConverter {
    fn convert(&self, path: &Path) -> Result<String, ControlError>;
}

impl<F> ProgramConverter for F
where
    F: Fn(&Path) -> Result<String, ControlError>,
{
    fn convert(&self, path: &Path) -> Result<String, ControlError> {
        self(path)
    }
}

/// 目录路径指向其中的 [`APP_ENTRY`]
fn resolve_entry(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(APP_ENTRY)
    } else {
        path.to_path_buf()
    }
}

/// 转换并执行程序文件
///
/// # 返回
///
/// - 未连接：`NOT_CONNECTED`
/// - 文件不存在：`API_EXCEPTION`
/// - 没有转换器或转换失败：`CONVERT_FAILED`
/// - 执行中的负状态码或断开：对应状态码
pub fn run_program<P: AsRef<Path>>(
    arm: &mut XArm,
    path: P,
    converter: Option<&dyn ProgramConverter>,
    times: u32,
) -> Status {
    if !arm.is_connected() {
        return ApiCode::NotConnected.code();
    }
    let path = resolve_entry(path.as_ref());
    if !path.exists() {
        let err = ControlError::NotFound(path);
        error!("{}", err);
        return err.status();
    }
    let Some(converter) = converter else {
        error!("no program converter is installed, cannot run {}", path.display());
        return ApiCode::ConvertFailed.code();
    };

    let gcode = match converter.convert(&path) {
        Ok(gcode) => gcode,
        Err(e) => {
            error!("failed to convert {}: {}", path.display(), e);
            return ApiCode::ConvertFailed.code();
        },
    };
    let lines: Vec<String> = gcode
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    info!("run_program, path={}, lines={}, times={}", path.display(), lines.len(), times);
    let code = run_lines(arm, &lines, times);
    info!("run_program finished, ret={}", code);
    code
}
