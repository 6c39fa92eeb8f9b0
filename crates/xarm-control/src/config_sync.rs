//! # 固件配置同步
//!
//! [`FirmwareConfig`] 是控制器可持久化配置的一份快照：
//!
//! - [`FirmwareConfig::read`] 逐项读取，汇总成一份快照
//! - [`FirmwareConfig::apply`] 与控制器当前值逐字段比较，只下发不同的字段
//!
//! 所有角度类字段以弧度保存，与 `is_radian` 默认值无关。
//!
//! ```rust,ignore
//! let (code, mut config) = FirmwareConfig::read(&arm);
//! config.collision_sensitivity = 5;
//! config.apply(&mut arm);          // 只下发一条 set_collision_sensitivity
//! config.save_to_file("arm.toml")?;
//! ```

use crate::ControlError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use xarm_client::{CGPIO_CHANNELS, ReducedStates, TcpLoad, XArm};
use xarm_protocol::{Pose, Status};

/// 控制器固件配置快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    /// 碰撞灵敏度（0-5）
    pub collision_sensitivity: u8,
    /// 拖动示教灵敏度（1-5）
    pub teach_sensitivity: u8,
    pub gravity_direction: [f64; 3],
    pub tcp_offset: Pose,
    pub world_offset: Pose,
    pub tcp_maxacc: f64,
    pub tcp_jerk: f64,
    /// rad/s²
    pub joint_maxacc: f64,
    /// rad/s³
    pub joint_jerk: f64,
    /// 上报力矩（0）还是电流（1）
    pub report_tau_or_i: u8,
    pub cgpio_input_functions: [u8; CGPIO_CHANNELS],
    pub cgpio_output_functions: [u8; CGPIO_CHANNELS],
    /// `[末端 IO, 控制器 IO]`
    pub io_reset_when_stop: [bool; 2],

    // 表结构字段放在最后，TOML 要求先输出普通值
    pub tcp_load: TcpLoad,
    pub reduced_states: ReducedStates,
}

/// 汇总多个状态码：优先第一个负数，否则第一个非零值
fn worst(codes: &[Status]) -> Status {
    codes
        .iter()
        .copied()
        .find(|c| *c < 0)
        .or_else(|| codes.iter().copied().find(|c| *c != 0))
        .unwrap_or(0)
}

/// 记录 setter 结果，保留第一个负状态码
struct Applied {
    first_failure: Option<Status>,
    issued: usize,
}

impl Applied {
    fn new() -> Self {
        Self { first_failure: None, issued: 0 }
    }

    fn record(&mut self, field: &str, code: Status) {
        self.issued += 1;
        debug!("apply {}, ret={}", field, code);
        if code < 0 {
            warn!("failed to apply {}, ret={}", field, code);
            self.first_failure.get_or_insert(code);
        }
    }
}

impl FirmwareConfig {
    /// 读取控制器当前配置
    ///
    /// 返回的状态码为各项读取中最差的一个；失败的字段保持默认值。
    pub fn read(arm: &XArm) -> (Status, Self) {
        let (c0, (cgpio_input_functions, cgpio_output_functions)) = arm.get_cgpio_functions();
        let (c1, reduced_states) = arm.get_reduced_states(Some(true));
        let (c2, report_tau_or_i) = arm.get_report_tau_or_i();
        let (c3, collision_sensitivity) = arm.get_collision_sensitivity();
        let (c4, teach_sensitivity) = arm.get_teach_sensitivity();
        let (c5, gravity_direction) = arm.get_gravity_direction();
        let (c6, tcp_load) = arm.get_tcp_load();
        let (c7, tcp_offset) = arm.get_tcp_offset(Some(true));
        let (c8, world_offset) = arm.get_world_offset(Some(true));
        let (c9, tcp_maxacc) = arm.get_tcp_maxacc();
        let (c10, tcp_jerk) = arm.get_tcp_jerk();
        let (c11, joint_maxacc) = arm.get_joint_maxacc(Some(true));
        let (c12, joint_jerk) = arm.get_joint_jerk(Some(true));
        let (c13, io_reset_when_stop) = arm.get_io_reset_config();

        let code = worst(&[c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13]);
        let config = Self {
            collision_sensitivity,
            teach_sensitivity,
            gravity_direction,
            tcp_offset,
            world_offset,
            tcp_maxacc,
            tcp_jerk,
            joint_maxacc,
            joint_jerk,
            report_tau_or_i,
            cgpio_input_functions,
            cgpio_output_functions,
            io_reset_when_stop,
            tcp_load,
            reduced_states,
        };
        (code, config)
    }

    /// 把配置同步到控制器
    ///
    /// 先读取当前配置，只对不同的字段调用 setter。减速模式的子参数先于
    /// 减速模式开关下发。返回第一个失败的 setter 状态码，全部成功返回 0。
    pub fn apply(&self, arm: &mut XArm) -> Status {
        let (code, current) = Self::read(arm);
        if code < 0 {
            warn!("apply firmware config: read failed, ret={}", code);
            return code;
        }

        let mut applied = Applied::new();

        if self.collision_sensitivity != current.collision_sensitivity {
            applied.record(
                "collision_sensitivity",
                arm.set_collision_sensitivity(self.collision_sensitivity),
            );
        }
        if self.teach_sensitivity != current.teach_sensitivity {
            applied.record("teach_sensitivity", arm.set_teach_sensitivity(self.teach_sensitivity));
        }
        if self.gravity_direction != current.gravity_direction {
            applied.record("gravity_direction", arm.set_gravity_direction(self.gravity_direction));
        }
        if self.tcp_load != current.tcp_load {
            applied.record("tcp_load", arm.set_tcp_load(self.tcp_load));
        }
        if self.tcp_offset != current.tcp_offset {
            applied.record("tcp_offset", arm.set_tcp_offset(self.tcp_offset, Some(true)));
        }
        if self.tcp_maxacc != current.tcp_maxacc {
            applied.record("tcp_maxacc", arm.set_tcp_maxacc(self.tcp_maxacc));
        }
        if self.tcp_jerk != current.tcp_jerk {
            applied.record("tcp_jerk", arm.set_tcp_jerk(self.tcp_jerk));
        }
        if self.joint_maxacc != current.joint_maxacc {
            applied.record("joint_maxacc", arm.set_joint_maxacc(self.joint_maxacc, Some(true)));
        }
        if self.joint_jerk != current.joint_jerk {
            applied.record("joint_jerk", arm.set_joint_jerk(self.joint_jerk, Some(true)));
        }
        if self.world_offset != current.world_offset {
            applied.record("world_offset", arm.set_world_offset(self.world_offset, Some(true)));
        }
        if self.report_tau_or_i != current.report_tau_or_i {
            applied.record("report_tau_or_i", arm.set_report_tau_or_i(self.report_tau_or_i));
        }
        for (io_type, (want, have)) in self
            .io_reset_when_stop
            .iter()
            .zip(current.io_reset_when_stop.iter())
            .enumerate()
        {
            if want != have {
                applied.record(
                    "io_reset_when_stop",
                    arm.config_io_reset_when_stop(io_type as u8, *want),
                );
            }
        }

        self.apply_reduced(arm, &current.reduced_states, &mut applied);

        for (ionum, (want, have)) in self
            .cgpio_input_functions
            .iter()
            .zip(current.cgpio_input_functions.iter())
            .enumerate()
        {
            if want != have {
                applied.record(
                    "cgpio_input_function",
                    arm.set_cgpio_digital_input_function(ionum as u8, *want),
                );
            }
        }
        for (ionum, (want, have)) in self
            .cgpio_output_functions
            .iter()
            .zip(current.cgpio_output_functions.iter())
            .enumerate()
        {
            if want != have {
                applied.record(
                    "cgpio_output_function",
                    arm.set_cgpio_digital_output_function(ionum as u8, *want),
                );
            }
        }

        info!("apply firmware config, issued={} setter(s)", applied.issued);
        applied.first_failure.unwrap_or(0)
    }

    /// 减速模式：子参数在前，开关在后
    fn apply_reduced(&self, arm: &XArm, current: &ReducedStates, applied: &mut Applied) {
        let want = &self.reduced_states;
        if want.tcp_boundary != current.tcp_boundary {
            let boundary = want.tcp_boundary.map(f64::from);
            applied.record("reduced_tcp_boundary", arm.set_reduced_tcp_boundary(boundary));
        }
        if want.tcp_speed != current.tcp_speed {
            applied.record("reduced_tcp_speed", arm.set_reduced_max_tcp_speed(want.tcp_speed));
        }
        if want.joint_speed != current.joint_speed {
            applied.record(
                "reduced_joint_speed",
                arm.set_reduced_max_joint_speed(want.joint_speed, Some(true)),
            );
        }
        if want.joint_ranges != current.joint_ranges {
            applied.record(
                "reduced_joint_range",
                arm.set_reduced_joint_range(&want.joint_ranges, Some(true)),
            );
        }
        if want.fence_on != current.fence_on {
            applied.record("fence_on", arm.set_fense_mode(want.fence_on));
        }
        if want.collision_rebound != current.collision_rebound {
            applied.record("collision_rebound", arm.set_collision_rebound(want.collision_rebound));
        }
        if want.on != current.on {
            applied.record("reduced_mode", arm.set_reduced_mode(want.on));
        }
    }

    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ControlError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// 保存为 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ControlError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
