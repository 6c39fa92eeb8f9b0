//! xArm 运动 API 实例
//!
//! [`XArm`] 持有指令通道、实时状态与暂存目标。
//! 运动指令需要 `&mut self`（修改暂存目标），查询与配置只需 `&self`。
//! 跨线程急停通过 [`StopHandle`](crate::StopHandle) 完成。

use crate::guard::{self, RangeGuard};
use crate::settings::ArmSettings;
use crate::staging::{StagedMotion, StagedSnapshot};
use crate::types::MoveOptions;
use crate::wait::{MotionWait, PauseWindow, WaitConfig, WaitTarget};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use xarm_driver::{CommandChannel, LiveState, LiveStateStore};
use xarm_protocol::{ApiCode, ArmCommand, Pose, Reply, RobotState, Status, controller};
use xarm_tools::{DeviceModel, LimitsConfig};

/// 把 `Result<Status, Status>` 展开为状态码
#[inline]
pub(crate) fn into_status(result: Result<Status, Status>) -> Status {
    match result {
        Ok(code) | Err(code) => code,
    }
}

fn build_guard<'a>(
    limits: &'a LimitsConfig,
    settings: &ArmSettings,
    available: bool,
    tcp_offset: &Pose,
    world_offset: &Pose,
) -> RangeGuard<'a> {
    RangeGuard::new(&limits.ranges)
        .with_tcp_check(available && settings.check_tcp_limit, tcp_offset, world_offset)
        .with_joint_check(available && settings.check_joint_limit)
}

/// 解析固定长度的回复负载
///
/// 控制器拒绝时返回其状态码；负载不足视为接口异常。
pub(crate) fn reply_array<const N: usize>(reply: &Reply) -> Result<[f64; N], Status> {
    if !reply.is_accepted() {
        return Err(reply.code);
    }
    reply.array::<N>().map_err(|e| {
        warn!("Malformed reply: {}", e);
        ApiCode::ApiException.code()
    })
}

/// [`XArm`] 构建器
pub struct XArmBuilder {
    channel: Arc<dyn CommandChannel>,
    live: Arc<LiveStateStore>,
    settings: ArmSettings,
    limits: Option<LimitsConfig>,
    wait_config: WaitConfig,
}

impl XArmBuilder {
    pub fn settings(mut self, settings: ArmSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 轴数（同时决定内置范围表）
    pub fn axis(mut self, axis: u8) -> Self {
        self.settings.axis = axis;
        self
    }

    pub fn default_is_radian(mut self, is_radian: bool) -> Self {
        self.settings.default_is_radian = is_radian;
        self
    }

    /// 覆盖速度钳位与范围表
    pub fn limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn wait_config(mut self, config: WaitConfig) -> Self {
        self.wait_config = config;
        self
    }

    pub fn build(self) -> XArm {
        let limits = self
            .limits
            .unwrap_or_else(|| LimitsConfig::for_model(DeviceModel::from_axis(self.settings.axis)));
        XArm {
            channel: self.channel,
            live: self.live,
            settings: self.settings,
            limits,
            wait_config: self.wait_config,
            staged: StagedMotion::default(),
            tcp_offset: [0.0; 6],
            world_offset: [0.0; 6],
            stop: Arc::new(AtomicBool::new(false)),
            pause: Arc::new(PauseWindow::new()),
        }
    }
}

/// xArm 运动 API
pub struct XArm {
    pub(crate) channel: Arc<dyn CommandChannel>,
    pub(crate) live: Arc<LiveStateStore>,
    pub(crate) settings: ArmSettings,
    pub(crate) limits: LimitsConfig,
    pub(crate) wait_config: WaitConfig,
    pub(crate) staged: StagedMotion,
    /// 范围检查使用的 TCP 偏移（姿态分量为弧度）
    pub(crate) tcp_offset: Pose,
    pub(crate) world_offset: Pose,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) pause: Arc<PauseWindow>,
}

impl XArm {
    pub fn builder(channel: Arc<dyn CommandChannel>, live: Arc<LiveStateStore>) -> XArmBuilder {
        XArmBuilder {
            channel,
            live,
            settings: ArmSettings::default(),
            limits: None,
            wait_config: WaitConfig::default(),
        }
    }

    /// 默认设置（7 轴、角度单位为度）
    pub fn new(channel: Arc<dyn CommandChannel>, live: Arc<LiveStateStore>) -> Self {
        Self::builder(channel, live).build()
    }

    // ==================== 状态读取 ====================

    pub fn settings(&self) -> &ArmSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ArmSettings {
        &mut self.settings
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// 暂存目标
    pub fn staged(&self) -> &StagedMotion {
        &self.staged
    }

    pub fn axis(&self) -> u8 {
        self.settings.axis
    }

    pub fn live_state(&self) -> Arc<LiveState> {
        self.live.snapshot()
    }

    pub fn live_store(&self) -> &Arc<LiveStateStore> {
        &self.live
    }

    pub fn is_connected(&self) -> bool {
        self.live.connected()
    }

    pub fn is_ready(&self) -> bool {
        self.live.ready()
    }

    pub fn has_error(&self) -> bool {
        self.live.snapshot().has_error()
    }

    pub fn has_warn(&self) -> bool {
        self.live.snapshot().has_warn()
    }

    pub fn robot_state(&self) -> RobotState {
        self.live.robot_state()
    }

    /// 是否有未处理的急停请求
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub(crate) fn clear_stop(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }

    // ==================== 指令下发 ====================

    /// 执行一条指令；通道层失败转换为对应状态码
    pub(crate) fn call(&self, command: &ArmCommand) -> Reply {
        match self.channel.execute(command) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("{} failed on channel: {}", command.name(), e);
                Reply::status(e.status())
            },
        }
    }

    /// 需要连接的设置类指令，返回状态码
    pub(crate) fn send(&self, command: ArmCommand) -> Status {
        if let Err(code) = guard::require_connected(&self.live.snapshot()) {
            return code;
        }
        let code = self.call(&command).code;
        debug!("{}, ret={}", command.name(), code);
        code
    }

    /// 需要连接的查询类指令
    pub(crate) fn query(&self, command: ArmCommand) -> Reply {
        if let Err(code) = guard::require_connected(&self.live.snapshot()) {
            return Reply::status(code);
        }
        self.call(&command)
    }

    /// 查询固定长度的数值，失败时负载为 0
    pub(crate) fn query_array<const N: usize>(&self, command: ArmCommand) -> (Status, [f64; N]) {
        let reply = self.query(command);
        match reply_array::<N>(&reply) {
            Ok(values) => (reply.code, values),
            Err(code) => (code, [0.0; N]),
        }
    }

    /// 查询变长数值
    pub(crate) fn query_values(&self, command: ArmCommand) -> (Status, Vec<f64>) {
        let reply = self.query(command);
        (reply.code, reply.values.to_vec())
    }

    /// 查询文本（版本号等）
    pub(crate) fn query_text(&self, command: ArmCommand) -> (Status, String) {
        let reply = self.query(command);
        (reply.code, reply.text.unwrap_or_default())
    }

    /// 运动前置条件：已就绪且未暂停
    pub(crate) fn check_motion(&self) -> Result<(), Status> {
        let live = self.live.snapshot();
        guard::require_ready(&live)?;
        guard::require_not_paused(&live, self.settings.check_is_pause)
    }

    /// 范围检查是否可用（网络通道且上报开启）
    fn range_check_available(&self) -> bool {
        self.channel.is_socket() && self.live.snapshot().reporting
    }

    pub(crate) fn range_guard(&self) -> RangeGuard<'_> {
        build_guard(
            &self.limits,
            &self.settings,
            self.range_check_available(),
            &self.tcp_offset,
            &self.world_offset,
        )
    }

    /// 同时借出范围检查器和暂存目标
    pub(crate) fn guard_and_staging(&mut self) -> (RangeGuard<'_>, &mut StagedMotion) {
        let guard = build_guard(
            &self.limits,
            &self.settings,
            self.range_check_available(),
            &self.tcp_offset,
            &self.world_offset,
        );
        (guard, &mut self.staged)
    }

    pub(crate) fn default_radian(&self, is_radian: Option<bool>) -> bool {
        is_radian.unwrap_or(self.settings.default_is_radian)
    }

    // ==================== 队列与等待 ====================

    /// 等待控制器队列低于容量
    ///
    /// 进入时清除急停标志。等待期间：
    /// - 断开 → `NOT_CONNECTED`
    /// - 未就绪 → `NOT_READY`
    /// - 急停 → `EMERGENCY_STOP`
    /// - 以上都不满足但控制器报错 → 放行（由控制器拒绝）
    pub(crate) fn wait_until_cmdnum_below_max(&self) -> Result<(), Status> {
        if !self.settings.check_cmdnum_limit {
            return Ok(());
        }
        self.clear_stop();
        loop {
            let live = self.live.snapshot();
            if live.cmd_num < self.settings.max_cmd_num {
                return Ok(());
            }
            if !live.connected {
                return Err(ApiCode::NotConnected.code());
            }
            if !live.ready {
                return Err(ApiCode::NotReady.code());
            }
            if self.is_stop_requested() {
                return Err(ApiCode::EmergencyStop.code());
            }
            if live.has_error() {
                return Ok(());
            }
            thread::sleep(self.wait_config.queue_poll_interval);
        }
    }

    /// 根据错误/警告标志得出状态码
    pub(crate) fn status_from_flags(&self) -> Status {
        let live = self.live.snapshot();
        if live.has_error() {
            ApiCode::HasError.code()
        } else if live.has_warn() {
            ApiCode::HasWarn.code()
        } else {
            ApiCode::Normal.code()
        }
    }

    /// 等待当前运动结束
    ///
    /// `timeout` 为 `None` 或 0 表示不限时。返回 `HAS_ERROR`/`HAS_WARN`/`NORMAL`。
    pub fn wait_move(&self, timeout: Option<Duration>) -> Status {
        self.clear_stop();
        MotionWait::new(timeout, self.wait_config).run(self);
        self.clear_stop();
        self.status_from_flags()
    }

    /// 运动指令下发后的收尾：按需等待，或在控制器拒绝时回滚暂存目标
    pub(crate) fn complete_motion(
        &mut self,
        name: &'static str,
        code: Status,
        snapshot: StagedSnapshot,
        opts: &MoveOptions,
    ) -> Status {
        if opts.wait && controller::is_accepted(code) {
            if self.live.snapshot().reporting {
                return self.wait_move(opts.timeout);
            }
            warn!("{}: report stream is off, returning without waiting", name);
        }
        if code < 0 && !self.get_is_moving() {
            debug!("{} rejected (ret={}), staged target restored", name, code);
            self.staged.restore(&snapshot);
        }
        code
    }

    /// 查询一次控制器状态后判断是否在运动
    pub fn get_is_moving(&self) -> bool {
        let _ = self.get_state();
        self.live.robot_state().is_moving()
    }
}

impl WaitTarget for XArm {
    fn live(&self) -> Arc<LiveState> {
        self.live.snapshot()
    }

    fn stop_requested(&self) -> bool {
        self.is_stop_requested()
    }

    fn pause_window(&self) -> &PauseWindow {
        &self.pause
    }

    fn refresh_state(&self) {
        let _ = self.get_state();
    }
}
