//! Mock 指令通道（无硬件依赖）
//!
//! 记录下发的每一条指令，并模拟一个最小化的控制器：
//! - 运动指令更新内部位姿/关节角
//! - 状态指令（使能、状态、清错）回写到 [`LiveStateStore`]
//! - 固件配置的 get/set 读写内部存储
//!
//! 测试可以为指定原语预置回复，覆盖默认的模拟行为。

use crate::{CommandChannel, DriverError, LiveStateStore};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use xarm_protocol::{ArmCommand, JointAngles, JointRanges, Pose, Reply, RobotState};

/// 回零后的默认位姿
pub const HOME_POSE: Pose = [201.5, 0.0, 140.5, std::f64::consts::PI, 0.0, 0.0];

/// 模拟控制器中保存的固件配置
#[derive(Debug, Clone, PartialEq)]
pub struct MockFirmware {
    pub tcp_jerk: f64,
    pub tcp_maxacc: f64,
    pub joint_jerk: f64,
    pub joint_maxacc: f64,
    pub tcp_offset: Pose,
    pub world_offset: Pose,
    pub tcp_load_weight: f64,
    pub tcp_load_center: [f64; 3],
    pub collision_sensitivity: u8,
    pub teach_sensitivity: u8,
    pub gravity_direction: [f64; 3],
    pub report_tau_or_i: u8,
    pub reduced_mode: bool,
    pub tcp_boundary: [i32; 6],
    pub reduced_tcp_speed: f64,
    pub reduced_joint_speed: f64,
    pub reduced_joint_range: JointRanges,
    pub fence_on: bool,
    pub collision_rebound: bool,
    pub cgpio_input_functions: [u8; 16],
    pub cgpio_output_functions: [u8; 16],
    pub io_reset_when_stop: [bool; 2],
}

impl Default for MockFirmware {
    fn default() -> Self {
        Self {
            tcp_jerk: 10000.0,
            tcp_maxacc: 50000.0,
            joint_jerk: 500.0,
            joint_maxacc: 20.0,
            tcp_offset: [0.0; 6],
            world_offset: [0.0; 6],
            tcp_load_weight: 0.0,
            tcp_load_center: [0.0; 3],
            collision_sensitivity: 3,
            teach_sensitivity: 3,
            gravity_direction: [0.0, 0.0, -1.0],
            report_tau_or_i: 0,
            reduced_mode: false,
            tcp_boundary: [0; 6],
            reduced_tcp_speed: 250.0,
            reduced_joint_speed: 1.0,
            reduced_joint_range: [0.0; 14],
            fence_on: false,
            collision_rebound: false,
            cgpio_input_functions: [0; 16],
            cgpio_output_functions: [0; 16],
            io_reset_when_stop: [false; 2],
        }
    }
}

struct MockInner {
    log: Vec<ArmCommand>,
    scripted: HashMap<&'static str, VecDeque<Reply>>,
    firmware: MockFirmware,
    position: Pose,
    angles: JointAngles,
    enabled: bool,
    limit_hit: bool,
    gripper_position: f64,
}

/// Mock 指令通道
pub struct MockChannel {
    live: Arc<LiveStateStore>,
    inner: Mutex<MockInner>,
    socket: AtomicBool,
}

impl MockChannel {
    /// 创建 Mock 通道，状态回写到 `live`
    pub fn new(live: Arc<LiveStateStore>) -> Self {
        let enabled = live.ready();
        Self {
            live,
            inner: Mutex::new(MockInner {
                log: Vec::new(),
                scripted: HashMap::new(),
                firmware: MockFirmware::default(),
                position: HOME_POSE,
                angles: [0.0; 7],
                enabled,
                limit_hit: false,
                gripper_position: 0.0,
            }),
            socket: AtomicBool::new(true),
        }
    }

    /// 关联的实时状态存储
    pub fn live(&self) -> &Arc<LiveStateStore> {
        &self.live
    }

    /// 已下发的全部指令
    pub fn commands(&self) -> Vec<ArmCommand> {
        self.inner.lock().log.clone()
    }

    /// 取出并清空指令记录
    pub fn take_commands(&self) -> Vec<ArmCommand> {
        std::mem::take(&mut self.inner.lock().log)
    }

    /// 指定原语被调用的次数
    pub fn count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .log
            .iter()
            .filter(|c| c.name() == name)
            .count()
    }

    /// 最后一条指令
    pub fn last_command(&self) -> Option<ArmCommand> {
        self.inner.lock().log.last().cloned()
    }

    /// 为指定原语预置一次回复（按 FIFO 消费）
    pub fn push_reply(&self, name: &'static str, reply: Reply) {
        self.inner
            .lock()
            .scripted
            .entry(name)
            .or_default()
            .push_back(reply);
    }

    /// `is_tcp_limit` / `is_joint_limit` 的查询结果
    pub fn set_limit_hit(&self, hit: bool) {
        self.inner.lock().limit_hit = hit;
    }

    /// 设置通道类型（非 socket 通道关闭本地限位检查）
    pub fn set_socket(&self, socket: bool) {
        self.socket.store(socket, Ordering::Relaxed);
    }

    pub fn firmware(&self) -> MockFirmware {
        self.inner.lock().firmware.clone()
    }

    pub fn set_firmware(&self, firmware: MockFirmware) {
        self.inner.lock().firmware = firmware;
    }

    /// 模拟控制器当前位姿
    pub fn position(&self) -> Pose {
        self.inner.lock().position
    }

    /// 模拟控制器当前关节角
    pub fn angles(&self) -> JointAngles {
        self.inner.lock().angles
    }

    pub fn set_angles(&self, angles: JointAngles) {
        self.inner.lock().angles = angles;
    }

    pub fn gripper_position(&self) -> f64 {
        self.inner.lock().gripper_position
    }
}

impl CommandChannel for MockChannel {
    fn execute(&self, command: &ArmCommand) -> Result<Reply, DriverError> {
        if !self.live.connected() {
            return Err(DriverError::ChannelClosed);
        }
        let mut inner = self.inner.lock();
        inner.log.push(command.clone());
        if let Some(reply) = inner
            .scripted
            .get_mut(command.name())
            .and_then(VecDeque::pop_front)
        {
            return Ok(reply);
        }
        Ok(inner.simulate(command, &self.live))
    }

    fn is_socket(&self) -> bool {
        self.socket.load(Ordering::Relaxed)
    }
}

fn flag(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}

impl MockInner {
    fn simulate(&mut self, command: &ArmCommand, live: &LiveStateStore) -> Reply {
        use ArmCommand::*;
        let fw = &mut self.firmware;
        match command {
            // ====== 运动 ======
            MoveLine { pose, .. } | MoveLineB { pose, .. } | MoveServoCartesian { pose, .. } => {
                self.position = *pose;
                Reply::status(0)
            }
            MoveJoint { angles, .. } | MoveServoJ { angles, .. } => {
                self.angles = *angles;
                Reply::status(0)
            }
            MoveGohome { .. } => {
                self.angles = [0.0; 7];
                self.position = HOME_POSE;
                Reply::status(0)
            }
            GetIk { .. } => Reply::ok(self.angles),
            GetFk { .. } => Reply::ok(self.position),
            IsTcpLimit { .. } | IsJointLimit { .. } => Reply::ok([flag(self.limit_hit)]),

            // ====== 状态 ======
            GetVersion => Reply::text("v1.2.11"),
            MotionEnable { enable, .. } => {
                self.enabled = *enable;
                if !*enable {
                    live.update(|s| s.ready = false);
                }
                Reply::status(0)
            }
            SetState { state } => {
                let enabled = self.enabled;
                live.update(|s| match *state {
                    0 => {
                        s.state = RobotState::Idle;
                        s.ready = enabled && s.error_code == 0;
                    }
                    other => s.state = RobotState::from_code(other as i64),
                });
                Reply::status(0)
            }
            GetState => Reply::ok([live.robot_state().code() as f64]),
            SetMode { mode } => {
                live.update(|s| s.mode = *mode);
                Reply::status(0)
            }
            GetCmdNum => Reply::ok([live.snapshot().cmd_num as f64]),
            GetErrWarnCode => {
                let snap = live.snapshot();
                Reply::ok([snap.error_code as f64, snap.warn_code as f64])
            }
            CleanError => {
                live.update(|s| s.error_code = 0);
                Reply::status(0)
            }
            CleanWarn => {
                live.update(|s| s.warn_code = 0);
                Reply::status(0)
            }
            GetPosition => Reply::ok(self.position),
            GetServoAngle => Reply::ok(self.angles),

            // ====== 固件配置 ======
            SetTcpJerk { jerk } => set(&mut fw.tcp_jerk, *jerk),
            GetTcpJerk => Reply::ok([fw.tcp_jerk]),
            SetTcpMaxAcc { acc } => set(&mut fw.tcp_maxacc, *acc),
            GetTcpMaxAcc => Reply::ok([fw.tcp_maxacc]),
            SetJointJerk { jerk } => set(&mut fw.joint_jerk, *jerk),
            GetJointJerk => Reply::ok([fw.joint_jerk]),
            SetJointMaxAcc { acc } => set(&mut fw.joint_maxacc, *acc),
            GetJointMaxAcc => Reply::ok([fw.joint_maxacc]),
            SetTcpOffset { offset } => set(&mut fw.tcp_offset, *offset),
            GetTcpOffset => Reply::ok(fw.tcp_offset),
            SetWorldOffset { offset } => set(&mut fw.world_offset, *offset),
            GetWorldOffset => Reply::ok(fw.world_offset),
            SetTcpLoad { weight, center } => {
                fw.tcp_load_weight = *weight;
                set(&mut fw.tcp_load_center, *center)
            }
            GetTcpLoad => Reply::ok(
                std::iter::once(fw.tcp_load_weight).chain(fw.tcp_load_center.iter().copied()),
            ),
            SetCollisionSensitivity { value } => set(&mut fw.collision_sensitivity, *value),
            GetCollisionSensitivity => Reply::ok([fw.collision_sensitivity as f64]),
            SetTeachSensitivity { value } => set(&mut fw.teach_sensitivity, *value),
            GetTeachSensitivity => Reply::ok([fw.teach_sensitivity as f64]),
            SetGravityDirection { direction } => set(&mut fw.gravity_direction, *direction),
            GetGravityDirection => Reply::ok(fw.gravity_direction),
            SetReportTauOrI { value } => set(&mut fw.report_tau_or_i, *value),
            GetReportTauOrI => Reply::ok([fw.report_tau_or_i as f64]),

            // ====== 减速模式 ======
            SetReducedMode { on } => set(&mut fw.reduced_mode, *on),
            SetReducedLineSpeed { speed } => set(&mut fw.reduced_tcp_speed, *speed),
            SetReducedJointSpeed { speed } => set(&mut fw.reduced_joint_speed, *speed),
            SetXyzLimits { limits } => set(&mut fw.tcp_boundary, *limits),
            SetReducedJointRange { ranges } => set(&mut fw.reduced_joint_range, *ranges),
            SetFenceOn { on } => set(&mut fw.fence_on, *on),
            SetCollisionRebound { on } => set(&mut fw.collision_rebound, *on),
            GetReducedStates => {
                let mut values = vec![flag(fw.reduced_mode)];
                values.extend(fw.tcp_boundary.iter().map(|v| *v as f64));
                values.push(fw.reduced_tcp_speed);
                values.push(fw.reduced_joint_speed);
                values.extend(fw.reduced_joint_range.iter().copied());
                values.push(flag(fw.fence_on));
                values.push(flag(fw.collision_rebound));
                Reply::ok(values)
            }

            // ====== IO ======
            SetCgpioInputFunction { ionum, function } => {
                if let Some(slot) = fw.cgpio_input_functions.get_mut(*ionum as usize) {
                    *slot = *function;
                }
                Reply::status(0)
            }
            SetCgpioOutputFunction { ionum, function } => {
                if let Some(slot) = fw.cgpio_output_functions.get_mut(*ionum as usize) {
                    *slot = *function;
                }
                Reply::status(0)
            }
            GetCgpioFunctions => Reply::ok(
                fw.cgpio_input_functions
                    .iter()
                    .chain(fw.cgpio_output_functions.iter())
                    .map(|v| *v as f64),
            ),
            ConfigIoResetWhenStop { io_type, on } => {
                if let Some(slot) = fw.io_reset_when_stop.get_mut(*io_type as usize) {
                    *slot = *on;
                }
                Reply::status(0)
            }
            GetIoResetConfig => Reply::ok(fw.io_reset_when_stop.map(flag)),

            // ====== 夹爪 ======
            SetGripperPosition { pos } => {
                self.gripper_position = *pos;
                Reply::status(0)
            }
            GetGripperPosition => Reply::ok([self.gripper_position]),

            _ => Reply::status(0),
        }
    }
}

fn set<T>(slot: &mut T, value: T) -> Reply {
    *slot = value;
    Reply::status(0)
}
