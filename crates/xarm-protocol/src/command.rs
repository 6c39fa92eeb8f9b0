//! 指令通道上的指令定义
//!
//! 每个变体对应控制器的一条原语（运动、查询、配置存取）。
//! 角度类参数一律为弧度，长度为毫米。

/// 笛卡尔位姿 `[x, y, z, roll, pitch, yaw]`
pub type Pose = [f64; 6];

/// 关节角（最多 7 轴，未使用的轴为 0）
pub type JointAngles = [f64; 7];

/// 减速模式关节范围（每轴一对 `[min, max]`，共 7 轴）
pub type JointRanges = [f64; 14];

/// 控制器指令
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmCommand {
    // ====== 运动 ======
    /// 直线运动
    MoveLine {
        pose: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
    },
    /// 带圆弧过渡的直线运动
    MoveLineB {
        pose: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
        radius: f64,
    },
    /// 工具坐标系下的直线运动
    MoveLineTool {
        pose: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
    },
    /// 轴角表示的直线运动（`coord`: 0 基坐标，1 工具坐标）
    MoveLineAa {
        pose: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
        coord: u8,
        relative: bool,
    },
    /// 轴角表示的笛卡尔伺服
    MoveServoCartAa {
        pose: Pose,
        speed: f64,
        acc: f64,
        tool_coord: bool,
        relative: bool,
    },
    /// 关节运动
    MoveJoint {
        angles: JointAngles,
        speed: f64,
        acc: f64,
        mvtime: f64,
    },
    /// 关节伺服
    MoveServoJ {
        angles: JointAngles,
        speed: f64,
        acc: f64,
        mvtime: f64,
    },
    /// 笛卡尔伺服（`mvtime` 槽位携带工具坐标标志）
    MoveServoCartesian {
        pose: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
    },
    /// 圆弧运动
    MoveCircle {
        pose1: Pose,
        pose2: Pose,
        speed: f64,
        acc: f64,
        mvtime: f64,
        percent: f64,
    },
    /// 回零
    MoveGohome { speed: f64, acc: f64, mvtime: f64 },
    /// 控制器端暂停指令（秒）
    SleepInstruction { seconds: f64 },

    // ====== 运动学与限位查询 ======
    GetIk { pose: Pose },
    GetFk { angles: JointAngles },
    IsTcpLimit { pose: Pose },
    IsJointLimit { angles: JointAngles },

    // ====== 状态 ======
    GetVersion,
    ShutdownSystem { value: i32 },
    /// `servo_id` 8 表示全部关节
    MotionEnable { servo_id: u8, enable: bool },
    SetState { state: u8 },
    GetState,
    SetMode { mode: u8 },
    GetCmdNum,
    GetErrWarnCode,
    CleanError,
    CleanWarn,
    /// `on = true` 表示松开抱闸
    SetBrake { servo_id: u8, on: bool },
    GetPosition,
    GetServoAngle,
    CleanConf,
    SaveConf,

    // ====== 配置存取 ======
    SetTcpJerk { jerk: f64 },
    GetTcpJerk,
    SetTcpMaxAcc { acc: f64 },
    GetTcpMaxAcc,
    SetJointJerk { jerk: f64 },
    GetJointJerk,
    SetJointMaxAcc { acc: f64 },
    GetJointMaxAcc,
    SetTcpOffset { offset: Pose },
    GetTcpOffset,
    SetWorldOffset { offset: Pose },
    GetWorldOffset,
    SetTcpLoad { weight: f64, center: [f64; 3] },
    GetTcpLoad,
    SetCollisionSensitivity { value: u8 },
    GetCollisionSensitivity,
    SetTeachSensitivity { value: u8 },
    GetTeachSensitivity,
    SetGravityDirection { direction: [f64; 3] },
    GetGravityDirection,
    SetReportTauOrI { value: u8 },
    GetReportTauOrI,

    // ====== 减速模式 ======
    SetReducedMode { on: bool },
    SetReducedLineSpeed { speed: f64 },
    SetReducedJointSpeed { speed: f64 },
    /// `[x_max, x_min, y_max, y_min, z_max, z_min]`
    SetXyzLimits { limits: [i32; 6] },
    SetReducedJointRange { ranges: JointRanges },
    SetFenceOn { on: bool },
    SetCollisionRebound { on: bool },
    /// 回复：`[on, boundary×6, tcp_speed, joint_speed, ranges×14, fence, rebound]`
    GetReducedStates,

    // ====== 控制器 / 末端 IO ======
    GetCgpioDigital,
    GetCgpioAnalog { ionum: u8 },
    SetCgpioDigital { ionum: u8, value: u8 },
    SetCgpioAnalog { ionum: u8, value: f64 },
    SetCgpioInputFunction { ionum: u8, function: u8 },
    SetCgpioOutputFunction { ionum: u8, function: u8 },
    /// 回复：`[input_function×16, output_function×16]`
    GetCgpioFunctions,
    GetTgpioDigital,
    SetTgpioDigital { ionum: u8, value: u8 },
    GetTgpioAnalog { ionum: u8 },
    GetTgpioVersion,
    /// `io_type`: 0 控制器 IO，1 末端 IO
    ConfigIoResetWhenStop { io_type: u8, on: bool },
    /// 回复：`[cgpio_reset, tgpio_reset]`
    GetIoResetConfig,

    // ====== 夹爪 ======
    SetGripperEnable { enable: bool },
    SetGripperMode { mode: u8 },
    SetGripperZero,
    GetGripperPosition,
    SetGripperPosition { pos: f64 },
    SetGripperSpeed { speed: f64 },
    GetGripperErrCode,
    CleanGripperError,
    GetGripperVersion,

    // ====== 关节寄存器与诊断 ======
    SetServoAddr16 { servo_id: u8, addr: u16, value: i32 },
    GetServoAddr16 { servo_id: u8, addr: u16 },
    SetServoAddr32 { servo_id: u8, addr: u16, value: i32 },
    GetServoAddr32 { servo_id: u8, addr: u16 },
    SetServoZero { servo_id: u8 },
    GetServoDebugMsg,
    GetServoErrorCode { servo_id: u8 },
    CleanServoPvlErr { servo_id: u8 },
    GetServoAllPids { servo_id: u8 },
    GetServoVersion { servo_id: u8 },
}

impl ArmCommand {
    /// 原语名称（用于日志）
    pub fn name(&self) -> &'static str {
        use ArmCommand::*;
        match self {
            MoveLine { .. } => "move_line",
            MoveLineB { .. } => "move_lineb",
            MoveLineTool { .. } => "move_line_tool",
            MoveLineAa { .. } => "move_line_aa",
            MoveServoCartAa { .. } => "move_servo_cart_aa",
            MoveJoint { .. } => "move_joint",
            MoveServoJ { .. } => "move_servoj",
            MoveServoCartesian { .. } => "move_servo_cartesian",
            MoveCircle { .. } => "move_circle",
            MoveGohome { .. } => "move_gohome",
            SleepInstruction { .. } => "sleep_instruction",
            GetIk { .. } => "get_ik",
            GetFk { .. } => "get_fk",
            IsTcpLimit { .. } => "is_tcp_limit",
            IsJointLimit { .. } => "is_joint_limit",
            GetVersion => "get_version",
            ShutdownSystem { .. } => "shutdown_system",
            MotionEnable { .. } => "motion_enable",
            SetState { .. } => "set_state",
            GetState => "get_state",
            SetMode { .. } => "set_mode",
            GetCmdNum => "get_cmdnum",
            GetErrWarnCode => "get_err_warn_code",
            CleanError => "clean_error",
            CleanWarn => "clean_warn",
            SetBrake { .. } => "set_brake",
            GetPosition => "get_position",
            GetServoAngle => "get_servo_angle",
            CleanConf => "clean_conf",
            SaveConf => "save_conf",
            SetTcpJerk { .. } => "set_tcp_jerk",
            GetTcpJerk => "get_tcp_jerk",
            SetTcpMaxAcc { .. } => "set_tcp_maxacc",
            GetTcpMaxAcc => "get_tcp_maxacc",
            SetJointJerk { .. } => "set_joint_jerk",
            GetJointJerk => "get_joint_jerk",
            SetJointMaxAcc { .. } => "set_joint_maxacc",
            GetJointMaxAcc => "get_joint_maxacc",
            SetTcpOffset { .. } => "set_tcp_offset",
            GetTcpOffset => "get_tcp_offset",
            SetWorldOffset { .. } => "set_world_offset",
            GetWorldOffset => "get_world_offset",
            SetTcpLoad { .. } => "set_tcp_load",
            GetTcpLoad => "get_tcp_load",
            SetCollisionSensitivity { .. } => "set_collision_sensitivity",
            GetCollisionSensitivity => "get_collision_sensitivity",
            SetTeachSensitivity { .. } => "set_teach_sensitivity",
            GetTeachSensitivity => "get_teach_sensitivity",
            SetGravityDirection { .. } => "set_gravity_direction",
            GetGravityDirection => "get_gravity_direction",
            SetReportTauOrI { .. } => "set_report_tau_or_i",
            GetReportTauOrI => "get_report_tau_or_i",
            SetReducedMode { .. } => "set_reduced_mode",
            SetReducedLineSpeed { .. } => "set_reduced_linespeed",
            SetReducedJointSpeed { .. } => "set_reduced_jointspeed",
            SetXyzLimits { .. } => "set_xyz_limits",
            SetReducedJointRange { .. } => "set_reduced_jrange",
            SetFenceOn { .. } => "set_fense_on",
            SetCollisionRebound { .. } => "set_collis_reb",
            GetReducedStates => "get_reduced_states",
            GetCgpioDigital => "get_cgpio_digital",
            GetCgpioAnalog { .. } => "get_cgpio_analog",
            SetCgpioDigital { .. } => "set_cgpio_digital",
            SetCgpioAnalog { .. } => "set_cgpio_analog",
            SetCgpioInputFunction { .. } => "set_cgpio_digital_input_function",
            SetCgpioOutputFunction { .. } => "set_cgpio_digital_output_function",
            GetCgpioFunctions => "get_cgpio_state",
            GetTgpioDigital => "get_tgpio_digital",
            SetTgpioDigital { .. } => "set_tgpio_digital",
            GetTgpioAnalog { .. } => "get_tgpio_analog",
            GetTgpioVersion => "get_tgpio_version",
            ConfigIoResetWhenStop { .. } => "config_io_reset_when_stop",
            GetIoResetConfig => "get_io_reset_config",
            SetGripperEnable { .. } => "set_gripper_enable",
            SetGripperMode { .. } => "set_gripper_mode",
            SetGripperZero => "set_gripper_zero",
            GetGripperPosition => "get_gripper_position",
            SetGripperPosition { .. } => "set_gripper_position",
            SetGripperSpeed { .. } => "set_gripper_speed",
            GetGripperErrCode => "get_gripper_err_code",
            CleanGripperError => "clean_gripper_error",
            GetGripperVersion => "get_gripper_version",
            SetServoAddr16 { .. } => "set_servo_addr_16",
            GetServoAddr16 { .. } => "get_servo_addr_16",
            SetServoAddr32 { .. } => "set_servo_addr_32",
            GetServoAddr32 { .. } => "get_servo_addr_32",
            SetServoZero { .. } => "set_servo_zero",
            GetServoDebugMsg => "get_servo_debug_msg",
            GetServoErrorCode { .. } => "get_servo_error_code",
            CleanServoPvlErr { .. } => "clean_servo_pvl_err",
            GetServoAllPids { .. } => "get_servo_all_pids",
            GetServoVersion { .. } => "get_servo_version",
        }
    }

    /// 是否为运动指令（会进入控制器运动队列）
    pub fn is_motion(&self) -> bool {
        use ArmCommand::*;
        matches!(
            self,
            MoveLine { .. }
                | MoveLineB { .. }
                | MoveLineTool { .. }
                | MoveLineAa { .. }
                | MoveServoCartAa { .. }
                | MoveJoint { .. }
                | MoveServoJ { .. }
                | MoveServoCartesian { .. }
                | MoveCircle { .. }
                | MoveGohome { .. }
                | SleepInstruction { .. }
        )
    }

    /// 是否为固件配置的写操作（配置同步只会发出这些指令）
    pub fn is_config_setter(&self) -> bool {
        use ArmCommand::*;
        matches!(
            self,
            SetTcpJerk { .. }
                | SetTcpMaxAcc { .. }
                | SetJointJerk { .. }
                | SetJointMaxAcc { .. }
                | SetTcpOffset { .. }
                | SetWorldOffset { .. }
                | SetTcpLoad { .. }
                | SetCollisionSensitivity { .. }
                | SetTeachSensitivity { .. }
                | SetGravityDirection { .. }
                | SetReportTauOrI { .. }
                | SetReducedMode { .. }
                | SetReducedLineSpeed { .. }
                | SetReducedJointSpeed { .. }
                | SetXyzLimits { .. }
                | SetReducedJointRange { .. }
                | SetFenceOn { .. }
                | SetCollisionRebound { .. }
                | SetCgpioInputFunction { .. }
                | SetCgpioOutputFunction { .. }
                | ConfigIoResetWhenStop { .. }
        )
    }
}
