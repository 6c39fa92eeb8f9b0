//! IO、夹爪与关节寄存器指令的转发

use crate::XArm;
use xarm_protocol::{ArmCommand, Status};

/// 控制器数字 IO 路数
pub const CGPIO_CHANNELS: usize = 16;

impl XArm {
    // ==================== 控制器 IO ====================

    pub fn get_cgpio_digital(&self) -> (Status, Vec<f64>) {
        self.query_values(ArmCommand::GetCgpioDigital)
    }

    pub fn get_cgpio_analog(&self, ionum: u8) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetCgpioAnalog { ionum });
        (code, v)
    }

    pub fn set_cgpio_digital(&self, ionum: u8, value: u8) -> Status {
        self.send(ArmCommand::SetCgpioDigital { ionum, value })
    }

    pub fn set_cgpio_analog(&self, ionum: u8, value: f64) -> Status {
        self.send(ArmCommand::SetCgpioAnalog { ionum, value })
    }

    pub fn set_cgpio_digital_input_function(&self, ionum: u8, function: u8) -> Status {
        self.send(ArmCommand::SetCgpioInputFunction { ionum, function })
    }

    pub fn set_cgpio_digital_output_function(&self, ionum: u8, function: u8) -> Status {
        self.send(ArmCommand::SetCgpioOutputFunction { ionum, function })
    }

    /// 控制器 IO 功能配置 `(输入功能, 输出功能)`
    pub fn get_cgpio_functions(&self) -> (Status, ([u8; CGPIO_CHANNELS], [u8; CGPIO_CHANNELS])) {
        let (code, values) = self.query_array::<32>(ArmCommand::GetCgpioFunctions);
        let mut inputs = [0u8; CGPIO_CHANNELS];
        let mut outputs = [0u8; CGPIO_CHANNELS];
        for (i, v) in values.iter().enumerate() {
            if i < CGPIO_CHANNELS {
                inputs[i] = *v as u8;
            } else {
                outputs[i - CGPIO_CHANNELS] = *v as u8;
            }
        }
        (code, (inputs, outputs))
    }

    /// 停止时是否复位 IO（`io_type` 0 为末端 IO，1 为控制器 IO）
    pub fn config_io_reset_when_stop(&self, io_type: u8, on: bool) -> Status {
        self.send(ArmCommand::ConfigIoResetWhenStop { io_type, on })
    }

    pub fn get_io_reset_config(&self) -> (Status, [bool; 2]) {
        let (code, values) = self.query_array::<2>(ArmCommand::GetIoResetConfig);
        (code, values.map(|v| v != 0.0))
    }

    // ==================== 末端 IO ====================

    pub fn get_tgpio_digital(&self) -> (Status, Vec<f64>) {
        self.query_values(ArmCommand::GetTgpioDigital)
    }

    pub fn set_tgpio_digital(&self, ionum: u8, value: u8) -> Status {
        self.send(ArmCommand::SetTgpioDigital { ionum, value })
    }

    pub fn get_tgpio_analog(&self, ionum: u8) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetTgpioAnalog { ionum });
        (code, v)
    }

    pub fn get_tgpio_version(&self) -> (Status, String) {
        self.query_text(ArmCommand::GetTgpioVersion)
    }

    // ==================== 夹爪 ====================

    pub fn set_gripper_enable(&self, enable: bool) -> Status {
        self.send(ArmCommand::SetGripperEnable { enable })
    }

    pub fn set_gripper_mode(&self, mode: u8) -> Status {
        self.send(ArmCommand::SetGripperMode { mode })
    }

    pub fn set_gripper_zero(&self) -> Status {
        self.send(ArmCommand::SetGripperZero)
    }

    pub fn get_gripper_position(&self) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetGripperPosition);
        (code, v)
    }

    pub fn set_gripper_position(&self, pos: f64) -> Status {
        self.send(ArmCommand::SetGripperPosition { pos })
    }

    pub fn set_gripper_speed(&self, speed: f64) -> Status {
        self.send(ArmCommand::SetGripperSpeed { speed })
    }

    pub fn get_gripper_err_code(&self) -> (Status, i32) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetGripperErrCode);
        (code, v as i32)
    }

    pub fn clean_gripper_error(&self) -> Status {
        self.send(ArmCommand::CleanGripperError)
    }

    pub fn get_gripper_version(&self) -> (Status, String) {
        self.query_text(ArmCommand::GetGripperVersion)
    }

    // ==================== 关节寄存器与诊断 ====================

    pub fn set_servo_addr_16(&self, servo_id: u8, addr: u16, value: i32) -> Status {
        self.send(ArmCommand::SetServoAddr16 { servo_id, addr, value })
    }

    pub fn get_servo_addr_16(&self, servo_id: u8, addr: u16) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetServoAddr16 { servo_id, addr });
        (code, v)
    }

    pub fn set_servo_addr_32(&self, servo_id: u8, addr: u16, value: i32) -> Status {
        self.send(ArmCommand::SetServoAddr32 { servo_id, addr, value })
    }

    pub fn get_servo_addr_32(&self, servo_id: u8, addr: u16) -> (Status, f64) {
        let (code, [v]) = self.query_array::<1>(ArmCommand::GetServoAddr32 { servo_id, addr });
        (code, v)
    }

    /// 把关节当前位置设为零点
    pub fn set_servo_zero(&self, servo_id: u8) -> Status {
        self.send(ArmCommand::SetServoZero { servo_id })
    }

    pub fn get_servo_debug_msg(&self) -> (Status, Vec<f64>) {
        self.query_values(ArmCommand::GetServoDebugMsg)
    }

    pub fn get_servo_error_code(&self, servo_id: u8) -> (Status, Vec<f64>) {
        self.query_values(ArmCommand::GetServoErrorCode { servo_id })
    }

    /// 清除关节位置/速度跟随误差
    pub fn clean_servo_pvl_err(&self, servo_id: u8) -> Status {
        self.send(ArmCommand::CleanServoPvlErr { servo_id })
    }

    pub fn get_servo_all_pids(&self, servo_id: u8) -> (Status, Vec<f64>) {
        self.query_values(ArmCommand::GetServoAllPids { servo_id })
    }

    pub fn get_servo_version(&self, servo_id: u8) -> (Status, String) {
        self.query_text(ArmCommand::GetServoVersion { servo_id })
    }
}
