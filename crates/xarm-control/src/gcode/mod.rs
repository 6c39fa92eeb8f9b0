//! # G-code 解释器
//!
//! 把一行文本指令映射到一次带校验的 [`XArm`] 调用：
//!
//! ```text
//! "G1 X300 Y0 Z200 F100"  →  parse  →  ('G', 1)  →  set_position(...)
//! ```
//!
//! 未知指令不会报错，而是返回 `CMD_NOT_EXIST` 和原文，由调用方决定是否继续。

pub mod dispatch;
pub mod parser;

pub use parser::GcodeLine;

use tracing::debug;
use xarm_client::XArm;
use xarm_protocol::{ApiCode, Pose, Status};

/// 一行指令的执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 只有状态码
    Status(Status),
    /// 状态码 + 查询结果
    Values(Status, Vec<f64>),
    /// 状态码 + 文本（版本号、错误提示）
    Text(Status, String),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Status(code) | Outcome::Values(code, _) | Outcome::Text(code, _) => *code,
        }
    }

    /// 是否为需要中断脚本的失败（只有单独的负状态码才算）
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Status(code) if *code < 0)
    }

    pub(crate) fn not_exist(text: &str) -> Self {
        debug!("command {} is not exist", text);
        Outcome::Text(
            ApiCode::CmdNotExist.code(),
            format!("command {} is not exist", text),
        )
    }
}

impl From<(Status, Vec<f64>)> for Outcome {
    fn from((code, values): (Status, Vec<f64>)) -> Self {
        Outcome::Values(code, values)
    }
}

impl From<(Status, f64)> for Outcome {
    fn from((code, value): (Status, f64)) -> Self {
        Outcome::Values(code, vec![value])
    }
}

impl From<(Status, Pose)> for Outcome {
    fn from((code, pose): (Status, Pose)) -> Self {
        Outcome::Values(code, pose.to_vec())
    }
}

impl From<(Status, String)> for Outcome {
    fn from((code, text): (Status, String)) -> Self {
        Outcome::Text(code, text)
    }
}

/// 限位查询：命中为 1，未命中为 0，控制器拒绝时无数据
impl From<(Status, Option<bool>)> for Outcome {
    fn from((code, hit): (Status, Option<bool>)) -> Self {
        let values = hit.map(|h| if h { 1.0 } else { 0.0 }).into_iter().collect();
        Outcome::Values(code, values)
    }
}

/// G-code 解释器
///
/// 借用一个 [`XArm`]，逐行执行。
pub struct GcodeInterpreter<'a> {
    arm: &'a mut XArm,
}

impl<'a> GcodeInterpreter<'a> {
    pub fn new(arm: &'a mut XArm) -> Self {
        Self { arm }
    }

    pub fn arm(&self) -> &XArm {
        self.arm
    }

    /// 执行一行文本指令
    pub fn execute(&mut self, line: &str) -> Outcome {
        let line = GcodeLine::parse(line);
        self.execute_parsed(&line)
    }

    /// 执行已解析的指令
    pub fn execute_parsed(&mut self, line: &GcodeLine) -> Outcome {
        let Some((letter, code)) = line.opcode() else {
            return Outcome::not_exist(line.text());
        };
        match dispatch::lookup(letter, code) {
            Some(handler) => handler(self.arm, line),
            None => Outcome::not_exist(line.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xarm_client::{MoveOptions, PoseTarget};
    use xarm_driver::mock::MockChannel;
    use xarm_driver::{LiveState, LiveStateStore};
    use xarm_protocol::{ArmCommand, Reply};

    fn setup() -> (XArm, Arc<MockChannel>) {
        let store = Arc::new(LiveStateStore::new(LiveState::ready()));
        let channel = Arc::new(MockChannel::new(store.clone()));
        (XArm::new(channel.clone(), store), channel)
    }

    #[test]
    fn test_move_line_matches_direct_call() {
        let (mut arm, channel) = setup();
        let outcome = GcodeInterpreter::new(&mut arm).execute("G1 X10 Y20 Z30 A0 B0 C0 F50");
        assert_eq!(outcome, Outcome::Status(0));
        let via_gcode = channel.last_command();

        let (mut direct, direct_channel) = setup();
        let target = PoseTarget::from_pose([10.0, 20.0, 30.0, 0.0, 0.0, 0.0]);
        assert_eq!(direct.set_position(&target, &MoveOptions::new().speed(50)), 0);
        assert_eq!(via_gcode, direct_channel.last_command());
        assert!(matches!(via_gcode, Some(ArmCommand::MoveLine { .. })));
    }

    #[test]
    fn test_blended_line_uses_radius() {
        let (mut arm, channel) = setup();
        GcodeInterpreter::new(&mut arm).execute("G9 X300 R5");
        assert!(matches!(
            channel.last_command(),
            Some(ArmCommand::MoveLineB { radius, .. }) if radius == 5.0
        ));
    }

    #[test]
    fn test_unknown_command_is_data() {
        let (mut arm, channel) = setup();
        let mut gcode = GcodeInterpreter::new(&mut arm);

        let outcome = gcode.execute("g3 x1");
        assert_eq!(
            outcome,
            Outcome::Text(-4, "command G3 X1 is not exist".to_string())
        );
        assert!(!outcome.is_failure());

        assert_eq!(gcode.execute("hello").status(), -4);
        assert_eq!(gcode.execute("").status(), -4);
        assert!(channel.commands().is_empty());
    }

    #[test]
    fn test_query_outcomes() {
        let (mut arm, channel) = setup();
        channel.set_limit_hit(true);
        let mut gcode = GcodeInterpreter::new(&mut arm);

        assert_eq!(gcode.execute("H1"), Outcome::Text(0, "v1.2.11".to_string()));
        assert_eq!(gcode.execute("H13"), Outcome::Values(0, vec![0.0]));
        assert_eq!(gcode.execute("H46 X100"), Outcome::Values(0, vec![1.0]));

        channel.push_reply("is_joint_limit", Reply::status(-1));
        assert_eq!(gcode.execute("H45 I10"), Outcome::Values(-1, vec![]));
    }

    #[test]
    fn test_failure_only_for_bare_negative_status() {
        assert!(Outcome::Status(-8).is_failure());
        assert!(!Outcome::Status(1).is_failure());
        assert!(!Outcome::Values(-1, vec![]).is_failure());
        assert!(!Outcome::Text(-4, String::new()).is_failure());
    }

    #[test]
    fn test_validation_flows_through() {
        let (mut arm, channel) = setup();
        let mut gcode = GcodeInterpreter::new(&mut arm);
        // 俯仰角超出范围
        assert_eq!(gcode.execute("G1 X300 B200"), Outcome::Status(-8));
        // 灵敏度超出 0-5
        assert_eq!(gcode.execute("H37 V9"), Outcome::Status(-8));
        assert_eq!(gcode.execute("H37 V-1"), Outcome::Status(-8));
        assert!(channel.commands().is_empty());
    }

    #[test]
    fn test_io_and_gripper_codes() {
        let (mut arm, channel) = setup();
        let mut gcode = GcodeInterpreter::new(&mut arm);

        assert_eq!(gcode.execute("M120 V300"), Outcome::Status(0));
        assert_eq!(channel.gripper_position(), 300.0);

        assert_eq!(gcode.execute("C137 I3 V7"), Outcome::Status(0));
        assert_eq!(channel.firmware().cgpio_input_functions[3], 7);

        match gcode.execute("C139") {
            Outcome::Values(0, values) => {
                assert_eq!(values.len(), 32);
                assert_eq!(values[3], 7.0);
            },
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_tgpio_analog_defaults_to_first_channel() {
        let (mut arm, channel) = setup();
        let mut gcode = GcodeInterpreter::new(&mut arm);
        for line in ["M133", "M134"] {
            gcode.execute(line);
            assert_eq!(channel.last_command(), Some(ArmCommand::GetTgpioAnalog { ionum: 0 }), "{}", line);
        }
        gcode.execute("M134 I1");
        assert_eq!(channel.last_command(), Some(ArmCommand::GetTgpioAnalog { ionum: 1 }));
    }

    #[test]
    fn test_servo_diagnostics_sequence() {
        let (mut arm, channel) = setup();
        let outcome = GcodeInterpreter::new(&mut arm).execute("D12 I0");
        assert_eq!(outcome, Outcome::Status(0));
        let names: Vec<_> = channel.commands().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["clean_error", "clean_warn", "motion_enable", "get_state", "set_brake"]);
        assert!(matches!(
            channel.last_command(),
            Some(ArmCommand::SetBrake { servo_id: 8, on: true })
        ));
    }
}
