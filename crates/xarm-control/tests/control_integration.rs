//! 控制层集成测试：G-code 与直接调用一致、脚本执行、配置收敛

use std::fs;
use std::path::Path;
use std::sync::Arc;
use xarm_client::{JointTarget, MoveOptions, ServoTarget, XArm};
use xarm_control::{
    ControlError, FirmwareConfig, GcodeInterpreter, Outcome, ProgramConverter, ScriptConfig,
    run_gcode_file, run_program,
};
use xarm_driver::mock::MockChannel;
use xarm_driver::{LiveState, LiveStateStore};
use xarm_protocol::ArmCommand;

fn setup() -> (XArm, Arc<MockChannel>) {
    let live = Arc::new(LiveStateStore::new(LiveState::ready()));
    let channel = Arc::new(MockChannel::new(live.clone()));
    (XArm::new(channel.clone(), live), channel)
}

fn setters(channel: &MockChannel) -> Vec<ArmCommand> {
    channel
        .commands()
        .into_iter()
        .filter(|c| c.is_config_setter())
        .collect()
}

#[test]
fn test_joint_line_matches_direct_call() {
    let (mut arm, channel) = setup();
    let outcome = GcodeInterpreter::new(&mut arm).execute("G7 I10 J-20 K30 F20");
    assert_eq!(outcome, Outcome::Status(0));

    let (mut direct, direct_channel) = setup();
    let target = JointTarget::new().joint(0, 10.0).joint(1, -20.0).joint(2, 30.0);
    let code = direct.set_servo_angle(&ServoTarget::All(target), &MoveOptions::new().speed(20));
    assert_eq!(code, 0);
    assert_eq!(channel.last_command(), direct_channel.last_command());
}

#[test]
fn test_staged_values_carry_between_lines() {
    let (mut arm, _) = setup();
    let mut gcode = GcodeInterpreter::new(&mut arm);
    assert_eq!(gcode.execute("G1 X300 Y10 Z200"), Outcome::Status(0));
    assert_eq!(gcode.execute("G1 Z250"), Outcome::Status(0));
    let pose = gcode.arm().staged().pose();
    assert_eq!(pose[..3], [300.0, 10.0, 250.0]);
}

#[test]
fn test_script_file_with_init() {
    let (mut arm, channel) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pick.gcode");
    fs::write(&path, "G1 X300 Z200 F100\nG4 T0\nG8\n").unwrap();

    let config = ScriptConfig::default().init(0, 0).times(2);
    assert_eq!(run_gcode_file(&mut arm, &path, &config), 0);
    assert_eq!(channel.count("clean_error"), 1);
    assert_eq!(channel.count("move_line"), 2);
    assert_eq!(channel.count("sleep_instruction"), 2);
    assert_eq!(channel.count("move_gohome"), 2);
}

#[test]
fn test_config_convergence() {
    let (mut arm, channel) = setup();
    let (code, current) = FirmwareConfig::read(&arm);
    assert_eq!(code, 0);

    channel.take_commands();
    assert_eq!(current.apply(&mut arm), 0);
    assert!(setters(&channel).is_empty());

    let mut desired = current.clone();
    desired.collision_sensitivity = 5;
    channel.take_commands();
    assert_eq!(desired.apply(&mut arm), 0);
    let issued = setters(&channel);
    assert_eq!(issued, [ArmCommand::SetCollisionSensitivity { value: 5 }]);

    // 同步后读取结果与期望一致
    assert_eq!(FirmwareConfig::read(&arm).1, desired);
}

#[test]
fn test_config_sync_between_arms() {
    let (source, source_channel) = setup();
    let mut fw = source_channel.firmware();
    fw.tcp_offset = [0.0, 0.0, 120.0, 0.0, 0.0, 0.0];
    fw.io_reset_when_stop = [true, false];
    fw.reduced_mode = true;
    source_channel.set_firmware(fw);
    let (_, config) = FirmwareConfig::read(&source);

    let (mut target, target_channel) = setup();
    assert_eq!(config.apply(&mut target), 0);
    let names: Vec<_> = setters(&target_channel).iter().map(|c| c.name()).collect();
    assert_eq!(names, ["set_tcp_offset", "config_io_reset_when_stop", "set_reduced_mode"]);
    assert_eq!(FirmwareConfig::read(&target).1, config);
}

#[test]
fn test_program_runner_with_closure_converter() {
    let (mut arm, channel) = setup();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.xml"), "<xml/>").unwrap();

    let converter = |path: &Path| -> Result<String, ControlError> {
        if path.ends_with("app.xml") {
            Ok("G1 X300\nG1 X400 B200\nG8".to_string())
        } else {
            Err(ControlError::Convert(path.display().to_string()))
        }
    };
    let code = run_program(&mut arm, dir.path(), Some(&converter as &dyn ProgramConverter), 1);
    assert_eq!(code, -8);
    assert_eq!(channel.count("move_line"), 1);
    assert_eq!(channel.count("move_gohome"), 0);
}
