//! 运动指令层端到端测试（Mock 通道）
//!
//! 覆盖 SDK 入口、脚本执行、急停打断等待、配置同步的完整流程。

use serial_test::serial;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use xarm_driver::mock::MockChannel;
use xarm_sdk::prelude::*;

fn setup() -> (XArm, Arc<MockChannel>) {
    xarm_sdk::init_logger();
    let live = Arc::new(LiveStateStore::new(LiveState::ready()));
    let channel = Arc::new(MockChannel::new(live.clone()));
    let arm = XArm::builder(channel.clone(), live)
        .wait_config(WaitConfig {
            poll_interval: Duration::from_millis(5),
            pause_poll_interval: Duration::from_millis(5),
            queue_poll_interval: Duration::from_millis(5),
            ..WaitConfig::default()
        })
        .build();
    (arm, channel)
}

#[test]
fn test_relative_moves_compose() {
    let (mut arm, channel) = setup();
    assert_eq!(
        arm.set_position(&PoseTarget::new().x(0), &MoveOptions::new()),
        0
    );
    let relative = MoveOptions::new().relative(true);
    assert_eq!(arm.set_position(&PoseTarget::new().x(10), &relative), 0);
    assert_eq!(arm.set_position(&PoseTarget::new().x(10), &relative), 0);
    assert_eq!(arm.staged().pose()[0], 20.0);
    assert_eq!(channel.position()[0], 20.0);
}

#[test]
fn test_gcode_script_end_to_end() -> anyhow::Result<()> {
    let (mut arm, channel) = setup();
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "G1 X300 Y0 Z200 A180 B0 C0 F100")?;
    writeln!(file)?;
    writeln!(file, "G4 T0")?;
    writeln!(file, "M120 V450")?;
    writeln!(file, "H13")?;

    let code = run_gcode_file(&mut arm, file.path(), &ScriptConfig::default().times(2));
    assert_eq!(code, 0);
    assert_eq!(channel.count("move_line"), 2);
    assert_eq!(channel.gripper_position(), 450.0);
    assert_eq!(channel.position()[0], 300.0);
    Ok(())
}

#[test]
fn test_script_stops_on_range_violation() -> anyhow::Result<()> {
    let (mut arm, channel) = setup();
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "G1 X300 B200")?;
    writeln!(file, "G8")?;

    let code = run_gcode_file(&mut arm, file.path(), &ScriptConfig::default());
    assert_eq!(code, ApiCode::OutOfRange.code());
    assert_eq!(channel.count("move_gohome"), 0);
    Ok(())
}

#[test]
#[serial]
fn test_emergency_stop_interrupts_wait() {
    let (arm, channel) = setup();
    channel.live().update(|s| s.state = RobotState::Moving);

    let handle = arm.stop_handle();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.emergency_stop()
    });

    let start = Instant::now();
    arm.wait_move(None);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(stopper.join().unwrap(), 0);
    assert_eq!(arm.robot_state(), RobotState::Stopped);
}

#[test]
#[serial]
fn test_wait_times_out_while_moving() {
    let (arm, channel) = setup();
    channel.live().update(|s| s.state = RobotState::Moving);

    let start = Instant::now();
    arm.wait_move(Some(Duration::from_millis(100)));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(600));
}

#[test]
fn test_reset_then_move() {
    let (mut arm, channel) = setup();
    channel.live().update(|s| {
        s.ready = false;
        s.error_code = 31;
    });
    assert_eq!(
        arm.set_position(&PoseTarget::new().x(300), &MoveOptions::new()),
        ApiCode::NotReady.code()
    );

    assert_eq!(arm.reset(&MoveOptions::new()), 0);
    assert!(arm.is_ready());
    assert_eq!(
        arm.set_position(&PoseTarget::new().x(300), &MoveOptions::new()),
        0
    );
}

#[test]
fn test_firmware_config_file_roundtrip() -> anyhow::Result<()> {
    let (mut arm, channel) = setup();
    let (code, mut config) = FirmwareConfig::read(&arm);
    assert_eq!(code, 0);

    config.teach_sensitivity = 1;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("firmware.toml");
    config.save_to_file(&path)?;

    let desired = FirmwareConfig::load_from_file(&path)?;
    channel.take_commands();
    assert_eq!(desired.apply(&mut arm), 0);
    let setters: Vec<_> = channel
        .commands()
        .into_iter()
        .filter(|c| c.is_config_setter())
        .collect();
    assert_eq!(setters.len(), 1);
    assert_eq!(channel.firmware().teach_sensitivity, 1);
    Ok(())
}

#[test]
fn test_limits_config_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("limits.toml");
    let limits = LimitsConfig::default();
    limits.save_to_file(&path)?;
    assert_eq!(LimitsConfig::load_from_file(&path)?, limits);
    Ok(())
}
