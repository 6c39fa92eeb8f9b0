//! 指令表：字母 → 编号 → 处理函数
//!
//! 每个处理函数只做参数提取，校验全部交给 [`XArm`] 的对应 API。

use super::Outcome;
use super::parser::GcodeLine;
use std::thread;
use std::time::Duration;
use xarm_client::{ALL_SERVOS, MoveOptions, ServoTarget, TcpLoad, XArm};

/// 处理函数
pub type Handler = fn(&mut XArm, &GcodeLine) -> Outcome;

/// 查找处理函数
pub fn lookup(letter: char, code: u32) -> Option<Handler> {
    match letter {
        'G' => g_code(code),
        'H' => h_code(code),
        'M' => m_code(code),
        'D' => d_code(code),
        'S' => s_code(code),
        'C' => c_code(code),
        _ => None,
    }
}

fn move_options(line: &GcodeLine) -> MoveOptions {
    let mut opts = MoveOptions::new();
    if let Some(speed) = line.speed() {
        opts = opts.speed(speed);
    }
    if let Some(acc) = line.acc() {
        opts = opts.mvacc(acc);
    }
    if let Some(time) = line.time() {
        opts = opts.mvtime(time);
    }
    opts
}

fn to_u8(value: i64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn to_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `I` 缺省或为 0 时表示全部关节
fn servo_or_all(line: &GcodeLine) -> u8 {
    match line.id(0) {
        0 => ALL_SERVOS,
        id => id,
    }
}

// ==================== G: 运动 ====================

fn g_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        1 => |arm, line| Outcome::Status(arm.set_position(&line.pose_target(), &move_options(line))),
        2 => |arm, line| {
            let pose1 = line.pose_or(0.0);
            let joints = line.joints_or(0.0);
            let pose2 = [joints[0], joints[1], joints[2], joints[3], joints[4], joints[5]];
            let percent = line.radius().unwrap_or(0.0);
            Outcome::Status(arm.move_circle(pose1, pose2, percent, &move_options(line)))
        },
        4 => |arm, line| Outcome::Status(arm.set_pause_time(line.time().unwrap_or(0.0), false)),
        7 => |arm, line| {
            let target = ServoTarget::All(line.joint_target());
            Outcome::Status(arm.set_servo_angle(&target, &move_options(line)))
        },
        8 => |arm, line| Outcome::Status(arm.move_gohome(&move_options(line))),
        9 => |arm, line| {
            let opts = move_options(line).radius(line.radius().unwrap_or(0.0));
            Outcome::Status(arm.set_position(&line.pose_target(), &opts))
        },
        11 => |arm, line| Outcome::Status(arm.set_servo_angle_j(&line.joints_or(0.0), &move_options(line))),
        12 => |_, line| {
            let seconds = line.time().unwrap_or(0.0);
            if seconds.is_finite() && seconds > 0.0 {
                thread::sleep(Duration::from_secs_f64(seconds));
            }
            Outcome::Status(0)
        },
        _ => return None,
    };
    Some(handler)
}

// ==================== H: 状态与配置 ====================

fn h_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        1 => |arm, _| Outcome::from(arm.get_version()),
        10 => |arm, line| Outcome::Status(arm.shutdown_system(to_i32(line.int_value(0)))),
        11 => |arm, line| {
            let enable = line.int_value(0) != 0;
            Outcome::Status(arm.motion_enable(enable, Some(servo_or_all(line))))
        },
        12 => |arm, line| Outcome::Status(arm.set_state(to_u8(line.int_value(0)))),
        13 => |arm, _| {
            let (code, state) = arm.get_state();
            Outcome::Values(code, vec![state.code() as f64])
        },
        14 => |arm, _| {
            let (code, num) = arm.get_cmdnum();
            Outcome::Values(code, vec![num as f64])
        },
        15 => |arm, _| {
            let (code, [err, warn]) = arm.get_err_warn_code();
            Outcome::Values(code, vec![err as f64, warn as f64])
        },
        16 => |arm, _| Outcome::Status(arm.clean_error()),
        17 => |arm, _| Outcome::Status(arm.clean_warn()),
        18 => |arm, line| {
            let servo = Some(servo_or_all(line));
            let code = if line.int_value(0) != 0 {
                arm.set_servo_detach(servo)
            } else {
                arm.set_servo_attach(servo)
            };
            Outcome::Status(code)
        },
        19 => |arm, line| Outcome::Status(arm.set_mode(to_u8(line.int_value(0)))),
        31 => |arm, line| Outcome::Status(arm.set_tcp_jerk(line.value().unwrap_or(-1.0))),
        32 => |arm, line| Outcome::Status(arm.set_tcp_maxacc(line.value().unwrap_or(-1.0))),
        33 => |arm, line| Outcome::Status(arm.set_joint_jerk(line.value().unwrap_or(-1.0), None)),
        34 => |arm, line| Outcome::Status(arm.set_joint_maxacc(line.value().unwrap_or(-1.0), None)),
        35 => |arm, line| Outcome::Status(arm.set_tcp_offset(line.pose_or(0.0), None)),
        36 => |arm, line| {
            let v = line.joints_or(0.0);
            let load = TcpLoad {
                weight: v[0],
                center: [v[1], v[2], v[3]],
            };
            Outcome::Status(arm.set_tcp_load(load))
        },
        37 => |arm, line| Outcome::Status(arm.set_collision_sensitivity(to_u8(line.int_value(0)))),
        38 => |arm, line| Outcome::Status(arm.set_teach_sensitivity(to_u8(line.int_value(0)))),
        39 => |arm, _| Outcome::Status(arm.clean_conf()),
        40 => |arm, _| Outcome::Status(arm.save_conf()),
        41 => |arm, _| Outcome::from(arm.get_position(None)),
        42 => |arm, _| Outcome::from(arm.get_servo_angle(None)),
        43 => |arm, line| Outcome::from(arm.get_inverse_kinematics(line.pose_or(0.0), Some(false), Some(false))),
        44 => |arm, line| {
            Outcome::from(arm.get_forward_kinematics(&line.joints_or(0.0), Some(false), Some(false)))
        },
        45 => |arm, line| Outcome::from(arm.is_joint_limit(&line.joint_target(), Some(false))),
        46 => |arm, line| Outcome::from(arm.is_tcp_limit(&line.pose_target(), Some(false))),
        51 => |arm, line| {
            let p = line.pose_or(0.0);
            Outcome::Status(arm.set_gravity_direction([p[0], p[1], p[2]]))
        },
        101 => |arm, line| {
            let value = to_i32(line.int_value(0));
            Outcome::Status(arm.set_servo_addr_16(line.id(0), line.addr(0), value))
        },
        102 => |arm, line| Outcome::from(arm.get_servo_addr_16(line.id(0), line.addr(0))),
        103 => |arm, line| {
            let value = to_i32(line.int_value(0));
            Outcome::Status(arm.set_servo_addr_32(line.id(0), line.addr(0), value))
        },
        104 => |arm, line| Outcome::from(arm.get_servo_addr_32(line.id(0), line.addr(0))),
        105 => |arm, line| Outcome::Status(arm.set_servo_zero(line.id(0))),
        106 => |arm, _| Outcome::from(arm.get_servo_debug_msg()),
        _ => return None,
    };
    Some(handler)
}

// ==================== M: 夹爪与末端 IO ====================

fn m_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        116 => |arm, line| Outcome::Status(arm.set_gripper_enable(line.int_value(0) != 0)),
        117 => |arm, line| Outcome::Status(arm.set_gripper_mode(to_u8(line.int_value(0)))),
        118 => |arm, _| Outcome::Status(arm.set_gripper_zero()),
        119 => |arm, _| Outcome::from(arm.get_gripper_position()),
        120 => |arm, line| Outcome::Status(arm.set_gripper_position(line.int_value(0) as f64)),
        121 => |arm, line| Outcome::Status(arm.set_gripper_speed(line.int_value(0) as f64)),
        125 => |arm, _| {
            let (code, err) = arm.get_gripper_err_code();
            Outcome::Values(code, vec![err as f64])
        },
        126 => |arm, _| Outcome::Status(arm.clean_gripper_error()),
        127 => |arm, _| Outcome::from(arm.get_gripper_version()),
        131 => |arm, _| Outcome::from(arm.get_tgpio_digital()),
        132 => |arm, line| Outcome::Status(arm.set_tgpio_digital(line.id(0), to_u8(line.int_value(0)))),
        133 => |arm, line| Outcome::from(arm.get_tgpio_analog(line.id(0))),
        134 => |arm, line| Outcome::from(arm.get_tgpio_analog(line.id(0))),
        135 => |arm, _| Outcome::from(arm.get_tgpio_version()),
        _ => return None,
    };
    Some(handler)
}

// ==================== D: 关节诊断 ====================

fn d_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        11 => |arm, line| Outcome::from(arm.get_servo_error_code(servo_or_all(line))),
        // 松开关节：清错、去使能、抱闸
        12 => |arm, line| {
            let id = servo_or_all(line);
            arm.clean_error();
            arm.clean_warn();
            arm.motion_enable(false, Some(id));
            Outcome::Status(arm.set_servo_detach(Some(id)))
        },
        // 设零点后重新使能
        13 => |arm, line| {
            let id = servo_or_all(line);
            arm.set_servo_zero(id);
            Outcome::Status(arm.motion_enable(true, Some(id)))
        },
        21 => |arm, line| {
            let id = servo_or_all(line);
            arm.clean_servo_pvl_err(id);
            Outcome::from(arm.get_servo_error_code(id))
        },
        _ => return None,
    };
    Some(handler)
}

// ==================== S: 关节参数 ====================

fn s_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        44 => |arm, line| Outcome::from(arm.get_servo_all_pids(servo_or_all(line))),
        45 => |arm, line| Outcome::from(arm.get_servo_version(line.id(1))),
        _ => return None,
    };
    Some(handler)
}

// ==================== C: 控制器 IO ====================

fn c_code(code: u32) -> Option<Handler> {
    let handler: Handler = match code {
        131 => |arm, _| Outcome::from(arm.get_cgpio_digital()),
        132 => |arm, line| Outcome::from(arm.get_cgpio_analog(line.id(0))),
        133 => |arm, line| Outcome::from(arm.get_cgpio_analog(line.id(1))),
        134 => |arm, line| Outcome::Status(arm.set_cgpio_digital(line.id(0), to_u8(line.int_value(0)))),
        135 => |arm, line| Outcome::Status(arm.set_cgpio_analog(line.id(0), line.value().unwrap_or(0.0))),
        136 => |arm, line| Outcome::Status(arm.set_cgpio_analog(line.id(1), line.value().unwrap_or(0.0))),
        137 => |arm, line| {
            let function = to_u8(line.int_value(0));
            Outcome::Status(arm.set_cgpio_digital_input_function(line.id(0), function))
        },
        138 => |arm, line| {
            let function = to_u8(line.int_value(0));
            Outcome::Status(arm.set_cgpio_digital_output_function(line.id(0), function))
        },
        139 => |arm, _| {
            let (code, (inputs, outputs)) = arm.get_cgpio_functions();
            let values = inputs.iter().chain(outputs.iter()).map(|v| *v as f64).collect();
            Outcome::Values(code, values)
        },
        _ => return None,
    };
    Some(handler)
}
