//! G-code 行解析
//!
//! 一行由若干 `字母 + 数值` 组成，数值形如 `-?\d+(\.\d*)?`，字段之间可以没有空格。
//! 同一字母出现多次时只取第一次。
//!
//! | 字段 | 含义 |
//! |------|------|
//! | `X Y Z A B C` | 位姿分量（A/B/C 为 roll/pitch/yaw） |
//! | `I J K L M N O` | 关节分量 |
//! | `F` | 速度 |
//! | `Q` | 加速度 |
//! | `T` | 时间 |
//! | `R` | 过渡半径 / 圆弧百分比 |
//! | `V` | 通用数值 |
//! | `I` | IO / 关节编号 |
//! | `D` | 寄存器地址 |

use xarm_client::{JointTarget, PoseTarget};
use xarm_protocol::Pose;

/// 指令字母的优先级
pub const OPCODE_LETTERS: [char; 6] = ['G', 'H', 'M', 'D', 'S', 'C'];

const POSE_LETTERS: [char; 6] = ['X', 'Y', 'Z', 'A', 'B', 'C'];
const JOINT_LETTERS: [char; 7] = ['I', 'J', 'K', 'L', 'M', 'N', 'O'];

/// 解析后的一行
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeLine {
    text: String,
    words: [Option<f64>; 26],
}

fn slot(letter: char) -> Option<usize> {
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}

/// 从 `start` 开始匹配一个数值，返回 (值, 结束位置)
fn scan_number(bytes: &[u8], start: usize) -> Option<(f64, usize)> {
    let mut end = start;
    if bytes.get(end) == Some(&b'-') {
        end += 1;
    }
    let digits = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    let text = std::str::from_utf8(&bytes[start..end]).ok()?;
    let value = text.trim_end_matches('.').parse::<f64>().ok()?;
    Some((value, end))
}

impl GcodeLine {
    /// 解析一行（先统一为大写并去掉首尾空白）
    pub fn parse(line: &str) -> Self {
        let text = line.trim().to_ascii_uppercase();
        let mut words = [None; 26];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let letter = bytes[i] as char;
            if let Some(index) = slot(letter) {
                if let Some((value, end)) = scan_number(bytes, i + 1) {
                    words[index].get_or_insert(value);
                    i = end;
                    continue;
                }
            }
            i += 1;
        }
        Self { text, words }
    }

    /// 规范化后的原文
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 字母对应的数值
    pub fn word(&self, letter: char) -> Option<f64> {
        slot(letter.to_ascii_uppercase()).and_then(|i| self.words[i])
    }

    /// 指令字母与编号，按 `G H M D S C` 的优先级选取
    ///
    /// 编号必须是非负整数。
    pub fn opcode(&self) -> Option<(char, u32)> {
        OPCODE_LETTERS.iter().find_map(|&letter| {
            let value = self.word(letter)?;
            (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
                .then_some((letter, value as u32))
        })
    }

    /// 位姿目标（缺省分量为空，由暂存值补齐）
    pub fn pose_target(&self) -> PoseTarget {
        let mut target = PoseTarget::new();
        for (i, letter) in POSE_LETTERS.iter().enumerate() {
            if let Some(v) = self.word(*letter) {
                target = target.component(i, v);
            }
        }
        target
    }

    /// 位姿，缺省分量取 `default`
    pub fn pose_or(&self, default: f64) -> Pose {
        POSE_LETTERS.map(|letter| self.word(letter).unwrap_or(default))
    }

    /// 关节目标（缺省关节为空，由暂存值补齐）
    pub fn joint_target(&self) -> JointTarget {
        let mut target = JointTarget::new();
        for (i, letter) in JOINT_LETTERS.iter().enumerate() {
            if let Some(v) = self.word(*letter) {
                target = target.joint(i, v);
            }
        }
        target
    }

    /// 关节值，缺省关节取 `default`
    pub fn joints_or(&self, default: f64) -> [f64; 7] {
        JOINT_LETTERS.map(|letter| self.word(letter).unwrap_or(default))
    }

    pub fn speed(&self) -> Option<f64> {
        self.word('F')
    }

    pub fn acc(&self) -> Option<f64> {
        self.word('Q')
    }

    pub fn time(&self) -> Option<f64> {
        self.word('T')
    }

    pub fn radius(&self) -> Option<f64> {
        self.word('R')
    }

    pub fn value(&self) -> Option<f64> {
        self.word('V')
    }

    /// `V` 取整
    pub fn int_value(&self, default: i64) -> i64 {
        self.value().map_or(default, |v| v as i64)
    }

    /// `I` 作为编号，越界时饱和
    pub fn id(&self, default: u8) -> u8 {
        self.word('I').map_or(default, |v| v.clamp(0.0, u8::MAX as f64) as u8)
    }

    /// `D` 作为寄存器地址
    pub fn addr(&self, default: u16) -> u16 {
        self.word('D').map_or(default, |v| v.clamp(0.0, u16::MAX as f64) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_line() {
        let line = GcodeLine::parse("  g1 x10 Y20.5 z-30 a0 b0. c0 f50  ");
        assert_eq!(line.text(), "G1 X10 Y20.5 Z-30 A0 B0. C0 F50");
        assert_eq!(line.opcode(), Some(('G', 1)));
        assert_eq!(line.pose_or(0.0), [10.0, 20.5, -30.0, 0.0, 0.0, 0.0]);
        assert_eq!(line.speed(), Some(50.0));
        assert_eq!(line.acc(), None);
    }

    #[test]
    fn test_words_without_spaces() {
        let line = GcodeLine::parse("G7I10J-20.25K0");
        assert_eq!(line.opcode(), Some(('G', 7)));
        let joints = line.joints_or(99.0);
        assert_eq!(joints[..3], [10.0, -20.25, 0.0]);
        assert_eq!(joints[3], 99.0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let line = GcodeLine::parse("G1 X1 X2");
        assert_eq!(line.word('X'), Some(1.0));
    }

    #[test]
    fn test_opcode_priority() {
        // M/C 在这里是关节/姿态字段，不是指令
        assert_eq!(GcodeLine::parse("G7 M10").opcode(), Some(('G', 7)));
        assert_eq!(GcodeLine::parse("G1 C90").opcode(), Some(('G', 1)));
        assert_eq!(GcodeLine::parse("H101 I1 D10 V5").opcode(), Some(('H', 101)));
        assert_eq!(GcodeLine::parse("M120 V300").opcode(), Some(('M', 120)));
        assert_eq!(GcodeLine::parse("C134 I0 V1").opcode(), Some(('C', 134)));
    }

    #[test]
    fn test_opcode_must_be_integral() {
        assert_eq!(GcodeLine::parse("G1.5").opcode(), None);
        assert_eq!(GcodeLine::parse("G-1").opcode(), None);
        assert_eq!(GcodeLine::parse("X10 Y10").opcode(), None);
        assert_eq!(GcodeLine::parse("hello").opcode(), None);
    }

    #[test]
    fn test_letters_without_numbers_are_ignored() {
        let line = GcodeLine::parse("G1 X Y.5 Z+3 A-");
        assert_eq!(line.word('X'), None);
        assert_eq!(line.word('Y'), None);
        assert_eq!(line.word('Z'), None);
        assert_eq!(line.word('A'), None);
    }

    #[test]
    fn test_targets_leave_missing_components_empty() {
        let line = GcodeLine::parse("G1 X300 C45");
        let target = line.pose_target();
        assert!(target.get(0).is_some());
        assert!(target.get(1).is_none());
        assert!(target.get(5).is_some());

        let joints = GcodeLine::parse("G7 J15").joint_target();
        assert!(joints.get(0).is_none());
        assert!(joints.get(1).is_some());
    }

    #[test]
    fn test_typed_fields() {
        let line = GcodeLine::parse("H101 I300 D16 V-2.7");
        assert_eq!(line.id(0), u8::MAX);
        assert_eq!(line.addr(0), 16);
        assert_eq!(line.int_value(0), -2);
        assert_eq!(GcodeLine::parse("H12").int_value(4), 4);
        assert_eq!(GcodeLine::parse("S45").id(1), 1);
    }
}
