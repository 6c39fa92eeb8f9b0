//! 本地角度范围检查
//!
//! 只在以下条件同时满足时生效：
//! - 对应检查开关打开
//! - 指令通道为网络通道
//! - 上报流开启
//!
//! 不满足时所有值都视为在范围内。

use tracing::warn;
use xarm_tools::AxisRangeTable;

/// 边界容差（0.1°）
pub const RANGE_TOLERANCE: f64 = 0.1 * std::f64::consts::PI / 180.0;

/// 范围检查器（借用当前机型的范围表）
#[derive(Debug, Clone, Copy)]
pub struct RangeGuard<'a> {
    table: &'a AxisRangeTable,
    check_tcp: bool,
    check_joint: bool,
    /// 笛卡尔范围平移量（TCP 偏移 + 世界偏移，逐分量）
    tcp_shift: [f64; 6],
}

impl<'a> RangeGuard<'a> {
    /// 创建检查器（默认两类检查均关闭）
    pub fn new(table: &'a AxisRangeTable) -> Self {
        Self {
            table,
            check_tcp: false,
            check_joint: false,
            tcp_shift: [0.0; 6],
        }
    }

    /// 开启笛卡尔姿态检查，范围按偏移量平移
    pub fn with_tcp_check(mut self, enabled: bool, tcp_offset: &[f64; 6], world_offset: &[f64; 6]) -> Self {
        self.check_tcp = enabled;
        for (i, shift) in self.tcp_shift.iter_mut().enumerate() {
            *shift = tcp_offset[i] + world_offset[i];
        }
        self
    }

    pub fn with_joint_check(mut self, enabled: bool) -> Self {
        self.check_joint = enabled;
        self
    }

    /// 第 `index` 个笛卡尔分量是否越界（弧度）
    ///
    /// 只检查姿态分量（索引 3 起）；上下限相等的分量不受约束。
    pub fn is_out_of_tcp_range(&self, value: f64, index: usize) -> bool {
        if !self.check_tcp || index <= 2 {
            return false;
        }
        let Some(range) = self.table.tcp(index) else {
            return false;
        };
        if range.is_unconstrained() {
            return false;
        }
        let low = range.low + self.tcp_shift[index];
        let high = range.high + self.tcp_shift[index];
        let out = value < low - RANGE_TOLERANCE || value > high + RANGE_TOLERANCE;
        if out {
            warn!(index, value, low, high, "tcp component out of range");
        }
        out
    }

    /// 第 `index` 个关节角是否越界（弧度）
    pub fn is_out_of_joint_range(&self, angle: f64, index: usize) -> bool {
        if !self.check_joint {
            return false;
        }
        let Some(range) = self.table.joint(index) else {
            return false;
        };
        let out = angle < range.low - RANGE_TOLERANCE || angle > range.high + RANGE_TOLERANCE;
        if out {
            warn!(joint = index + 1, angle, low = range.low, high = range.high, "joint angle out of range");
        }
        out
    }
}
