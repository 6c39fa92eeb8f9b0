//! 控制器配置读取结果

/// 减速模式状态
///
/// 关节速度与关节范围的单位由读取时的 `is_radian` 决定。
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReducedStates {
    pub on: bool,
    /// `[x_max, x_min, y_max, y_min, z_max, z_min]`
    pub tcp_boundary: [i32; 6],
    pub tcp_speed: f64,
    pub joint_speed: f64,
    /// `[j1_min, j1_max, …, j7_min, j7_max]`
    pub joint_ranges: [f64; 14],
    pub fence_on: bool,
    pub collision_rebound: bool,
}

impl ReducedStates {
    /// 从 25 个值的回复负载解析
    pub(crate) fn from_values(values: &[f64; 25], is_radian: bool) -> Self {
        let mut tcp_boundary = [0; 6];
        for (slot, v) in tcp_boundary.iter_mut().zip(&values[1..7]) {
            *slot = v.round() as i32;
        }
        let mut joint_ranges = [0.0; 14];
        joint_ranges.copy_from_slice(&values[9..23]);
        let mut joint_speed = values[8];
        if !is_radian {
            joint_speed = joint_speed.to_degrees();
            joint_ranges = joint_ranges.map(f64::to_degrees);
        }
        Self {
            on: values[0] != 0.0,
            tcp_boundary,
            tcp_speed: values[7],
            joint_speed,
            joint_ranges,
            fence_on: values[23] != 0.0,
            collision_rebound: values[24] != 0.0,
        }
    }
}

/// 负载设置 `(重量 kg, 质心 mm)`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TcpLoad {
    pub weight: f64,
    pub center: [f64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_states_layout() {
        let mut values = [0.0; 25];
        values[0] = 1.0;
        values[1] = 500.0;
        values[2] = -500.0;
        values[7] = 250.0;
        values[8] = std::f64::consts::PI;
        values[9] = -std::f64::consts::FRAC_PI_2;
        values[24] = 1.0;

        let states = ReducedStates::from_values(&values, true);
        assert!(states.on);
        assert_eq!(states.tcp_boundary[..2], [500, -500]);
        assert_eq!(states.tcp_speed, 250.0);
        assert!(!states.fence_on);
        assert!(states.collision_rebound);

        let deg = ReducedStates::from_values(&values, false);
        assert!((deg.joint_speed - 180.0).abs() < 1e-9);
        assert!((deg.joint_ranges[0] + 90.0).abs() < 1e-9);
    }
}
