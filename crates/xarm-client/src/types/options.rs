//! 运动调用选项

use super::Param;
use std::time::Duration;

/// 运动调用选项
///
/// 未设置的速度/加速度/时间沿用上一次成功暂存的值。
///
/// ```rust
/// use xarm_client::MoveOptions;
/// use std::time::Duration;
///
/// let opts = MoveOptions::new()
///     .speed(200)
///     .mvacc(5000)
///     .wait(true)
///     .timeout(Duration::from_secs(10));
/// assert!(opts.wait);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveOptions {
    pub speed: Option<Param>,
    pub mvacc: Option<Param>,
    pub mvtime: Option<Param>,
    /// `speed` 的别名，`speed` 未设置时生效
    pub mvvelo: Option<Param>,
    /// 角度单位，`None` 使用实例默认值
    pub is_radian: Option<bool>,
    /// 相对当前暂存目标运动
    pub relative: bool,
    /// 等待运动结束
    pub wait: bool,
    /// 等待超时，`None` 或 0 表示不限
    pub timeout: Option<Duration>,
    /// 下发前向控制器查询限位
    pub check: bool,
    /// 圆弧过渡半径，非负时使用带半径的直线运动
    pub radius: Option<f64>,
    /// 基于工具坐标系（`set_position_aa` / 伺服笛卡尔）
    pub tool_coord: bool,
}

impl MoveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(mut self, v: impl Into<Param>) -> Self {
        self.speed = Some(v.into());
        self
    }

    pub fn mvacc(mut self, v: impl Into<Param>) -> Self {
        self.mvacc = Some(v.into());
        self
    }

    pub fn mvtime(mut self, v: impl Into<Param>) -> Self {
        self.mvtime = Some(v.into());
        self
    }

    pub fn mvvelo(mut self, v: impl Into<Param>) -> Self {
        self.mvvelo = Some(v.into());
        self
    }

    pub fn radian(mut self, is_radian: bool) -> Self {
        self.is_radian = Some(is_radian);
        self
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn tool_coord(mut self, tool_coord: bool) -> Self {
        self.tool_coord = tool_coord;
        self
    }

    /// 速度参数（`speed` 优先于 `mvvelo`）
    pub(crate) fn velocity(&self) -> Option<&Param> {
        self.speed.as_ref().or(self.mvvelo.as_ref())
    }
}

/// `move_arc_lines` 选项
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLinesOptions {
    pub is_radian: Option<bool>,
    /// 重复次数，0 表示无限循环（直到出错或急停）
    pub times: u32,
    /// 开始前的暂停时间（秒）
    pub first_pause_time: f64,
    /// 每轮之间的暂停时间（秒）
    pub repeat_pause_time: f64,
    /// 先运动到第一个路点并以关节运动回到该姿态
    pub automatic_calibration: bool,
    pub speed: Option<f64>,
    pub mvacc: Option<f64>,
    pub mvtime: Option<f64>,
    /// 全部下发后等待运动结束
    pub wait: bool,
}

impl Default for ArcLinesOptions {
    fn default() -> Self {
        Self {
            is_radian: None,
            times: 1,
            first_pause_time: 0.1,
            repeat_pause_time: 0.0,
            automatic_calibration: true,
            speed: None,
            mvacc: None,
            mvtime: None,
            wait: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_takes_precedence_over_mvvelo() {
        let opts = MoveOptions::new().mvvelo(10).speed(20);
        assert_eq!(opts.velocity(), Some(&Param::Num(20.0)));

        let opts = MoveOptions::new().mvvelo("15");
        assert_eq!(opts.velocity(), Some(&Param::Text("15".into())));
        assert_eq!(MoveOptions::new().velocity(), None);
    }
}
