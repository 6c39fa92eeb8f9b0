//! 实例级设置

/// 运动 API 设置
#[derive(Debug, Clone, PartialEq)]
pub struct ArmSettings {
    /// 轴数（5/6/7）
    pub axis: u8,
    /// 未指定 `is_radian` 时的角度单位
    pub default_is_radian: bool,
    /// 本地笛卡尔姿态范围检查
    pub check_tcp_limit: bool,
    /// 本地关节范围检查
    pub check_joint_limit: bool,
    /// 下发运动前等待控制器队列有空位
    pub check_cmdnum_limit: bool,
    /// 控制器队列容量
    pub max_cmd_num: u32,
    /// 暂停状态下拒绝运动指令
    pub check_is_pause: bool,
}

impl Default for ArmSettings {
    fn default() -> Self {
        Self {
            axis: 7,
            default_is_radian: false,
            check_tcp_limit: true,
            check_joint_limit: true,
            check_cmdnum_limit: true,
            max_cmd_num: 512,
            check_is_pause: true,
        }
    }
}
