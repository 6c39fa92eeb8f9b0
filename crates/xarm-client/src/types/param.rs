//! 可能是数值也可能是文本的参数
//!
//! 脚本和上位机常把数值以文本形式传入，这里统一在解析点转换，
//! 无法解析为有限浮点数的值视为"未提供"。

/// 运动参数
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Param {
    Num(f64),
    Text(String),
}

impl Param {
    /// 转换为有限浮点数
    ///
    /// 文本按 `f64` 语法解析（允许符号、小数点、指数），
    /// 前后空白被忽略；NaN/无穷视为无效。
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Param::Num(v) => *v,
            Param::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Num(v)
    }
}

impl From<f32> for Param {
    fn from(v: f32) -> Self {
        Param::Num(v as f64)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Num(v as f64)
    }
}

impl From<u32> for Param {
    fn from(v: u32) -> Self {
        Param::Num(v as f64)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Text(s)
    }
}

/// 可选参数的数值（未提供或无法解析时为 `None`）
pub fn coerce(param: Option<&Param>) -> Option<f64> {
    param.and_then(Param::as_f64)
}
