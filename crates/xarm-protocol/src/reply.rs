//! 指令回复 `(status, payload…)`

use crate::{ProtocolError, Status, controller};
use smallvec::SmallVec;

/// 回复负载（绝大多数回复不超过 8 个数值，避免堆分配）
pub type Payload = SmallVec<[f64; 8]>;

/// 指令通道回复
///
/// `code == 0` 表示成功，1/2 表示控制器错误/警告分类，
/// 其他值为通道层失败。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reply {
    /// 状态码
    pub code: Status,
    /// 数值负载
    pub values: Payload,
    /// 文本负载（版本号等）
    pub text: Option<String>,
}

impl Reply {
    /// 仅有状态码的回复
    pub fn status(code: Status) -> Self {
        Self {
            code,
            values: Payload::new(),
            text: None,
        }
    }

    /// 成功回复，附带数值负载
    pub fn ok<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self::with_values(0, values)
    }

    /// 指定状态码和数值负载
    pub fn with_values<I: IntoIterator<Item = f64>>(code: Status, values: I) -> Self {
        Self {
            code,
            values: values.into_iter().collect(),
            text: None,
        }
    }

    /// 成功回复，附带文本负载
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            code: 0,
            values: Payload::new(),
            text: Some(text.into()),
        }
    }

    /// 控制器是否接收了指令（0/1/2）
    pub fn is_accepted(&self) -> bool {
        controller::is_accepted(self.code)
    }

    /// 第 `index` 个负载值
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// 要求负载至少包含 `len` 个值
    pub fn require(&self, len: usize) -> Result<&[f64], ProtocolError> {
        if self.values.len() < len {
            return Err(ProtocolError::ShortPayload {
                expected: len,
                actual: self.values.len(),
            });
        }
        Ok(&self.values[..len])
    }

    /// 读取固定长度数组
    pub fn array<const N: usize>(&self) -> Result<[f64; N], ProtocolError> {
        let slice = self.require(N)?;
        let mut out = [0.0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}
