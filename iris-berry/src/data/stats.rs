//! 总体均值与标准差.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一组样本的总体统计量.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeanStd {
    /// 均值.
    pub mean: f64,

    /// 总体标准差 (除以 `n`).
    pub std: f64,

    /// 样本数.
    pub count: usize,
}

impl MeanStd {
    /// 计算统计量. 没有样本时返回 `None`.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let it = values.into_iter();
        let (sum, count) = it.clone().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        let var = it.map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
        Some(Self {
            mean,
            std: var.sqrt(),
            count,
        })
    }

    /// 区间 `[mean - k·std, mean + k·std]`, 两端截断到 `[0, 255]`.
    pub fn band(&self, k: f64) -> (f64, f64) {
        (
            num::clamp(self.mean - k * self.std, 0.0, 255.0),
            num::clamp(self.mean + k * self.std, 0.0, 255.0),
        )
    }
}
