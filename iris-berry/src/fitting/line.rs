//! 最小二乘直线.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 直线 `y = slope · x + intercept`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    /// 斜率.
    pub slope: f64,

    /// 截距.
    pub intercept: f64,
}

impl Line {
    /// 求值.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// 对整数点集做普通最小二乘拟合. 所有求和都在 `i64` 上进行.
///
/// 点数少于 2, 或所有 `x` 相同 (分母为 0) 时返回 `None`.
pub fn fit_line<I: IntoIterator<Item = (i64, i64)>>(points: I) -> Option<Line> {
    let (mut n, mut sx, mut sy, mut sxy, mut sx2) = (0i64, 0i64, 0i64, 0i64, 0i64);
    for (x, y) in points {
        n += 1;
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }
    let den = n * sx2 - sx * sx;
    if n < 2 || den == 0 {
        return None;
    }
    let den = den as f64;
    Some(Line {
        slope: (n * sxy - sx * sy) as f64 / den,
        intercept: (sx2 * sy - sx * sxy) as f64 / den,
    })
}
