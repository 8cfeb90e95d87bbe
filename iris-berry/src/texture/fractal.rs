//! 盒计数分形指数.

use super::{FractalIndexGrid, IrisArray};
use crate::consts::{BOX_RADIUS_LIMIT, FRACTAL_LEVELS, NON_IRIS};
use crate::data::geometry::round_even;
use crate::Idx2d;
use itertools::iproduct;
use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use once_cell::sync::Lazy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// `x(r) = 2·log10(2r + 1)`, `r` 取 `1..8`. 下标 0 不使用.
static LOG_SCALES: Lazy<[f64; BOX_RADIUS_LIMIT]> = Lazy::new(|| {
    let mut xs = [0.0; BOX_RADIUS_LIMIT];
    for (r, x) in xs.iter_mut().enumerate().skip(1) {
        *x = 2.0 * ((2 * r + 1) as f64).log10();
    }
    xs
});

/// `Σ x(r)²`.
static LOG_SCALE_NORM: Lazy<f64> = Lazy::new(|| LOG_SCALES.iter().map(|x| x * x).sum());

/// 由回归斜率得到分形指数的方式.
///
/// 两种方式的斜率完全相同, 只是最终取值方向不同.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FractalPolicy {
    /// `round((3 - slope) × 100)`, 取值约在 `[200, 300]`. 写入直方图时减去 200.
    Classic,

    /// `round(slope × 100)`, 取值在 `[0, 100]`, 与直方图的行数一致.
    #[default]
    Inverted,
}

impl FractalPolicy {
    /// 所有策略.
    pub const ALL: [FractalPolicy; 2] = [Self::Classic, Self::Inverted];

    #[inline]
    fn index(&self, slope: f64) -> i32 {
        let scale = FRACTAL_LEVELS as f64;
        match self {
            Self::Classic => round_even((3.0 - slope) * scale),
            Self::Inverted => round_even(slope * scale),
        }
    }

    /// 分形指数在联合直方图中的行号, 两种方式都落在 `[0, 100]` 附近.
    #[inline]
    pub fn row(&self, index: i32) -> i32 {
        match self {
            Self::Classic => index - 2 * FRACTAL_LEVELS as i32,
            Self::Inverted => index,
        }
    }
}

/// 以 `pos` 为中心, 半径 `r` 的窗口 (截断到网格内) 中与中心灰度相差不超过 `r` 的虹膜格子数.
///
/// 中心自身也被计入, 因此结果至少为 1. `pos` 必须是虹膜格子.
pub fn box_count(arr: ArrayView2<'_, i32>, (h, w): Idx2d, r: usize) -> usize {
    let (height, width) = arr.dim();
    let center = arr[(h, w)];
    let rows = h.saturating_sub(r)..=(h + r).min(height - 1);
    let cols = w.saturating_sub(r)..=(w + r).min(width - 1);
    iproduct!(rows, cols)
        .filter(|&p| {
            let v = arr[p];
            v != NON_IRIS && (v - center).unsigned_abs() as usize <= r
        })
        .count()
}

/// 单个虹膜格子的分形指数.
fn fractal_index(arr: ArrayView2<'_, i32>, pos: Idx2d, policy: FractalPolicy) -> i32 {
    let u: f64 = (1..BOX_RADIUS_LIMIT)
        .map(|r| LOG_SCALES[r] * (box_count(arr, pos, r) as f64).log10())
        .sum();
    policy.index(u / *LOG_SCALE_NORM)
}

/// 计算第 `h` 行.
fn fill_row(
    arr: ArrayView2<'_, i32>,
    h: usize,
    mut row: ArrayViewMut1<'_, i32>,
    policy: FractalPolicy,
) {
    for (w, out) in row.iter_mut().enumerate() {
        if arr[(h, w)] != NON_IRIS {
            *out = fractal_index(arr, (h, w), policy);
        }
    }
}

/// 对 (已拉伸的) 虹膜灰度计算逐像素分形指数. 非虹膜格子保持 `-1`.
///
/// 启用 `rayon` 特性时按行并行, 结果与串行版本一致.
pub fn fractal_index_grid(input: &IrisArray, policy: FractalPolicy) -> FractalIndexGrid {
    let arr = input.view();
    let mut out = Array2::from_elem(arr.dim(), NON_IRIS);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            out.axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(h, row)| fill_row(arr, h, row, policy));
        } else {
            out.axis_iter_mut(Axis(0))
                .enumerate()
                .for_each(|(h, row)| fill_row(arr, h, row, policy));
        }
    }

    IrisArray {
        data: out,
        rect: *input.rect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Rect;
    use ndarray::array;

    #[test]
    fn test_log_scales() {
        assert_eq!(LOG_SCALES[0], 0.0);
        assert!((LOG_SCALES[1] - 2.0 * 3f64.log10()).abs() < 1e-12);
        assert!((LOG_SCALES[7] - 2.0 * 15f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_box_count() {
        let arr = array![[10, 11, 13], [NON_IRIS, 10, 12], [9, 30, 10]];
        // 半径 1 窗口覆盖整个网格: 与 10 相差不超过 1 的有 10, 11, 10, 9, 10.
        assert_eq!(box_count(arr.view(), (1, 1), 1), 5);
        // 角落的窗口被截断为 2 × 2.
        assert_eq!(box_count(arr.view(), (0, 0), 1), 3);
        assert_eq!(box_count(arr.view(), (0, 0), 3), 7);
    }

    /// 均匀网格: 每个窗口内所有格子都计数, 计数等于窗口面积.
    #[test]
    fn test_uniform_interior() {
        let rect = Rect::new(0, 0, 30, 30);
        let input = IrisArray::from_array(rect, Array2::from_elem((31, 31), 50)).unwrap();
        let out = fractal_index_grid(&input, FractalPolicy::Inverted);
        // 中心处所有窗口完整, u / d = 1.
        assert_eq!(out[(15, 15)], 100);
        let classic = fractal_index_grid(&input, FractalPolicy::Classic);
        assert_eq!(classic[(15, 15)], 200);
        assert_eq!(FractalPolicy::Classic.row(classic[(15, 15)]), 0);
        assert_eq!(FractalPolicy::Inverted.row(out[(15, 15)]), 100);
    }

    #[test]
    fn test_sentinel_and_determinism() {
        let rect = Rect::new(0, 0, 4, 3);
        let data = Array2::from_shape_fn((4, 5), |(h, w)| {
            if (h + w) % 4 == 0 {
                NON_IRIS
            } else {
                ((h * 7 + w * 13) % 9) as i32 * 20
            }
        });
        let input = IrisArray::from_array(rect, data).unwrap();
        let a = fractal_index_grid(&input, FractalPolicy::Inverted);
        let b = fractal_index_grid(&input, FractalPolicy::Inverted);
        assert_eq!(a, b);
        for ((h, w), &v) in a.indexed_iter() {
            assert_eq!(v == NON_IRIS, !input.is_member((h, w)));
            if v != NON_IRIS {
                assert!((0..=100).contains(&v));
            }
        }
    }
}
