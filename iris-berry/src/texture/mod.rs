//! 虹膜纹理特征提取.
//!
//! 流程: 对比度拉伸 -> 盒计数分形指数 -> 灰度量化 -> 联合直方图 -> 游程统计特征.
//! 所有网格都与虹膜外接矩形对齐, 非虹膜格子以 [`NON_IRIS`] 表示.

mod fractal;
mod quantize;
mod run_length;

pub use fractal::{box_count, fractal_index_grid, FractalPolicy};
pub use quantize::quantize;
pub use run_length::{run_length_features, FeatureVector, JointHistogram, RunCountPolicy};

use crate::consts::NON_IRIS;
use crate::data::stats::MeanStd;
use crate::data::{PixelBuffer, Rect};
use crate::error::{Degenerate, LocateError, LocateResult};
use crate::iris::FlagGrid;
use crate::Idx2d;
use ndarray::{iter::IndexedIter, Array2, ArrayView2, Ix2};
use num::ToPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 与虹膜外接矩形对齐的整数网格. 虹膜格子保存灰度 (或派生分数), 其余为 `-1`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IrisArray {
    data: Array2<i32>,
    rect: Rect,
}

/// 每个虹膜像素的分形指数, 非虹膜为 `-1`.
pub type FractalIndexGrid = IrisArray;

/// 每个虹膜像素的量化等级 (`0..=16`), 非虹膜为 `-1`.
pub type QuantizedGrayGrid = IrisArray;

impl IrisArray {
    /// 取 `grid` 中虹膜格子在 `source` 上的灰度.
    pub fn from_flags(source: &PixelBuffer, grid: &FlagGrid) -> Self {
        let rect = *grid.rect();
        let data = Array2::from_shape_fn(grid.shape(), |(h, w)| {
            if grid[(h, w)].is_iris() {
                source[(rect.y1 + h, rect.x1 + w)] as i32
            } else {
                NON_IRIS
            }
        });
        Self { data, rect }
    }

    /// 包装已有数据. 形状与 `rect` 不符时返回 `None`.
    pub fn from_array(rect: Rect, data: Array2<i32>) -> Option<Self> {
        (data.dim() == rect.shape()).then_some(Self { data, rect })
    }

    /// 保持对齐, 逐个变换虹膜格子.
    pub(crate) fn map_members<F: Fn(i32) -> i32>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(|v| if v == NON_IRIS { NON_IRIS } else { f(v) }),
            rect: self.rect,
        }
    }

    /// 对应的全局矩形.
    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// 局部形状 `(h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 是否为虹膜格子.
    #[inline]
    pub fn is_member(&self, pos: Idx2d) -> bool {
        self.data.get(pos).is_some_and(|&v| v != NON_IRIS)
    }

    /// 虹膜格子数.
    #[inline]
    pub fn members(&self) -> usize {
        self.member_values().count()
    }

    /// 所有虹膜格子的值, 按光栅顺序.
    #[inline]
    pub fn member_values(&self) -> impl Iterator<Item = i32> + Clone + '_ {
        self.data.iter().copied().filter(|&v| v != NON_IRIS)
    }

    /// 虹膜格子的总体统计量. 没有虹膜格子时返回 `None`.
    pub fn stats(&self) -> Option<MeanStd> {
        MeanStd::from_values(self.member_values().map(f64::from))
    }

    /// 带局部索引的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> IndexedIter<'_, i32, Ix2> {
        self.data.indexed_iter()
    }

    /// 底层数据的不可变视图.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, i32> {
        self.data.view()
    }
}

impl std::ops::Index<Idx2d> for IrisArray {
    type Output = i32;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 把虹膜格子截断到 `mean ± 2·std` (再截断到 `[0, 255]`) 后线性映射到 `[0, levels]`.
///
/// 低于下界记为 0, 高于上界记为 `levels`, 其余为 `trunc((v - min) · levels / (max - min))`.
/// 区间长度为 0 时所有虹膜格子记为 0.
pub(crate) fn rescale(input: &IrisArray, levels: i32) -> LocateResult<IrisArray> {
    let stats = input
        .stats()
        .ok_or(LocateError::GeometryDegenerate(Degenerate::EmptyIris))?;
    let (min, max) = stats.band(2.0);
    let range = max - min;
    Ok(input.map_members(|v| {
        let v = v as f64;
        if v < min {
            0
        } else if v > max {
            levels
        } else if range <= 0.0 {
            0
        } else {
            ((v - min) * levels as f64 / range).to_i32().unwrap_or(0)
        }
    }))
}

/// 对比度拉伸到 `[0, 255]`.
pub fn contrast_stretch(input: &IrisArray) -> LocateResult<IrisArray> {
    rescale(input, 255)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::Flag;
    use ndarray::array;

    #[test]
    fn test_from_flags() {
        let source = PixelBuffer::from_raw(3, 2, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let rect = Rect::new(1, 0, 2, 1);
        let mut grid = FlagGrid::new(rect, Flag::Dark);
        grid[(0, 1)] = Flag::Iris;
        grid[(1, 0)] = Flag::Iris;
        let arr = IrisArray::from_flags(&source, &grid);
        assert_eq!(arr.view(), array![[NON_IRIS, 30], [50, NON_IRIS]]);
        assert_eq!(arr.members(), 2);
        assert!(arr.is_member((0, 1)));
        assert!(!arr.is_member((0, 0)));
        assert!(!arr.is_member((5, 5)));
    }

    #[test]
    fn test_contrast_stretch() {
        // mean = 2, std = √2, 下界截断为 0.
        let rect = Rect::new(0, 0, 2, 1);
        let arr = IrisArray::from_array(rect, array![[1, 2, NON_IRIS], [3, 4, 0]]).unwrap();
        let out = contrast_stretch(&arr).unwrap();
        let (min, max) = (0.0, 2.0 + 2.0 * 2f64.sqrt());
        let expect = |v: f64| ((v - min) * 255.0 / (max - min)) as i32;
        assert_eq!(out[(0, 2)], NON_IRIS);
        assert_eq!(out[(1, 2)], 0);
        assert_eq!(out[(0, 0)], expect(1.0));
        assert_eq!(out[(1, 1)], expect(4.0));
    }

    #[test]
    fn test_stretch_flat_and_empty() {
        let rect = Rect::new(0, 0, 1, 0);
        let flat = IrisArray::from_array(rect, array![[7, 7]]).unwrap();
        assert_eq!(contrast_stretch(&flat).unwrap().view(), array![[0, 0]]);

        let empty = IrisArray::from_array(rect, array![[NON_IRIS, NON_IRIS]]).unwrap();
        assert!(matches!(
            contrast_stretch(&empty),
            Err(LocateError::GeometryDegenerate(Degenerate::EmptyIris))
        ));
    }
}
