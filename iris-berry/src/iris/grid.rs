use crate::consts::Flag;
use crate::data::{Point, Rect};
use crate::Idx2d;
use ndarray::{iter::IndexedIter, Array2, ArrayView2, Ix2};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 虹膜外接矩形上的三态标记网格.
///
/// 局部索引 `(h, w)` 对应全局像素 `(rect.x1 + w, rect.y1 + h)`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlagGrid {
    data: Array2<Flag>,
    rect: Rect,
}

impl FlagGrid {
    /// 以 `fill` 填满 `rect`.
    pub fn new(rect: Rect, fill: Flag) -> Self {
        Self {
            data: Array2::from_elem(rect.shape(), fill),
            rect,
        }
    }

    /// 包装已有数据. 形状与 `rect` 不符时返回 `None`.
    pub fn from_array(rect: Rect, data: Array2<Flag>) -> Option<Self> {
        (data.dim() == rect.shape()).then_some(Self { data, rect })
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

    /// 列数.
    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// 行数.
    #[inline]
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// 全局点 `p` 处的标记. 不在矩形内时返回 `None`.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Flag> {
        self.data.get(self.rect.to_local(p)?).copied()
    }

    /// 统计标记为 `flag` 的格子数.
    #[inline]
    pub fn count(&self, flag: Flag) -> usize {
        self.data.iter().filter(|&&f| f == flag).count()
    }

    /// 带局部索引的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> IndexedIter<'_, Flag, Ix2> {
        self.data.indexed_iter()
    }

    /// 底层数据的不可变视图.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, Flag> {
        self.data.view()
    }
}

impl Index<Idx2d> for FlagGrid {
    type Output = Flag;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for FlagGrid {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}
