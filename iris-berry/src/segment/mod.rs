//! 二值图像的 4-连通区域生长.
//!
//! 输入为只包含 [`FOREGROUND`] 和 [`BACKGROUND`] 的工作图. 光栅扫描遇到的每个前景像素都会触发一次
//! 显式栈泛洪, 被发现的像素立即涂为背景, 因此所有区域两两不交, 且恰好覆盖全部前景.

mod arena;

pub use arena::PointStack;
pub(crate) use arena::FloodTarget;

use crate::consts::gray::*;
use crate::data::PixelBuffer;
use crate::Idx2d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一个连通区域. 像素按发现顺序排列, 首个像素为光栅扫描遇到的种子.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    points: Vec<Idx2d>,
}

impl Segment {
    /// 区域像素, 以 `(h, w)` 表示.
    #[inline]
    pub fn points(&self) -> &[Idx2d] {
        &self.points
    }

    /// 像素个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 首个 (种子) 像素.
    #[inline]
    pub fn first(&self) -> Option<Idx2d> {
        self.points.first().copied()
    }

    /// 外接矩形 `(min_h, min_w, max_h, max_w)`. 空区域返回 `None`.
    pub fn bounds(&self) -> Option<(Idx2d, Idx2d)> {
        let first = self.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), &(h, w)| {
            ((lo.0.min(h), lo.1.min(w)), (hi.0.max(h), hi.1.max(w)))
        }))
    }

    /// 重心 `(x, y)`, 不取整.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let (sum_h, sum_w) = self
            .points
            .iter()
            .fold((0u64, 0u64), |(a, b), &(h, w)| (a + h as u64, b + w as u64));
        let n = self.len() as f64;
        Some((sum_w as f64 / n, sum_h as f64 / n))
    }
}

/// 区域生长结果. 区域按发现顺序 (即种子的光栅顺序) 排列.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Segmentation {
    segments: Vec<Segment>,
}

impl Segmentation {
    /// 所有区域.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 区域总数.
    #[inline]
    pub fn count(&self) -> usize {
        self.segments.len()
    }

    /// 像素最多的区域. 并列时取最早发现的那个.
    pub fn largest(&self) -> Option<&Segment> {
        // `max_by_key` 在并列时返回最后一个, 因此逆序遍历.
        self.segments.iter().rev().max_by_key(|s| s.len())
    }

    /// 消费自我, 取出像素最多的区域.
    pub fn into_largest(self) -> Option<Segment> {
        let idx = self
            .segments
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, s)| s.len())?
            .0;
        self.segments.into_iter().nth(idx)
    }
}

/// 把二值工作图视作泛洪目标: 认领前景像素并将其涂为背景.
struct BinaryTarget<'a>(&'a mut PixelBuffer);

impl FloodTarget for BinaryTarget<'_> {
    #[inline]
    fn shape(&self) -> Idx2d {
        self.0.shape()
    }

    #[inline]
    fn claim(&mut self, pos: Idx2d) -> bool {
        if is_foreground(self.0[pos]) {
            self.0[pos] = BACKGROUND;
            true
        } else {
            false
        }
    }
}

/// 对二值工作图 `work` 进行区域生长.
///
/// # 注意
///
/// 1. 结束后 `work` 的所有前景像素都被涂为背景.
/// 2. `stack` 在调用期间被独占使用, 调用结束后其中的内容没有意义.
pub fn segment_region_grow(work: &mut PixelBuffer, stack: &mut PointStack) -> Segmentation {
    let (height, width) = work.shape();
    let mut segments = Vec::with_capacity(4);
    for h in 0..height {
        for w in 0..width {
            if is_background(work[(h, w)]) {
                continue;
            }
            let points = stack.grow(&mut BinaryTarget(work), (h, w)).to_vec();
            segments.push(Segment { points });
        }
    }
    Segmentation { segments }
}
