//! 三态分类与多数滤波.

use super::FlagGrid;
use crate::consts::Flag;
use crate::data::stats::MeanStd;
use crate::data::{Circle, PixelBuffer, Point};
use crate::error::{Degenerate, LocateError, LocateResult};
use crate::Idx2d;
use itertools::iproduct;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 虹膜灰度的内点区间.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Band {
    /// 两侧采样矩形的统计量.
    pub stats: MeanStd,

    /// 区间下界 (含).
    pub min: f64,

    /// 区间上界 (含).
    pub max: f64,
}

impl Band {
    /// 对单个灰度分类.
    #[inline]
    pub fn classify(&self, v: u8) -> Flag {
        let v = v as f64;
        if v < self.min {
            Flag::Dark
        } else if v > self.max {
            Flag::Bright
        } else {
            Flag::Iris
        }
    }
}

/// 在瞳孔左右两侧的矩形中采样, 估计虹膜灰度的内点区间 `mean ± theta·std`.
///
/// 设 `sp = pr + safe_margin`, `si = ir - safe_margin`,
/// 左矩形 x 取 `[cx - si, cx - sp)`, 右矩形 x 取 `[cx + sp, cx + si)`,
/// 两者 y 均取 `[cy - sp / 2, cy - sp / 2 + sp)`.
///
/// 采样为空或越界时返回 `EmptyBand`.
pub fn sample_band(
    source: &PixelBuffer,
    pupil: &Circle,
    iris_radius: i32,
    theta: f64,
    safe_margin: i32,
) -> LocateResult<Band> {
    let empty = LocateError::GeometryDegenerate(Degenerate::EmptyBand);
    let Point { x: cx, y: cy } = pupil.center;
    let sp = pupil.radius + safe_margin;
    let si = iris_radius - safe_margin;
    let sy = cy - sp / 2;

    let left = iproduct!(sy..sy + sp, cx - si..cx - sp);
    let right = iproduct!(sy..sy + sp, cx + sp..cx + si);
    let values = left
        .chain(right)
        .map(|(y, x)| source.at(Point::new(x, y)).map(|v| v as f64))
        .collect::<Option<Vec<_>>>()
        .ok_or(empty)?;

    let stats = MeanStd::from_values(values.iter().copied())
        .ok_or(LocateError::GeometryDegenerate(Degenerate::EmptyBand))?;
    let (min, max) = stats.band(theta);
    Ok(Band { stats, min, max })
}

/// 对以瞳孔圆心为中心, `iris_radius` 为半径的外接矩形 (截断到图像内) 做三态分类.
pub fn classify(
    source: &PixelBuffer,
    center: Point,
    iris_radius: i32,
    band: &Band,
) -> LocateResult<FlagGrid> {
    let rect = Circle::new(center, iris_radius)
        .bounding_rect(source.shape())
        .ok_or(LocateError::GeometryDegenerate(Degenerate::EmptyIris))?;
    let mut grid = FlagGrid::new(rect, Flag::Dark);
    for h in 0..rect.height() {
        for w in 0..rect.width() {
            grid[(h, w)] = band.classify(source[(rect.y1 + h, rect.x1 + w)]);
        }
    }
    Ok(grid)
}

/// 获得 `(h, w)` 的 8-邻居索引. 调用方保证 `(h, w)` 不在边界上.
#[inline]
fn neighbour8((h, w): Idx2d) -> [Idx2d; 8] {
    [
        (h - 1, w - 1),
        (h - 1, w),
        (h - 1, w + 1),
        (h, w - 1),
        (h, w + 1),
        (h + 1, w - 1),
        (h + 1, w),
        (h + 1, w + 1),
    ]
}

/// 多数滤波: 非虹膜格子的 8-邻域中虹膜格子数多于 `threshold` 时, 改为虹膜.
///
/// 只处理内部格子, 按光栅顺序原地修改, 因此靠后的格子能看到前面的修改.
/// 返回被修改的格子数.
pub fn majority_filter(grid: &mut FlagGrid, threshold: usize) -> usize {
    let (height, width) = grid.shape();
    let mut changed = 0;
    for h in 1..height.saturating_sub(1) {
        for w in 1..width.saturating_sub(1) {
            if grid[(h, w)].is_iris() {
                continue;
            }
            let n = neighbour8((h, w))
                .iter()
                .filter(|&&p| grid[p].is_iris())
                .count();
            if n > threshold {
                grid[(h, w)] = Flag::Iris;
                changed += 1;
            }
        }
    }
    changed
}
