//! 虹膜外边界定位与三态分类.
//!
//! 输入为已经把瞳孔圆盘涂黑的源图. 先按圆弧平均灰度的最大正向跳变估计虹膜外半径,
//! 再用瞳孔两侧的统计区间把外接矩形内的像素分为 `Dark`, `Iris`, `Bright` 三类,
//! 最后经过多数滤波, 环带隔离与缺口修复得到虹膜区域.

mod annulus;
mod classify;
mod grid;
mod radius;

pub use annulus::{isolate_annulus, GapRepair};
pub use classify::{classify, majority_filter, sample_band, Band};
pub use grid::FlagGrid;
pub use radius::{arc_mean, search_iris_radius};

use crate::data::{Circle, PixelBuffer, Rect};
use crate::error::{Degenerate, LocateError, LocateResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 虹膜外边界.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IrisBoundary {
    /// 与瞳孔同心的虹膜外圆.
    pub circle: Circle,

    /// 外圆的外接矩形, 截断到图像内. 后续所有网格都与它对齐.
    pub rect: Rect,
}

/// 以瞳孔为圆心搜索虹膜外圆.
///
/// 参数含义见 [`search_iris_radius`].
pub fn locate_iris_boundary(
    source: &PixelBuffer,
    pupil: &Circle,
    degree: i32,
    step: i32,
    margin: i32,
) -> LocateResult<IrisBoundary> {
    let radius = search_iris_radius(source, pupil, degree, step, margin)?;
    let circle = Circle::new(pupil.center, radius);
    let rect = circle
        .bounding_rect(source.shape())
        .ok_or(LocateError::GeometryDegenerate(Degenerate::EmptyIris))?;
    Ok(IrisBoundary { circle, rect })
}
