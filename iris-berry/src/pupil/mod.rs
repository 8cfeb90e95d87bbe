//! 瞳孔定位.
//!
//! 流程: 直方图阈值 -> 二值化 -> 区域生长 -> 取最大区域 -> 重心与初始半径 ->
//! 凹洞填充 -> 贪心圆拟合.

mod fill;
mod fit;

pub use fill::fill_holes;
pub use fit::{fit_circle, is_dark_circle};

use crate::consts::gray::*;
use crate::data::geometry::round_even;
use crate::data::{Circle, PixelBuffer, Point, Rect};
use crate::error::{LocateError, LocateResult, PupilFailure};
use crate::segment::{segment_region_grow, PointStack};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 瞳孔定位结果.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PupilFit {
    /// 拟合得到的瞳孔圆. 半径恒为正.
    pub circle: Circle,

    /// 由最大区域重心与首个像素得到的初始估计.
    pub seed: Circle,

    /// 最大区域的外接矩形.
    pub bounds: Rect,

    /// 二值化阈值. 小于它的像素为前景.
    pub threshold: u8,

    /// 区域生长得到的区域总数.
    pub segments: usize,
}

/// 按面积比例选择二值化阈值.
///
/// 从灰度 0 开始累加直方图, 直到累计像素数达到总数的 `percent`% 为止,
/// 返回越过目标时的下一个灰度. 若没有任何像素会被划为前景, 返回 `None`.
pub fn select_threshold(buf: &PixelBuffer, percent: u32) -> Option<u8> {
    let hist = buf.histogram();
    let target = buf.size() as u64 * percent as u64 / 100;
    let mut acc = 0u64;
    let mut level = 0usize;
    while acc < target && level < hist.len() {
        acc += hist[level];
        level += 1;
    }
    u8::try_from(level).ok().filter(|&t| t > 0)
}

/// 在源图 `source` 中定位瞳孔. `percent` 为瞳孔预期所占面积百分比.
///
/// `stack` 在调用期间被独占使用.
///
/// # 注意
///
/// 初始半径是首个像素到重心的距离, 只是一个近似值, 随后由圆拟合修正.
pub fn locate_pupil(
    source: &PixelBuffer,
    percent: u32,
    stack: &mut PointStack,
) -> LocateResult<PupilFit> {
    let fail = LocateError::PupilNotFound;
    let threshold = select_threshold(source, percent).ok_or(fail(PupilFailure::NoDarkPixels))?;

    let mut work = source.binarize(threshold);
    let segmentation = segment_region_grow(&mut work, stack);
    let segments = segmentation.count();
    let largest = segmentation
        .into_largest()
        .ok_or(fail(PupilFailure::NoDarkPixels))?;

    let (mx, my) = largest
        .centroid()
        .ok_or(fail(PupilFailure::NoDarkPixels))?;
    let (fh, fw) = largest.first().ok_or(fail(PupilFailure::NoDarkPixels))?;
    let radius = round_even((fw as f64 - mx).hypot(fh as f64 - my));
    if radius <= 0 {
        return Err(fail(PupilFailure::DegenerateSeed));
    }
    let seed = Circle::new(Point::new(round_even(mx), round_even(my)), radius);

    let ((min_h, min_w), (max_h, max_w)) =
        largest.bounds().ok_or(fail(PupilFailure::NoDarkPixels))?;
    let bounds = Rect::new(min_w, min_h, max_w, max_h);

    // 区域生长后 `work` 全为背景, 只把最大区域画回去.
    for &pos in largest.points() {
        work[pos] = FOREGROUND;
    }
    fill_holes(&mut work, &bounds);

    let circle = fit_circle(&work, seed).ok_or(fail(PupilFailure::RadiusCollapsed))?;
    Ok(PupilFit {
        circle,
        seed,
        bounds,
        threshold,
        segments,
    })
}
