//! 上睫毛 (眼睑) 遮挡轮廓估计.
//!
//! 从瞳孔上方沿圆心所在列向上寻找暗格子, 泛洪得到遮挡区域, 取每列最深的行作为轮廓.
//! 也可以不做泛洪, 直接收集种子行以上所有列的暗格子 ([`LashSeed::RowScan`]).
//! 轮廓经过渐进平滑后, 在左右两侧各拟合一条直线, 外推到未检测到遮挡的列.

mod smooth;

use crate::consts::{LASH_FIT_SAMPLES, LASH_ROW_SCAN_PASSES, LASH_SMOOTH_PASSES};
use crate::data::geometry::round_even;
use crate::data::Circle;
use crate::error::{LocateError, LocateResult};
use crate::fitting::{fit_line, Line};
use crate::iris::FlagGrid;
use crate::segment::{FloodTarget, PointStack};
use crate::Idx2d;
use ndarray::Array2;
use smooth::smooth_profile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 沿种子列向上扫描时, 选择哪个暗区域作为遮挡.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LashSeed {
    /// 遇到的第一个暗区域.
    #[default]
    FirstBlob,

    /// 扫描过程中遇到的最大暗区域.
    LargestBlob,

    /// 不做泛洪: 种子行到第 1 行之间所有列的暗格子都算作遮挡.
    RowScan,
}

impl LashSeed {
    /// 所有方式.
    pub const ALL: [LashSeed; 3] = [Self::FirstBlob, Self::LargestBlob, Self::RowScan];

    /// 默认平滑轮数: 行扫描 9 轮, 其余 19 轮.
    #[inline]
    pub fn default_passes(&self) -> usize {
        match self {
            Self::FirstBlob | Self::LargestBlob => LASH_SMOOTH_PASSES,
            Self::RowScan => LASH_ROW_SCAN_PASSES,
        }
    }
}

/// 外推直线的纵向偏移.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResidualOffset {
    /// `profile[b] - line(b)`, 保证边界处连续.
    #[default]
    Signed,

    /// `|trunc(line(b)) - profile[b]|`, 偏移恒为非负.
    Absolute,
}

impl ResidualOffset {
    #[inline]
    fn offset(&self, line: &Line, boundary: usize, value: i32) -> f64 {
        let fitted = line.eval(boundary as f64);
        match self {
            Self::Signed => value as f64 - fitted,
            Self::Absolute => (fitted.trunc() - value as f64).abs(),
        }
    }
}

/// 遮挡估计的参数.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LashOptions {
    /// 种子相对瞳孔上边界向上的行数.
    pub seed_offset: i32,

    /// 暗区域的选择方式.
    pub seed: LashSeed,

    /// 外推直线的偏移方式.
    pub offset: ResidualOffset,

    /// 平滑轮数, 第 `m` 轮的窗口半径为 `m`.
    pub smooth_passes: usize,
}

impl LashOptions {
    /// 平滑轮数取 `seed` 的惯用值.
    pub fn new(seed_offset: i32, seed: LashSeed, offset: ResidualOffset) -> Self {
        Self {
            seed_offset,
            seed,
            offset,
            smooth_passes: seed.default_passes(),
        }
    }
}

impl Default for LashOptions {
    fn default() -> Self {
        Self::new(10, LashSeed::default(), ResidualOffset::default())
    }
}

/// 每列一个整数的遮挡轮廓, 与虹膜外接矩形的列对齐.
///
/// 值为该列被遮挡到的最深的局部行号 (最靠近瞳孔). 外推得到的值可能为负.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LashProfile {
    values: Vec<i32>,
    start: usize,
    end: usize,
    blob: usize,
}

impl LashProfile {
    /// 由已知的轮廓值直接构造, 视所有列都为有效列.
    pub fn from_values(values: Vec<i32>) -> Self {
        let end = values.len().saturating_sub(1);
        Self {
            values,
            start: 0,
            end,
            blob: 0,
        }
    }

    /// 轮廓值.
    #[inline]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// 首个检测到遮挡的列.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// 最后一个检测到遮挡的列.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// 遮挡区域的格子数.
    #[inline]
    pub fn blob_size(&self) -> usize {
        self.blob
    }
}

/// 在标记网格上认领未访问的暗格子. 网格本身不被修改.
struct DarkTarget<'a> {
    grid: &'a FlagGrid,
    visited: Array2<bool>,
}

impl FloodTarget for DarkTarget<'_> {
    #[inline]
    fn shape(&self) -> Idx2d {
        self.grid.shape()
    }

    #[inline]
    fn claim(&mut self, pos: Idx2d) -> bool {
        if self.grid[pos].is_dark() && !self.visited[pos] {
            self.visited[pos] = true;
            true
        } else {
            false
        }
    }
}

/// 收集 `row` 到第 1 行之间所有列的暗格子. 超出网格的行被跳过.
fn scan_rows(grid: &FlagGrid, row: i32) -> Vec<Idx2d> {
    let (h, w) = grid.shape();
    let top = row.min(h as i32 - 1);
    (1..=top)
        .rev()
        .flat_map(|r| (0..w).map(move |c| (r as usize, c)))
        .filter(|&pos| grid[pos].is_dark())
        .collect()
}

/// 从种子点向上扫描, 返回选中的暗区域.
fn find_blob(
    grid: &FlagGrid,
    (mut row, col): (i32, usize),
    policy: LashSeed,
    stack: &mut PointStack,
) -> Vec<Idx2d> {
    let mut target = DarkTarget {
        grid,
        visited: Array2::from_elem(grid.shape(), false),
    };
    let mut best = Vec::new();
    while row > 0 {
        let blob = stack.grow(&mut target, (row as usize, col));
        if !blob.is_empty() {
            if blob.len() > best.len() {
                best = blob.to_vec();
            }
            if policy == LashSeed::FirstBlob {
                break;
            }
        }
        row -= 1;
    }
    best
}

/// 取从 `first` 开始的至多 30 列 (截断到 `values` 末尾) 拟合直线.
fn fit_window(values: &[i32], first: usize) -> Option<Line> {
    let last = (first + LASH_FIT_SAMPLES).min(values.len());
    fit_line((first..last).map(|c| (c as i64, values[c] as i64)))
}

/// 估计上睫毛遮挡轮廓.
///
/// 种子位于瞳孔圆心所在列, 瞳孔上边界再往上 `opts.seed_offset` 行处. `stack` 在调用期间被独占使用,
/// 行扫描方式不使用它.
///
/// # 注意
///
/// 没有找到任何遮挡, 或轮廓无法外推时返回 `OcclusionNotFound`,
/// 这是非致命错误, 调用方可以选择按无遮挡继续.
pub fn estimate_lash(
    grid: &FlagGrid,
    pupil: &Circle,
    opts: &LashOptions,
    stack: &mut PointStack,
) -> LocateResult<LashProfile> {
    let rect = *grid.rect();
    let row = (pupil.center.y - pupil.radius) - rect.y1 as i32 - opts.seed_offset;
    let col = usize::try_from(pupil.center.x - rect.x1 as i32)
        .ok()
        .filter(|&c| c < grid.width())
        .ok_or(LocateError::OcclusionNotFound)?;

    let blob = match opts.seed {
        LashSeed::RowScan => scan_rows(grid, row),
        seed => find_blob(grid, (row, col), seed, stack),
    };
    if blob.is_empty() {
        return Err(LocateError::OcclusionNotFound);
    }

    let width = grid.width();
    let mut values = vec![0i32; width];
    for &(h, w) in blob.iter() {
        values[w] = values[w].max(h as i32);
    }
    let start = values
        .iter()
        .position(|&v| v != 0)
        .ok_or(LocateError::OcclusionNotFound)?;
    let end = values.iter().rposition(|&v| v != 0).unwrap_or(start);

    smooth_profile(&mut values, start, end, opts.smooth_passes);

    let left = fit_window(&values, width / 4).ok_or(LocateError::OcclusionNotFound)?;
    let right = fit_window(&values, 3 * width / 4).ok_or(LocateError::OcclusionNotFound)?;
    let left_off = opts.offset.offset(&left, start, values[start]);
    let right_off = opts.offset.offset(&right, end, values[end]);
    for c in 0..start {
        values[c] = round_even(left.eval(c as f64) + left_off);
    }
    for c in end + 1..width {
        values[c] = round_even(right.eval(c as f64) + right_off);
    }

    Ok(LashProfile {
        values,
        start,
        end,
        blob: blob.len(),
    })
}
