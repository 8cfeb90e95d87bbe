//! 虹膜环带的隔离与高光缺口修复.

use super::FlagGrid;
use crate::consts::Flag;
use crate::data::Circle;
use crate::lash::LashProfile;
use crate::Idx2d;
use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 绘制在外接矩形上的参考圆图层.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Overlay {
    Outside,
    Pupil,
    Annulus,
    Gap,
    Repaired,
}

/// 环带上哪些非虹膜格子可以被修复.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GapRepair {
    /// 只修复高光 (`Bright`) 缺口.
    #[default]
    Bright,

    /// 修复所有非虹膜格子, 包括暗像素.
    NonIris,
}

impl GapRepair {
    #[inline]
    fn is_candidate(&self, flag: Flag) -> bool {
        match self {
            Self::Bright => flag.is_bright(),
            Self::NonIris => !flag.is_iris(),
        }
    }
}

/// 构造参考圆图层. 睫毛轮廓以上 (含) 的格子视作瞳孔, 即被遮挡.
fn draw_overlay(
    grid: &FlagGrid,
    pupil: &Circle,
    iris: &Circle,
    lash: Option<&LashProfile>,
) -> Array2<Overlay> {
    let rect = *grid.rect();
    let mut overlay = Array2::from_shape_fn(grid.shape(), |pos| {
        let p = rect.to_global(pos);
        if pupil.contains(p) {
            Overlay::Pupil
        } else if iris.contains(p) {
            Overlay::Annulus
        } else {
            Overlay::Outside
        }
    });

    if let Some(profile) = lash {
        let last_row = grid.height().saturating_sub(1);
        for (w, &depth) in profile.values().iter().enumerate().take(grid.width()) {
            let bottom = (depth.max(0) as usize).min(last_row);
            for h in 0..=bottom {
                overlay[(h, w)] = Overlay::Pupil;
            }
        }
    }
    overlay
}

/// 沿 `it` 扫描: 遇到环带格子后, 之后的缺口格子改为虹膜.
fn repair_interval<I>(grid: &mut FlagGrid, overlay: &mut Array2<Overlay>, it: I) -> usize
where
    I: Iterator<Item = Idx2d>,
{
    let mut anchored = false;
    let mut repaired = 0;
    for pos in it {
        match overlay[pos] {
            Overlay::Annulus => anchored = true,
            Overlay::Gap if anchored => {
                overlay[pos] = Overlay::Repaired;
                grid[pos] = Flag::Iris;
                repaired += 1;
            }
            _ => {}
        }
    }
    repaired
}

/// 只保留虹膜环带上的虹膜格子, 并修复环带上的高光缺口.
///
/// 1. 环带外 (含瞳孔与被睫毛遮挡处) 的虹膜格子改为 `Dark`;
/// 2. 环带上满足 `policy` 的非虹膜格子标记为缺口;
/// 3. 沿左, 右, 上, 下四条半轴从外向内扫描, 已见过环带格子后遇到的缺口改为 `Iris`.
///
/// 返回被修复的格子数.
pub fn isolate_annulus(
    grid: &mut FlagGrid,
    pupil: &Circle,
    iris: &Circle,
    lash: Option<&LashProfile>,
    policy: GapRepair,
) -> usize {
    let mut overlay = draw_overlay(grid, pupil, iris, lash);
    let (height, width) = grid.shape();

    for h in 0..height {
        for w in 0..width {
            let flag = grid[(h, w)];
            let on_annulus = overlay[(h, w)] == Overlay::Annulus;
            if flag.is_iris() {
                if !on_annulus {
                    grid[(h, w)] = Flag::Dark;
                }
            } else if on_annulus && policy.is_candidate(flag) {
                overlay[(h, w)] = Overlay::Gap;
            }
        }
    }

    let mut repaired = 0;
    let (half_w, half_h) = (width / 2, height / 2);
    for h in 0..height {
        repaired += repair_interval(grid, &mut overlay, (0..=half_w).map(|w| (h, w)));
        repaired += repair_interval(grid, &mut overlay, (half_w + 1..width).rev().map(|w| (h, w)));
    }
    for w in 0..width {
        repaired += repair_interval(grid, &mut overlay, (0..=half_h).map(|h| (h, w)));
        repaired += repair_interval(grid, &mut overlay, (half_h + 1..height).rev().map(|h| (h, w)));
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Point, Rect};

    fn setup() -> (FlagGrid, Circle, Circle) {
        let pupil = Circle::new(Point::new(10, 10), 3);
        let iris = Circle::new(Point::new(10, 10), 8);
        let grid = FlagGrid::new(Rect::new(2, 2, 18, 18), Flag::Iris);
        (grid, pupil, iris)
    }

    #[test]
    fn test_isolate_keeps_annulus() {
        let (mut grid, pupil, iris) = setup();
        assert_eq!(isolate_annulus(&mut grid, &pupil, &iris, None, GapRepair::Bright), 0);
        for ((h, w), &flag) in grid.indexed_iter() {
            let p = grid.rect().to_global((h, w));
            let expect = iris.contains(p) && !pupil.contains(p);
            assert_eq!(flag.is_iris(), expect, "{p:?}");
        }
    }

    #[test]
    fn test_repair_bright_gap() {
        let (mut grid, pupil, iris) = setup();
        // 环带中的一个高光点和一个暗点.
        let bright = grid.rect().to_local(Point::new(15, 10)).unwrap();
        let dark = grid.rect().to_local(Point::new(5, 10)).unwrap();
        grid[bright] = Flag::Bright;
        grid[dark] = Flag::Dark;

        let mut strict = grid.clone();
        assert_eq!(isolate_annulus(&mut strict, &pupil, &iris, None, GapRepair::Bright), 1);
        assert!(strict[bright].is_iris());
        assert!(strict[dark].is_dark());

        assert_eq!(isolate_annulus(&mut grid, &pupil, &iris, None, GapRepair::NonIris), 2);
        assert!(grid[dark].is_iris());
    }

    #[test]
    fn test_lash_mask() {
        let (mut grid, pupil, iris) = setup();
        let profile = LashProfile::from_values(vec![4; 17]);
        isolate_annulus(&mut grid, &pupil, &iris, Some(&profile), GapRepair::Bright);
        for w in 0..grid.width() {
            for h in 0..=4 {
                assert!(grid[(h, w)].is_dark());
            }
        }
        // 第 5 行不受遮挡, 环带上的格子仍是虹膜.
        assert!(grid[(5, 2)].is_iris());
    }
}
