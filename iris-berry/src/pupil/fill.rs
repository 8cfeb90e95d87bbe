//! 区间扫描式的凹洞填充.

use crate::consts::gray::*;
use crate::data::{PixelBuffer, Rect};
use crate::Idx2d;

/// 沿 `it` 扫描: 一旦遇到前景像素, 之后的背景像素都涂为前景.
fn scan_interval<I: Iterator<Item = Idx2d>>(work: &mut PixelBuffer, it: I) {
    let mut seen = false;
    for pos in it {
        if is_foreground(work[pos]) {
            seen = true;
        } else if seen {
            work[pos] = FOREGROUND;
        }
    }
}

/// 在外接矩形 `rect` 内填充前景区域的凹洞.
///
/// 每一行从左右两端分别向中线扫描, 每一列从上下两端分别向中线扫描.
///
/// # 注意
///
/// 这不是基于泛洪的通用孔洞填充, 只能处理从边缘方向看去的凹陷.
pub fn fill_holes(work: &mut PixelBuffer, rect: &Rect) {
    let Rect { x1, y1, x2, y2 } = *rect;

    let hs = (x2 - x1 + 1) / 2;
    for h in y1..=y2 {
        scan_interval(work, (x1..=x1 + hs).map(|w| (h, w)));
        scan_interval(work, (x2 + 1 - hs..=x2).rev().map(|w| (h, w)));
    }

    let hs = (y2 - y1 + 1) / 2;
    for w in x1..=x2 {
        scan_interval(work, (y1..=y1 + hs).map(|h| (h, w)));
        scan_interval(work, (y2 + 1 - hs..=y2).rev().map(|h| (h, w)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_ring() {
        // 7 × 7 的空心方环.
        let mut work = PixelBuffer::new(9, 9, BACKGROUND);
        for i in 1..=7 {
            for j in [1, 7] {
                work.set(i, j, FOREGROUND);
                work.set(j, i, FOREGROUND);
            }
        }
        fill_holes(&mut work, &Rect::new(1, 1, 7, 7));
        assert_eq!(work.count(FOREGROUND), 49);
        assert_eq!(work.get(0, 0), Some(BACKGROUND));
        assert_eq!(work.get(8, 4), Some(BACKGROUND));
    }

    #[test]
    fn test_fill_notch() {
        // (0, 1) 在行方向上位于扫描起点之前, 由列方向的扫描补上.
        let mut work = PixelBuffer::new(6, 4, FOREGROUND);
        work.set(0, 1, BACKGROUND);
        work.set(2, 2, BACKGROUND);
        fill_holes(&mut work, &Rect::new(0, 0, 5, 3));
        assert_eq!(work.get(0, 1), Some(FOREGROUND));
        assert_eq!(work.get(2, 2), Some(FOREGROUND));
    }
}
