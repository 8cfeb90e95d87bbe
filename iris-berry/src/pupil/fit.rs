//! 圆边界检测与贪心圆拟合.

use crate::consts::{gray::is_foreground, CIRCLE_SAMPLES};
use crate::data::{Circle, PixelBuffer};

/// 圆心平移的优先顺序 `(dx, dy)`.
const SHIFTS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// 圆周上的 361 个采样点 (0° 到 360°) 是否全部落在图像内且为前景.
pub fn is_dark_circle(work: &PixelBuffer, circle: Circle) -> bool {
    (0..CIRCLE_SAMPLES as i32).all(|degree| work.at(circle.sample(degree)).is_some_and(is_foreground))
}

/// 从初始估计 `seed` 出发, 贪心地拟合二值图中前景圆盘的边界.
///
/// 1. 缩小半径直到边界检测通过;
/// 2. 检测通过时不断增大半径;
/// 3. 检测失败时按固定优先级尝试将圆心平移一个像素, 成功则回到第 2 步;
/// 4. 所有方向都失败时结束.
///
/// 返回最终圆心处最后一个通过检测的半径. 若收缩阶段半径小于 0,
/// 或最终半径不为正, 返回 `None`.
///
/// # 注意
///
/// 这是贪心的启发式方法, 结果不一定是最大内切圆.
pub fn fit_circle(work: &PixelBuffer, seed: Circle) -> Option<Circle> {
    let Circle { mut center, mut radius } = seed;

    while !is_dark_circle(work, Circle::new(center, radius)) {
        radius -= 1;
        if radius < 0 {
            return None;
        }
    }

    loop {
        while is_dark_circle(work, Circle::new(center, radius)) {
            radius += 1;
        }
        match SHIFTS
            .iter()
            .map(|&(dx, dy)| center.offset(dx, dy))
            .find(|&c| is_dark_circle(work, Circle::new(c, radius)))
        {
            Some(c) => center = c,
            None => break,
        }
    }

    let fitted = Circle::new(center, radius - 1);
    fitted.is_valid().then_some(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::gray::*;
    use crate::data::Point;

    fn disk(cx: i32, cy: i32, r: i32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(64, 64, BACKGROUND);
        buf.fill_disk(&Circle::new(Point::new(cx, cy), r), FOREGROUND);
        buf
    }

    /// 拟合结果的 361 个采样点全为前景, 且半径再加一就不满足.
    #[test]
    fn test_fit_invariant() {
        for (cx, cy, r) in [(32, 32, 10), (20, 25, 7), (40, 30, 15), (31, 33, 4)] {
            let work = disk(cx, cy, r);
            let fit = fit_circle(&work, Circle::new(Point::new(cx, cy), r)).unwrap();
            assert_eq!(fit.center, Point::new(cx, cy));
            assert_eq!(fit.radius, r - 1);
            assert!(is_dark_circle(&work, fit));
            assert!(!is_dark_circle(&work, Circle::new(fit.center, fit.radius + 1)));
        }
    }

    /// 圆心偏离时通过平移回到真实圆心附近.
    #[test]
    fn test_fit_shifts_center() {
        let work = disk(32, 32, 10);
        let fit = fit_circle(&work, Circle::new(Point::new(30, 33), 2)).unwrap();
        assert!(fit.center.dist2(Point::new(32, 32)) <= 2);
        assert!((8..=10).contains(&fit.radius));
        assert!(is_dark_circle(&work, fit));
    }

    #[test]
    fn test_fit_collapse() {
        let work = PixelBuffer::new(16, 16, BACKGROUND);
        assert!(fit_circle(&work, Circle::new(Point::new(8, 8), 5)).is_none());

        // 单个前景像素: 半径 0 通过, 半径 1 失败, 最终半径 0 不合法.
        let mut work = work;
        work.set(8, 8, FOREGROUND);
        assert!(fit_circle(&work, Circle::new(Point::new(8, 8), 3)).is_none());
    }

    #[test]
    fn test_circle_off_buffer() {
        let work = PixelBuffer::new(16, 16, FOREGROUND);
        assert!(is_dark_circle(&work, Circle::new(Point::new(8, 8), 7)));
        assert!(!is_dark_circle(&work, Circle::new(Point::new(8, 8), 8)));
    }
}
