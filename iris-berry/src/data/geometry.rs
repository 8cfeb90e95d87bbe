//! 平面几何基础类型: 整数点, 圆与闭区间矩形.

use crate::Idx2d;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 半数取偶的四舍五入, 结果饱和到 `i32`.
#[inline]
pub(crate) fn round_even(v: f64) -> i32 {
    v.round_ties_even() as i32
}

/// 平面整数点 `(x, y)`. x 向右, y 向下.
///
/// # 注意
///
/// 与 [`Idx2d`] 的 `(h, w)` 顺序相反. 分量可以为负,
/// 以便表达平移后的圆心或越界的采样点.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// 横坐标 (列).
    pub x: i32,

    /// 纵坐标 (行).
    pub y: i32,
}

impl Point {
    /// 直接初始化.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 由 `(h, w)` 索引构造.
    #[inline]
    pub fn from_idx((h, w): Idx2d) -> Self {
        Self::new(w as i32, h as i32)
    }

    /// 转换为 `(h, w)` 索引. 任一分量为负时返回 `None`.
    #[inline]
    pub fn to_idx(self) -> Option<Idx2d> {
        Some((usize::try_from(self.y).ok()?, usize::try_from(self.x).ok()?))
    }

    /// 平移.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// 到 `other` 的欧氏距离平方.
    #[inline]
    pub fn dist2(self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// 整数圆. 合法的瞳孔/虹膜结果要求 `radius > 0`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    /// 圆心.
    pub center: Point,

    /// 半径.
    pub radius: i32,
}

impl Circle {
    /// 直接初始化.
    #[inline]
    pub const fn new(center: Point, radius: i32) -> Self {
        Self { center, radius }
    }

    /// 是否为合法结果.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.radius > 0
    }

    /// 点 `p` 是否落在闭圆盘 `dx² + dy² <= r²` 内.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        let r = self.radius as i64;
        self.center.dist2(p) <= r * r
    }

    /// 以 `degree` 度角在圆周上取样, 坐标按半数取偶规则取整.
    #[inline]
    pub fn sample(&self, degree: i32) -> Point {
        sample_polar(self.center, self.radius, degree)
    }

    /// 圆盘在 `bounds` 范围内的外接矩形. 与图像不相交时返回 `None`.
    pub fn bounding_rect(&self, (height, width): Idx2d) -> Option<Rect> {
        if height == 0 || width == 0 {
            return None;
        }
        let Point { x, y } = self.center;
        let r = self.radius.max(0);
        let (x1, x2) = ((x - r).max(0), (x + r).min(width as i32 - 1));
        let (y1, y2) = ((y - r).max(0), (y + r).min(height as i32 - 1));
        (x1 <= x2 && y1 <= y2).then(|| Rect::new(x1 as usize, y1 as usize, x2 as usize, y2 as usize))
    }
}

/// 以 `center` 为圆心, `radius` 为半径, `degree` 度角取样.
#[inline]
pub(crate) fn sample_polar(center: Point, radius: i32, degree: i32) -> Point {
    let theta = degree as f64 * PI / 180.0;
    let r = radius as f64;
    Point::new(
        round_even(r * theta.cos() + center.x as f64),
        round_even(r * theta.sin() + center.y as f64),
    )
}

/// 闭区间矩形 `[x1, x2] × [y1, y2]`, 以全局像素坐标表示.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// 左边界 (含).
    pub x1: usize,

    /// 上边界 (含).
    pub y1: usize,

    /// 右边界 (含).
    pub x2: usize,

    /// 下边界 (含).
    pub y2: usize,
}

impl Rect {
    /// 初始化. 要求 `x1 <= x2` 且 `y1 <= y2`, 否则 panic.
    #[inline]
    pub fn new(x1: usize, y1: usize, x2: usize, y2: usize) -> Self {
        assert!(x1 <= x2 && y1 <= y2, "矩形边界顺序错误");
        Self { x1, y1, x2, y2 }
    }

    /// 宽度.
    #[inline]
    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    /// 高度.
    #[inline]
    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }

    /// 以 `(h, w)` 表示的形状.
    #[inline]
    pub fn shape(&self) -> Idx2d {
        (self.height(), self.width())
    }

    /// 全局点 `p` 是否在矩形内.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.to_idx()
            .is_some_and(|(h, w)| (self.y1..=self.y2).contains(&h) && (self.x1..=self.x2).contains(&w))
    }

    /// 局部索引 `(h, w)` 对应的全局点.
    #[inline]
    pub fn to_global(&self, (h, w): Idx2d) -> Point {
        Point::new((self.x1 + w) as i32, (self.y1 + h) as i32)
    }

    /// 全局点对应的局部索引. 不在矩形内时返回 `None`.
    #[inline]
    pub fn to_local(&self, p: Point) -> Option<Idx2d> {
        self.contains(p)
            .then(|| (p.y as usize - self.y1, p.x as usize - self.x1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_even() {
        assert_eq!(round_even(0.5), 0);
        assert_eq!(round_even(1.5), 2);
        assert_eq!(round_even(2.5), 2);
        assert_eq!(round_even(-0.5), 0);
        assert_eq!(round_even(-1.5), -2);
        assert_eq!(round_even(2.4999), 2);
    }

    #[test]
    fn test_circle_sample() {
        let c = Circle::new(Point::new(10, 20), 5);
        assert_eq!(c.sample(0), Point::new(15, 20));
        assert_eq!(c.sample(90), Point::new(10, 25));
        assert_eq!(c.sample(180), Point::new(5, 20));
        assert_eq!(c.sample(270), Point::new(10, 15));
        assert_eq!(c.sample(360), c.sample(0));
    }

    #[test]
    fn test_circle_contains() {
        let c = Circle::new(Point::new(0, 0), 3);
        assert!(c.contains(Point::new(3, 0)));
        assert!(c.contains(Point::new(2, 2)));
        assert!(!c.contains(Point::new(3, 1)));
        assert!(!Circle::new(Point::new(0, 0), 0).is_valid());
    }

    #[test]
    fn test_bounding_rect_clamped() {
        let c = Circle::new(Point::new(2, 30), 5);
        let r = c.bounding_rect((32, 40)).unwrap();
        assert_eq!(r, Rect::new(0, 25, 7, 31));
        assert_eq!(r.shape(), (7, 8));

        let far = Circle::new(Point::new(-20, -20), 3);
        assert!(far.bounding_rect((32, 40)).is_none());
    }

    #[test]
    fn test_rect_local_global() {
        let r = Rect::new(4, 6, 9, 10);
        assert_eq!(r.to_local(Point::new(4, 6)), Some((0, 0)));
        assert_eq!(r.to_local(Point::new(9, 10)), Some((4, 5)));
        assert_eq!(r.to_local(Point::new(3, 6)), None);
        assert_eq!(r.to_local(Point::new(-1, -1)), None);
        assert_eq!(r.to_global((4, 5)), Point::new(9, 10));
    }
}
