//! 虹膜外半径搜索.

use crate::consts::IRIS_SEARCH_STEPS;
use crate::data::geometry::{round_even, sample_polar};
use crate::data::{Circle, PixelBuffer};
use crate::error::{Degenerate, LocateError, LocateResult};

/// 半径 `radius` 处四段圆弧的平均灰度.
///
/// 四段圆弧为 `[0°, d)`, `[360° - d, 360°)`, `[180° - d, 180°)`, `[180°, 180° + d)`,
/// 即水平方向两侧各 `2d` 度. 任一采样点越界时返回 `ArcOutOfBounds`.
pub fn arc_mean(source: &PixelBuffer, circle: Circle, degree: i32) -> LocateResult<f64> {
    let arcs = [
        0..degree,
        360 - degree..360,
        180 - degree..180,
        180..180 + degree,
    ];
    let mut sum = 0u64;
    for d in arcs.into_iter().flatten() {
        let v = source
            .at(sample_polar(circle.center, circle.radius, d))
            .ok_or(LocateError::GeometryDegenerate(Degenerate::ArcOutOfBounds))?;
        sum += v as u64;
    }
    Ok(sum as f64 / (4 * degree) as f64)
}

/// 从 `pupil.radius + margin` 开始, 以 `step` 为步长增大半径,
/// 返回相邻两步平均灰度增量最大处的半径.
///
/// # 注意
///
/// 1. 只在水平方向检查越界 (`cx ± r`), 纵向越界会以 `ArcOutOfBounds` 失败.
/// 2. 若平均灰度从未正向跳变, 返回 `NoContrastEdge`.
/// 3. 记录的最大增量是取整后的整数, 后续步骤须严格超过它.
pub fn search_iris_radius(
    source: &PixelBuffer,
    pupil: &Circle,
    degree: i32,
    step: i32,
    margin: i32,
) -> LocateResult<i32> {
    let width = source.width() as i32;
    let cx = pupil.center.x;
    let mut radius = pupil.radius + margin;
    let mut new = arc_mean(source, Circle::new(pupil.center, radius), degree)?;
    let (mut best, mut pos) = (0i32, 0i32);

    for _ in 0..IRIS_SEARCH_STEPS {
        radius += step;
        if cx + radius >= width || cx - radius < 0 {
            break;
        }
        let old = new;
        new = arc_mean(source, Circle::new(pupil.center, radius), degree)?;
        let diff = new - old;
        if diff > best as f64 {
            best = round_even(diff);
            pos = radius;
        }
    }

    match pos {
        0 => Err(LocateError::GeometryDegenerate(Degenerate::NoContrastEdge)),
        r => Ok(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EyePhantom, Point};

    fn painted_phantom() -> (PixelBuffer, Circle) {
        let mut img = EyePhantom::default().render();
        let pupil = Circle::new(Point::new(64, 64), 11);
        img.fill_disk(&pupil, 0);
        (img, pupil)
    }

    #[test]
    fn test_arc_mean_uniform() {
        let img = PixelBuffer::new(32, 32, 90);
        let m = arc_mean(&img, Circle::new(Point::new(16, 16), 10), 40).unwrap();
        assert!((m - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_search_phantom() {
        let (img, pupil) = painted_phantom();
        assert_eq!(search_iris_radius(&img, &pupil, 40, 2, 6).unwrap(), 41);
    }

    #[test]
    fn test_no_contrast() {
        let img = PixelBuffer::new(64, 64, 230);
        let pupil = Circle::new(Point::new(32, 32), 9);
        let err = search_iris_radius(&img, &pupil, 40, 2, 6).unwrap_err();
        assert!(matches!(
            err,
            LocateError::GeometryDegenerate(Degenerate::NoContrastEdge)
        ));
    }

    /// 宽而矮的图像: 水平方向仍有余量, 纵向采样先越界.
    #[test]
    fn test_vertical_overflow() {
        let img = PixelBuffer::new(200, 40, 100);
        let pupil = Circle::new(Point::new(100, 20), 5);
        let err = search_iris_radius(&img, &pupil, 40, 2, 6).unwrap_err();
        assert!(matches!(
            err,
            LocateError::GeometryDegenerate(Degenerate::ArcOutOfBounds)
        ));
    }
}
