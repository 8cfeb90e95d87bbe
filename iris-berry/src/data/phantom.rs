//! 合成眼部体模. 用于测试与消融实验.
//!
//! 体模由四层组成 (优先级从高到低): 上眼睑遮挡, 瞳孔圆盘, 带纹理的虹膜环, 巩膜.
//! 所有像素值都是确定性的, 不含随机数.

use super::{Circle, PixelBuffer, Point};

/// 抛物线形的上眼睑遮挡.
///
/// 对于列 `x`, 所有满足 `(y - depth) * spread < -(x - cx)²` 的行 `y`
/// 都被遮挡, 即遮挡在瞳孔正上方最深 (到 `depth` 行为止), 向两侧逐渐变浅.
#[derive(Copy, Clone, Debug)]
pub struct LidShape {
    /// 瞳孔中心列处遮挡的下边界 (不含).
    pub depth: i32,

    /// 抛物线开口宽度, 越大遮挡越平.
    pub spread: i32,

    /// 遮挡区域灰度.
    pub gray: u8,
}

/// 合成眼部体模参数.
#[derive(Copy, Clone, Debug)]
pub struct EyePhantom {
    /// 图像宽度.
    pub width: usize,

    /// 图像高度.
    pub height: usize,

    /// 瞳孔与虹膜的公共圆心.
    pub center: Point,

    /// 瞳孔半径.
    pub pupil_radius: i32,

    /// 虹膜外半径.
    pub iris_radius: i32,

    /// 瞳孔灰度.
    pub pupil_gray: u8,

    /// 虹膜纹理基准灰度.
    pub iris_gray: u8,

    /// 虹膜纹理振幅. 纹理取值于 `iris_gray ± texture`.
    pub texture: u8,

    /// 巩膜灰度.
    pub sclera_gray: u8,

    /// 可选的上眼睑遮挡.
    pub lid: Option<LidShape>,
}

impl Default for EyePhantom {
    /// 128 × 128, 圆心 (64, 64), 瞳孔半径 12, 虹膜半径 40, 无遮挡.
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            center: Point::new(64, 64),
            pupil_radius: 12,
            iris_radius: 40,
            pupil_gray: 20,
            iris_gray: 110,
            texture: 10,
            sclera_gray: 215,
            lid: None,
        }
    }
}

impl EyePhantom {
    /// 在默认体模上添加一个中心深度为 36 行, 开口宽度为 60 的上眼睑.
    pub fn with_default_lid(mut self) -> Self {
        self.lid = Some(LidShape {
            depth: 36,
            spread: 60,
            gray: 30,
        });
        self
    }

    /// 真实瞳孔圆.
    #[inline]
    pub fn pupil(&self) -> Circle {
        Circle::new(self.center, self.pupil_radius)
    }

    /// 真实虹膜外圆.
    #[inline]
    pub fn iris(&self) -> Circle {
        Circle::new(self.center, self.iris_radius)
    }

    /// `(x, y)` 是否被眼睑遮挡.
    #[inline]
    pub fn is_occluded(&self, p: Point) -> bool {
        self.lid.is_some_and(|lid| {
            let dx = (p.x - self.center.x) as i64;
            ((p.y - lid.depth) as i64) * (lid.spread as i64) < -(dx * dx)
        })
    }

    /// 虹膜纹理在 `(x, y)` 处的灰度. 周期性斜纹.
    #[inline]
    fn texture_at(&self, p: Point) -> u8 {
        let amp = self.texture as i32;
        let period = 2 * amp + 1;
        let wave = (p.x * 7 + p.y * 13).rem_euclid(period) - amp;
        (self.iris_gray as i32 + wave).clamp(0, 255) as u8
    }

    /// 渲染体模.
    pub fn render(&self) -> PixelBuffer {
        let (pupil, iris) = (self.pupil(), self.iris());
        let mut buf = PixelBuffer::new(self.width, self.height, self.sclera_gray);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x as i32, y as i32);
                let v = match self.lid {
                    Some(lid) if self.is_occluded(p) => lid.gray,
                    _ if pupil.contains(p) => self.pupil_gray,
                    _ if iris.contains(p) => self.texture_at(p),
                    _ => self.sclera_gray,
                };
                buf.set(x, y, v);
            }
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::EyePhantom;
    use crate::data::Point;

    #[test]
    fn test_phantom_layers() {
        let ph = EyePhantom::default();
        let img = ph.render();
        assert_eq!(img.shape(), (128, 128));
        assert_eq!(img.get(64, 64), Some(20));
        assert_eq!(img.get(0, 0), Some(215));
        let v = img.get(64 + 20, 64).unwrap();
        assert!((100..=120).contains(&v));

        // 半径 12 的瞳孔圆盘.
        assert_eq!(img.count(20), 441);
    }

    #[test]
    fn test_phantom_lid() {
        let ph = EyePhantom::default().with_default_lid();
        let img = ph.render();
        assert!(ph.is_occluded(Point::new(64, 35)));
        assert!(!ph.is_occluded(Point::new(64, 36)));
        assert!(!ph.is_occluded(Point::new(20, 30)));
        assert_eq!(img.get(64, 35), Some(30));
        assert_eq!(img.get(64, 36).map(|v| v >= 100), Some(true));
    }
}
