//! 图像的持久化存储.

use super::PixelBuffer;
use crate::consts::{gray::*, Flag, NON_IRIS};
use crate::iris::FlagGrid;
use crate::texture::IrisArray;
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 对于 `FlagGrid` 这类仅存在三种取值的网格, 保存时会映射到肉眼较易区分的灰度;
/// 对于 `IrisArray`, 非虹膜哨兵像素保存为黑色.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 使三态标记更有利于单通道可视化.
#[inline]
pub(crate) fn pretty(flag: Flag) -> u8 {
    match flag {
        Flag::Dark => BLACK,
        Flag::Iris => GRAY,
        Flag::Bright => WHITE,
    }
}

/// 将 `IrisArray` 中的值映射为像素. 哨兵值映射为黑色.
#[inline]
pub(crate) fn pretty_intensity(v: i32) -> u8 {
    match v {
        NON_IRIS => BLACK,
        any => any.clamp(0, 255) as u8,
    }
}

macro_rules! impl_grid_vis {
    ($($grid: ty => $map: expr),+) => {
        $(
            impl ImgWriteVis for $grid {
                fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
                    let (height, width) = self.shape();
                    let mut buf = image::GrayImage::new(width as u32, height as u32);
                    for ((h, w), &v) in self.indexed_iter() {
                        buf.put_pixel(w as u32, h as u32, image::Luma([$map(v)]));
                    }
                    buf.save(path)
                }
            }
        )+
    };
}

impl_grid_vis!(FlagGrid => pretty, IrisArray => pretty_intensity);

/// 按原样存储.
impl ImgWriteVis for PixelBuffer {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EyePhantom, ImageFileSource, ImageSource};

    #[test]
    fn test_pretty() {
        assert_eq!(pretty(Flag::Dark), BLACK);
        assert_eq!(pretty(Flag::Iris), GRAY);
        assert_eq!(pretty(Flag::Bright), WHITE);
        assert_eq!(pretty_intensity(NON_IRIS), BLACK);
        assert_eq!(pretty_intensity(300), WHITE);
        assert_eq!(pretty_intensity(17), 17);
    }

    /// 写出再经 `ImageFileSource` 读回, 内容应不变.
    #[test]
    fn test_save_and_reload() {
        let img = EyePhantom::default().render();
        let mut p = std::env::temp_dir();
        p.push(format!("iris-berry-{}-phantom.png", std::process::id()));
        img.save(&p).unwrap();

        let back = ImageFileSource.load(&p).unwrap();
        std::fs::remove_file(&p).unwrap();
        assert_eq!(back, img);
    }
}
