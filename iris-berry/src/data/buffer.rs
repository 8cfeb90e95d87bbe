//! 8-bit 灰度像素缓冲.

use super::geometry::{Circle, Point};
use crate::consts::gray::*;
use crate::Idx2d;
use image::{GrayImage, Luma};
use ndarray::Array2;
use std::ops::{Index, IndexMut};

/// 拥有所有权的二维 8-bit 灰度图像.
///
/// 流水线中同时存在一份只读的 "源" 拷贝和一份可变的 "工作" 拷贝,
/// 两者都是 `PixelBuffer`.
///
/// # 注意
///
/// 底层数据以 `(h, w)` 索引. 除了 [`PixelBuffer::get`] 和 [`PixelBuffer::at`],
/// 越界检查由调用方负责 (`Index` 越界时 panic).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PixelBuffer {
    data: Array2<u8>,
}

impl PixelBuffer {
    /// 创建一张 `width × height`, 全部像素值为 `fill` 的图像.
    #[inline]
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        Self {
            data: Array2::from_elem((height, width), fill),
        }
    }

    /// 直接包装 `(h, w)` 形状的数组.
    #[inline]
    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// 由行优先的原始字节构造. 长度不匹配时返回 `None`.
    pub fn from_raw(width: usize, height: usize, raw: Vec<u8>) -> Option<Self> {
        Array2::from_shape_vec((height, width), raw)
            .ok()
            .map(Self::from_array)
    }

    /// 由 `image` 灰度图构造.
    pub fn from_gray_image(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        let data = Array2::from_shape_fn((height as usize, width as usize), |(h, w)| {
            img.get_pixel(w as u32, h as u32).0[0]
        });
        Self { data }
    }

    /// 转换为 `image` 灰度图.
    pub fn to_gray_image(&self) -> GrayImage {
        let (height, width) = self.shape();
        GrayImage::from_fn(width as u32, height as u32, |w, h| {
            Luma([self.data[(h as usize, w as usize)]])
        })
    }

    /// 宽度.
    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// 高度.
    #[inline]
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// 以 `(h, w)` 表示的形状.
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 像素总数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 获取 `(x, y)` 处像素. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.data.get((y, x)).copied()
    }

    /// 设置 `(x, y)` 处像素. 越界时 panic.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[(y, x)] = value;
    }

    /// 获取点 `p` 处像素. 越界 (包括负坐标) 时返回 `None`.
    #[inline]
    pub fn at(&self, p: Point) -> Option<u8> {
        self.data.get(p.to_idx()?).copied()
    }

    /// 灰度直方图.
    pub fn histogram(&self) -> [u64; 256] {
        let mut hist = [0u64; 256];
        self.data.iter().for_each(|&p| hist[p as usize] += 1);
        hist
    }

    /// 按阈值二值化: 小于 `threshold` 的像素为前景, 其余为背景.
    pub fn binarize(&self, threshold: u8) -> Self {
        Self {
            data: self
                .data
                .mapv(|p| if p < threshold { FOREGROUND } else { BACKGROUND }),
        }
    }

    /// 以 `value` 填充圆盘 `circle` 与图像的交集. 返回被填充的像素个数.
    pub fn fill_disk(&mut self, circle: &Circle, value: u8) -> usize {
        let Some(rect) = circle.bounding_rect(self.shape()) else {
            return 0;
        };
        let mut cnt = 0usize;
        for h in rect.y1..=rect.y2 {
            for w in rect.x1..=rect.x2 {
                if circle.contains(Point::from_idx((h, w))) {
                    self.data[(h, w)] = value;
                    cnt += 1;
                }
            }
        }
        cnt
    }

    /// 统计像素值为 `value` 的个数.
    #[inline]
    pub fn count(&self, value: u8) -> usize {
        self.data.iter().filter(|&&p| p == value).count()
    }

    /// 用 `other` 覆写 `self` 的内容.
    ///
    /// 如果两者形状不符, 则程序 panic.
    pub fn resume(&mut self, other: &PixelBuffer) {
        assert_eq!(self.shape(), other.shape(), "图像形状不符");
        self.data.assign(&other.data);
    }
}

impl Index<Idx2d> for PixelBuffer {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for PixelBuffer {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}
