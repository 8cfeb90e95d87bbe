//! 通用常量.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单通道颜色.
pub mod gray {
    /// 二值工作图中, 前景 (待生长) 的像素值.
    pub const FOREGROUND: u8 = 0;

    /// 二值工作图中, 背景 (已访问或非目标) 的像素值.
    pub const BACKGROUND: u8 = 255;

    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道灰色.
    pub const GRAY: u8 = 0b_1000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 像素是否是前景?
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        matches!(p, FOREGROUND)
    }

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        !is_foreground(p)
    }
}

/// 非虹膜像素在 `IrisArray`, 分形指数网格与量化网格中的哨兵值.
pub const NON_IRIS: i32 = -1;

/// 圆边界检测的角度采样个数 (0° 到 360°, 两端都取).
pub const CIRCLE_SAMPLES: u32 = 361;

/// 虹膜外半径搜索的最大迭代步数.
pub const IRIS_SEARCH_STEPS: u32 = 120;

/// 盒计数的半径上界 (不含). 实际使用的盒半径为 `1..BOX_RADIUS_LIMIT`.
pub const BOX_RADIUS_LIMIT: usize = 8;

/// 分形指数的放大倍率, 同时也是其 (Inverted 策略下的) 最大值.
pub const FRACTAL_LEVELS: usize = 100;

/// 灰度量化等级数. 量化结果位于 `0..=QUANT_LEVELS`.
pub const QUANT_LEVELS: usize = 16;

/// 睫毛轮廓渐进平滑的轮数, 第 `m` 轮的窗口半径为 `m`.
pub const LASH_SMOOTH_PASSES: usize = 19;

/// 行扫描方式的默认平滑轮数.
pub const LASH_ROW_SCAN_PASSES: usize = 9;

/// 睫毛轮廓左右两侧最小二乘采样的列数.
pub const LASH_FIT_SAMPLES: usize = 30;

/// 虹膜矩形区域内像素的三态分类.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Flag {
    /// 低于统计区间, 通常为瞳孔, 睫毛或眼睑阴影.
    #[default]
    Dark = 0,

    /// 落在统计区间内, 视为虹膜纹理.
    Iris = 1,

    /// 高于统计区间, 通常为巩膜或高光.
    Bright = 2,
}

impl Flag {
    /// 是否为虹膜像素.
    #[inline]
    pub fn is_iris(&self) -> bool {
        matches!(self, Self::Iris)
    }

    /// 是否为暗像素.
    #[inline]
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    /// 是否为亮像素.
    #[inline]
    pub fn is_bright(&self) -> bool {
        matches!(self, Self::Bright)
    }
}
