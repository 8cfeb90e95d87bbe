#![warn(missing_docs)] // <= 合适时移除它.
#![warn(elided_lifetimes_in_paths)]
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 从 8-bit 灰度眼部图像中定位瞳孔与虹膜, 估计上睫毛遮挡,
//! 并提取虹膜区域的分形/游程纹理特征.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 所有二维索引均为 `(h, w)` 顺序; 几何类型 [`data::Point`] 则使用 `(x, y)`.
//! 2. 可预期的失败 (找不到瞳孔, 几何退化等) 以 [`error::LocateError`] 返回;
//!   只有违反调用约定 (例如网格形状不一致) 时程序才会 panic.
//!
//! # 开发计划
//!
//! ### 区域生长分割 ✅
//!
//! 4-邻域泛洪, 点栈在整条流水线中复用.
//!
//! 实现位于 `iris-berry/src/segment`.
//!
//! ### 瞳孔定位 ✅
//!
//! 面积百分比阈值, 最大连通区域, 孔洞填充, 迭代圆拟合.
//!
//! 实现位于 `iris-berry/src/pupil`.
//!
//! ### 虹膜外边界与三态分类 ✅
//!
//! 四段圆弧均值差分搜索半径, 统计区间分类, 多数滤波, 环带隔离与缺口修复.
//!
//! 实现位于 `iris-berry/src/iris`.
//!
//! ### 上睫毛遮挡轮廓 ✅
//!
//! 暗区域泛洪, 渐进平滑, 两侧直线外推.
//!
//! 实现位于 `iris-berry/src/lash`, 直线拟合位于 `iris-berry/src/fitting`.
//!
//! ### 分形纹理特征 ✅
//!
//! 盒计数分形指数, 16 级量化, 联合直方图与 11 项游程特征.
//!
//! 实现位于 `iris-berry/src/texture`.
//!
//! ### 流水线与检查点 ✅
//!
//! 实现位于 `iris-berry/src/pipeline`.
//!
//! ### 多尺度盒计数 ⌛️
//!
//! 目前盒半径固定为 `1..8`, 尚未针对不同分辨率的图像自适应.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

pub mod consts;
pub mod data;
pub mod error;

pub mod fitting;
pub mod iris;
pub mod lash;
pub mod pupil;
pub mod segment;
pub mod texture;

pub mod pipeline;
pub mod prelude;

pub use data::{Circle, ImgWriteVis, PixelBuffer, Point, Rect};
pub use error::{LocateError, LocateResult};
pub use pipeline::{locate_and_extract, locate_and_extract_file, run_pipeline, PipelineConfig};
pub use texture::FeatureVector;
