//! 基础数据结构: 灰度像素缓冲, 平面几何, 图像来源与持久化.

mod buffer;
pub(crate) mod geometry;
mod phantom;
mod save;
mod source;
pub(crate) mod stats;

pub use buffer::PixelBuffer;
pub use geometry::{Circle, Point, Rect};
pub use phantom::{EyePhantom, LidShape};
pub use save::ImgWriteVis;
pub use source::{ImageFileSource, ImageSource};
pub use stats::MeanStd;
