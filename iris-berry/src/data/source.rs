//! 图像来源. 文件解码交给 `image` crate 完成.

use super::PixelBuffer;
use crate::error::SourceError;
use image::ImageError;
use std::io;
use std::path::Path;

/// 能按路径加载灰度图像的外部协作者.
pub trait ImageSource {
    /// 加载 `path` 处的图像, 失败时返回 `NotFound` 或 `UnsupportedFormat`.
    fn load(&self, path: &Path) -> Result<PixelBuffer, SourceError>;
}

/// 基于 `image` crate 的文件来源. 彩色图像会被转换为 8-bit 亮度.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageFileSource;

impl ImageSource for ImageFileSource {
    fn load(&self, path: &Path) -> Result<PixelBuffer, SourceError> {
        let img = image::open(path).map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == io::ErrorKind::NotFound => {
                SourceError::NotFound(path.to_path_buf())
            }
            ImageError::IoError(io) => SourceError::Io(io),
            other => SourceError::UnsupportedFormat(other.to_string()),
        })?;
        Ok(PixelBuffer::from_gray_image(&img.to_luma8()))
    }
}
