//! 运行时错误.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// 图像来源 (外部协作者) 的错误, 原样向上传递.
#[derive(Debug)]
pub enum SourceError {
    /// 文件不存在.
    NotFound(PathBuf),

    /// 文件存在但无法按支持的格式解码.
    UnsupportedFormat(String),

    /// 其它 IO 错误.
    Io(io::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(p) => write!(f, "image `{}` not found", p.display()),
            Self::UnsupportedFormat(s) => write!(f, "unsupported image format: {s}"),
            Self::Io(e) => write!(f, "image io error: {e}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// 瞳孔定位失败的具体原因.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PupilFailure {
    /// 阈值选择后没有任何前景像素.
    NoDarkPixels,

    /// 最大区域的初始半径估计不为正.
    DegenerateSeed,

    /// 圆拟合时半径收缩至非正.
    RadiusCollapsed,
}

/// 几何退化的具体原因.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Degenerate {
    /// 圆弧采样点越出图像 (纵向不做预先检查).
    ArcOutOfBounds,

    /// 半径增长过程中平均灰度从未正向跳变.
    NoContrastEdge,

    /// 瞳孔两侧的统计矩形为空或越界.
    EmptyBand,

    /// 最终没有任何虹膜像素.
    EmptyIris,
}

/// 流水线运行时错误.
#[derive(Debug)]
pub enum LocateError {
    /// 图像读取失败.
    Input(SourceError),

    /// 参数不合法. 参数为出错字段名.
    InvalidConfig(&'static str),

    /// 找不到瞳孔. 致命错误, 流水线在虹膜阶段之前终止.
    PupilNotFound(PupilFailure),

    /// 虹膜几何退化. 致命错误, 跳过特征提取.
    GeometryDegenerate(Degenerate),

    /// 没有检测到睫毛遮挡区域. 非致命, 由调用方决定是否继续.
    OcclusionNotFound,
}

impl LocateError {
    /// 是否为致命错误.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::OcclusionNotFound)
    }
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input error: {e}"),
            Self::InvalidConfig(field) => write!(f, "invalid pipeline parameter `{field}`"),
            Self::PupilNotFound(why) => write!(f, "pupil not found ({why:?})"),
            Self::GeometryDegenerate(why) => write!(f, "degenerate iris geometry ({why:?})"),
            Self::OcclusionNotFound => write!(f, "no eyelash occlusion detected"),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SourceError> for LocateError {
    fn from(value: SourceError) -> Self {
        Self::Input(value)
    }
}

/// 流水线运行结果.
pub type LocateResult<T> = Result<T, LocateError>;
