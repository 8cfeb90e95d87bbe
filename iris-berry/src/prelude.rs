//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx2d;

pub use crate::consts::gray::{BACKGROUND, FOREGROUND};
pub use crate::consts::{Flag, NON_IRIS};

pub use crate::data::{
    Circle, EyePhantom, ImageFileSource, ImageSource, ImgWriteVis, LidShape, PixelBuffer, Point,
    Rect,
};
pub use crate::error::{LocateError, LocateResult, SourceError};

pub use crate::iris::{FlagGrid, GapRepair, IrisBoundary};
pub use crate::lash::{LashOptions, LashProfile, LashSeed, ResidualOffset};
pub use crate::pupil::PupilFit;
pub use crate::segment::PointStack;
pub use crate::texture::{FeatureVector, FractalPolicy, IrisArray, RunCountPolicy};

pub use crate::pipeline::{
    locate_and_extract, locate_and_extract_file, run_pipeline, Checkpoint, LogObserver,
    MissingLash, NoopObserver, PipelineConfig, PipelineObserver, PipelineReport,
};
