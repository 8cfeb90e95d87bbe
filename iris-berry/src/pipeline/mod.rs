//! 从整张眼部图像到纹理特征的完整流水线.
//!
//! 各阶段都是纯函数, 共享的图像与点栈由 [`PipelineContext`] 显式持有并依次借出.

mod observer;

pub use observer::{Checkpoint, LogObserver, NoopObserver, PipelineObserver};

use crate::data::{Circle, ImageSource, PixelBuffer};
use crate::error::{LocateError, LocateResult};
use crate::iris::{
    classify, isolate_annulus, locate_iris_boundary, majority_filter, sample_band, Band, FlagGrid,
    GapRepair, IrisBoundary,
};
use crate::lash::{estimate_lash, LashOptions, LashProfile, LashSeed, ResidualOffset};
use crate::pupil::{locate_pupil, PupilFit};
use crate::segment::PointStack;
use crate::texture::{
    contrast_stretch, fractal_index_grid, quantize, run_length_features, FeatureVector,
    FractalIndexGrid, FractalPolicy, IrisArray, JointHistogram, QuantizedGrayGrid, RunCountPolicy,
};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 睫毛遮挡未找到时的处理方式.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MissingLash {
    /// 按无遮挡继续, 并发出警告检查点.
    #[default]
    Proceed,

    /// 返回 `OcclusionNotFound`.
    Abort,
}

/// 流水线参数. 该结构完全透明.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// 瞳孔预期占整张图像的面积百分比, `1..=100`.
    pub pupil_area_percent: u32,

    /// 虹膜内点区间的半宽 (以标准差为单位), 非负.
    pub theta_band: f64,

    /// 虹膜半径搜索时每段圆弧的角度宽度, `1..=90`.
    pub iris_search_degree: i32,

    /// 虹膜半径搜索的步长, 至少为 1.
    pub iris_radius_step: i32,

    /// 虹膜半径搜索的起点相对瞳孔半径的余量.
    pub iris_margin: i32,

    /// 统计采样矩形与瞳孔/虹膜边界之间的安全距离.
    pub safe_margin: i32,

    /// 多数滤波阈值: 8-邻域虹膜格子数须严格大于它.
    pub majority_threshold: usize,

    /// 睫毛种子相对瞳孔上边界向上的行数.
    pub lash_seed_offset: i32,

    /// 睫毛暗区域的选择方式.
    pub lash_seed: LashSeed,

    /// 睫毛轮廓外推的偏移方式.
    pub residual_offset: ResidualOffset,

    /// 睫毛轮廓平滑轮数. `None` 时取 [`LashSeed::default_passes`].
    pub lash_smooth_passes: Option<usize>,

    /// 环带缺口修复的范围.
    pub gap_repair: GapRepair,

    /// 分形指数的取值方式.
    pub fractal: FractalPolicy,

    /// 游程数的计数方式.
    pub run_count: RunCountPolicy,

    /// 睫毛遮挡未找到时的处理方式.
    pub missing_lash: MissingLash,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pupil_area_percent: 10,
            theta_band: 1.6,
            iris_search_degree: 40,
            iris_radius_step: 2,
            iris_margin: 6,
            safe_margin: 4,
            majority_threshold: 4,
            lash_seed_offset: 10,
            lash_seed: LashSeed::default(),
            residual_offset: ResidualOffset::default(),
            lash_smooth_passes: None,
            gap_repair: GapRepair::default(),
            fractal: FractalPolicy::default(),
            run_count: RunCountPolicy::default(),
            missing_lash: MissingLash::default(),
        }
    }
}

impl PipelineConfig {
    /// 以四个入口参数构造, 其余取默认值. 参数不合法时返回 `None`.
    pub fn new(
        pupil_area_percent: u32,
        theta_band: f64,
        iris_search_degree: i32,
        iris_radius_step: i32,
    ) -> Option<Self> {
        let config = Self {
            pupil_area_percent,
            theta_band,
            iris_search_degree,
            iris_radius_step,
            ..Self::default()
        };
        config.validate().ok().map(|_| config)
    }

    /// 检查参数范围. 出错时携带字段名.
    pub fn validate(&self) -> LocateResult<()> {
        let check = |ok: bool, field: &'static str| {
            if ok {
                Ok(())
            } else {
                Err(LocateError::InvalidConfig(field))
            }
        };
        check(
            (1..=100).contains(&self.pupil_area_percent),
            "pupil_area_percent",
        )?;
        check(
            self.theta_band.is_finite() && self.theta_band >= 0.0,
            "theta_band",
        )?;
        check(
            (1..=90).contains(&self.iris_search_degree),
            "iris_search_degree",
        )?;
        check(self.iris_radius_step >= 1, "iris_radius_step")?;
        check(self.iris_margin >= 0, "iris_margin")?;
        check(self.safe_margin >= 0, "safe_margin")?;
        check(self.majority_threshold <= 8, "majority_threshold")?;
        check(self.lash_seed_offset >= 0, "lash_seed_offset")
    }

    /// 睫毛估计参数.
    pub fn lash_options(&self) -> LashOptions {
        let mut opts =
            LashOptions::new(self.lash_seed_offset, self.lash_seed, self.residual_offset);
        if let Some(passes) = self.lash_smooth_passes {
            opts.smooth_passes = passes;
        }
        opts
    }
}

/// 贯穿流水线的共享状态.
///
/// # 注意
///
/// `stack` 同一时刻只能被一个泛洪使用; 各阶段通过 `&mut` 借用它, 借用检查器保证不会重入.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    source: PixelBuffer,
    working: PixelBuffer,
    stack: PointStack,
}

impl PipelineContext {
    /// 由输入图像构造. 点栈按像素总数预分配.
    pub fn new(buffer: PixelBuffer) -> Self {
        let stack = PointStack::with_capacity(buffer.size());
        Self {
            working: buffer.clone(),
            source: buffer,
            stack,
        }
    }

    /// 源图. 瞳孔定位后其中的瞳孔圆盘被涂黑.
    #[inline]
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// 工作图.
    #[inline]
    pub fn working(&self) -> &PixelBuffer {
        &self.working
    }

    /// 把瞳孔圆盘涂黑, 并用源图重置工作图.
    fn paint_pupil(&mut self, pupil: &Circle) {
        self.source.fill_disk(pupil, 0);
        self.working.resume(&self.source);
    }
}

/// 流水线的全部中间结果与最终特征.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineReport {
    /// 瞳孔.
    pub pupil: PupilFit,

    /// 虹膜外边界.
    pub boundary: IrisBoundary,

    /// 虹膜内点区间.
    pub band: Band,

    /// 环带隔离后的三态网格.
    pub flags: FlagGrid,

    /// 睫毛遮挡轮廓. 未检测到且选择继续时为 `None`.
    pub lash: Option<LashProfile>,

    /// 虹膜原始灰度.
    pub iris: IrisArray,

    /// 对比度拉伸后的虹膜灰度.
    pub stretched: IrisArray,

    /// 分形指数.
    pub fractal: FractalIndexGrid,

    /// 量化等级.
    pub quantized: QuantizedGrayGrid,

    /// 联合直方图.
    pub histogram: JointHistogram,

    /// 游程统计特征.
    pub features: FeatureVector,
}

fn run_stages<O: PipelineObserver>(
    ctx: &mut PipelineContext,
    config: &PipelineConfig,
    observer: &mut O,
) -> LocateResult<PipelineReport> {
    let pupil = locate_pupil(&ctx.source, config.pupil_area_percent, &mut ctx.stack)?;
    observer.on_checkpoint(Checkpoint::Pupil(&pupil));
    ctx.paint_pupil(&pupil.circle);

    let boundary = locate_iris_boundary(
        &ctx.working,
        &pupil.circle,
        config.iris_search_degree,
        config.iris_radius_step,
        config.iris_margin,
    )?;
    observer.on_checkpoint(Checkpoint::IrisBoundary(&boundary));
    let iris_radius = boundary.circle.radius;

    let band = sample_band(
        &ctx.working,
        &pupil.circle,
        iris_radius,
        config.theta_band,
        config.safe_margin,
    )?;
    let mut flags = classify(&ctx.working, pupil.circle.center, iris_radius, &band)?;
    let relabelled = majority_filter(&mut flags, config.majority_threshold);
    observer.on_checkpoint(Checkpoint::Classified {
        band: &band,
        relabelled,
    });

    let lash_opts = config.lash_options();
    let lash = match estimate_lash(&flags, &pupil.circle, &lash_opts, &mut ctx.stack) {
        Ok(profile) => {
            observer.on_checkpoint(Checkpoint::Lash(&profile));
            Some(profile)
        }
        Err(e) if !e.is_fatal() && config.missing_lash == MissingLash::Proceed => {
            observer.on_checkpoint(Checkpoint::LashMissing(&e));
            None
        }
        Err(e) => return Err(e),
    };

    let repaired = isolate_annulus(
        &mut flags,
        &pupil.circle,
        &boundary.circle,
        lash.as_ref(),
        config.gap_repair,
    );
    let iris = IrisArray::from_flags(&ctx.working, &flags);
    let members = iris.members();
    observer.on_checkpoint(Checkpoint::Annulus { repaired, members });

    let stretched = contrast_stretch(&iris)?;
    let fractal = fractal_index_grid(&stretched, config.fractal);
    let quantized = quantize(&stretched)?;
    let histogram = JointHistogram::from_grids(&fractal, &quantized, config.fractal);
    let features = run_length_features(&histogram, members, config.run_count)?;
    observer.on_checkpoint(Checkpoint::Features(&features));

    Ok(PipelineReport {
        pupil,
        boundary,
        band,
        flags,
        lash,
        iris,
        stretched,
        fractal,
        quantized,
        histogram,
        features,
    })
}

/// 运行完整流水线, 在各检查点回调 `observer`.
///
/// 致命错误会先以 [`Checkpoint::Aborted`] 通知观察者, 再原样返回.
pub fn run_pipeline<O: PipelineObserver>(
    buffer: PixelBuffer,
    config: &PipelineConfig,
    observer: &mut O,
) -> LocateResult<PipelineReport> {
    config.validate()?;
    let mut ctx = PipelineContext::new(buffer);
    let result = run_stages(&mut ctx, config, observer);
    if let Err(e) = &result {
        observer.on_checkpoint(Checkpoint::Aborted(e));
    }
    result
}

/// 以默认策略提取特征, 检查点转发到 `log`.
pub fn locate_and_extract(
    buffer: PixelBuffer,
    pupil_area_percent: u32,
    theta_band: f64,
    iris_search_degree: i32,
    iris_radius_step: i32,
) -> LocateResult<FeatureVector> {
    let config = PipelineConfig {
        pupil_area_percent,
        theta_band,
        iris_search_degree,
        iris_radius_step,
        ..PipelineConfig::default()
    };
    run_pipeline(buffer, &config, &mut LogObserver).map(|report| report.features)
}

/// 经由 `source` 加载 `path` 处的图像后运行流水线. 加载错误以 `Input` 原样返回.
pub fn locate_and_extract_file<S, P>(
    source: &S,
    path: P,
    config: &PipelineConfig,
) -> LocateResult<PipelineReport>
where
    S: ImageSource + ?Sized,
    P: AsRef<Path>,
{
    let buffer = source.load(path.as_ref())?;
    run_pipeline(buffer, config, &mut LogObserver)
}
