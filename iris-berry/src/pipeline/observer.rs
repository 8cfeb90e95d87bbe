//! 流水线检查点与观察者.
//!
//! 核心算法不依赖是否挂载了观察者; 观察者只能读取检查点携带的数据.

use crate::data::Circle;
use crate::error::LocateError;
use crate::iris::{Band, IrisBoundary};
use crate::lash::LashProfile;
use crate::pupil::PupilFit;
use crate::texture::FeatureVector;

/// 流水线在固定位置发出的检查点.
#[derive(Debug)]
pub enum Checkpoint<'a> {
    /// 瞳孔定位完成.
    Pupil(&'a PupilFit),

    /// 虹膜外圆确定.
    IrisBoundary(&'a IrisBoundary),

    /// 三态分类完成. `relabelled` 为多数滤波修改的格子数.
    Classified {
        /// 内点区间.
        band: &'a Band,
        /// 多数滤波修改的格子数.
        relabelled: usize,
    },

    /// 睫毛轮廓估计完成.
    Lash(&'a LashProfile),

    /// 睫毛遮挡未找到, 按无遮挡继续.
    LashMissing(&'a LocateError),

    /// 环带隔离完成.
    Annulus {
        /// 缺口修复的格子数.
        repaired: usize,
        /// 最终的虹膜像素数.
        members: usize,
    },

    /// 特征提取完成.
    Features(&'a FeatureVector),

    /// 流水线因致命错误终止.
    Aborted(&'a LocateError),
}

/// 接收流水线检查点的回调.
pub trait PipelineObserver {
    /// 处理一个检查点. 默认什么也不做.
    fn on_checkpoint(&mut self, _checkpoint: Checkpoint<'_>) {}
}

/// 不做任何事的观察者.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// 把检查点转发到 `log`. 非致命失败使用 `warn`, 其余使用 `debug`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

fn fmt_circle(c: &Circle) -> String {
    format!("({}, {}) r = {}", c.center.x, c.center.y, c.radius)
}

impl PipelineObserver for LogObserver {
    fn on_checkpoint(&mut self, checkpoint: Checkpoint<'_>) {
        match checkpoint {
            Checkpoint::Pupil(fit) => log::debug!(
                "pupil {} (seed {}, threshold {}, {} segments)",
                fmt_circle(&fit.circle),
                fmt_circle(&fit.seed),
                fit.threshold,
                fit.segments,
            ),
            Checkpoint::IrisBoundary(b) => {
                log::debug!("iris {} within {:?}", fmt_circle(&b.circle), b.rect)
            }
            Checkpoint::Classified { band, relabelled } => log::debug!(
                "band [{:.3}, {:.3}] (mean {:.3}, std {:.3}), majority relabelled {relabelled}",
                band.min,
                band.max,
                band.stats.mean,
                band.stats.std,
            ),
            Checkpoint::Lash(p) => log::debug!(
                "lash columns {}..={} from a blob of {}",
                p.start(),
                p.end(),
                p.blob_size()
            ),
            Checkpoint::LashMissing(e) => log::warn!("{e}, assuming no occlusion"),
            Checkpoint::Annulus { repaired, members } => {
                log::debug!("annulus repaired {repaired}, {members} iris pixels")
            }
            Checkpoint::Features(fv) => log::debug!("features {:?}", fv.to_array()),
            Checkpoint::Aborted(e) => log::warn!("pipeline aborted: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl PipelineObserver for Recorder {
        fn on_checkpoint(&mut self, checkpoint: Checkpoint<'_>) {
            self.0.push(format!("{checkpoint:?}"));
        }
    }

    #[test]
    fn test_observers() {
        let _ = simple_logger::init_with_level(log::Level::Debug);
        let err = LocateError::OcclusionNotFound;
        LogObserver.on_checkpoint(Checkpoint::LashMissing(&err));
        NoopObserver.on_checkpoint(Checkpoint::Aborted(&err));

        let mut rec = Recorder::default();
        rec.on_checkpoint(Checkpoint::Annulus {
            repaired: 1,
            members: 2,
        });
        assert_eq!(rec.0.len(), 1);
        assert!(rec.0[0].starts_with("Annulus"));
    }
}
