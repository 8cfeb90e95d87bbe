//! 消融实验依赖的通用组件.

use iris_berry::PipelineConfig;

pub mod loader;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep() {
    println!("{SEP}");
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

/// 适合 128 × 128 合成体模的流水线参数: 瞳孔面积百分比为 2, 其余取默认值.
#[inline]
pub fn phantom_config() -> PipelineConfig {
    PipelineConfig {
        pupil_area_percent: 2,
        ..PipelineConfig::default()
    }
}
