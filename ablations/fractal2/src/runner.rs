//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AblationResult;
use iris_berry::lash::LashSeed;
use iris_berry::pipeline::{run_pipeline, NoopObserver, PipelineConfig};
use iris_berry::texture::{FractalPolicy, RunCountPolicy};
use std::thread;
use utils::loader::{self, Sample};

/// 在全部样本上运行一种策略组合.
fn profile_with(samples: &[Sample], config: &PipelineConfig) -> Profile {
    let mut profile = Profile::new();
    for (name, buf) in samples {
        profile.start();
        let result = run_pipeline(buf.clone(), config, &mut NoopObserver);
        profile.stop();

        match result {
            Ok(report) => profile.count_success(&report.features, report.lash.is_some()),
            Err(e) => {
                log::warn!("{name}: {e}");
                profile.count_failure();
            }
        }
    }
    profile
}

/// 待比较的参数组合: 分形 × 游程策略, 以及默认策略下的各种睫毛种子.
fn variants(base: &PipelineConfig) -> Vec<(String, PipelineConfig)> {
    let policies = FractalPolicy::ALL
        .into_iter()
        .flat_map(|fractal| RunCountPolicy::ALL.map(|run_count| (fractal, run_count)))
        .map(|(fractal, run_count)| {
            let config = PipelineConfig {
                fractal,
                run_count,
                ..base.clone()
            };
            (format!("{fractal:?}/{run_count:?}"), config)
        });
    let seeds = LashSeed::ALL
        .into_iter()
        .filter(|&seed| seed != base.lash_seed)
        .map(|lash_seed| {
            let config = PipelineConfig {
                lash_seed,
                ..base.clone()
            };
            (format!("lash {lash_seed:?}"), config)
        });
    policies.chain(seeds).collect()
}

/// 实际运行.
pub fn run() -> AblationResult {
    let mut samples = loader::phantoms();
    samples.extend(loader::textured_phantoms());
    let base = utils::phantom_config();

    println!(
        "Running ablation studies on {} samples ({} cpus)...",
        samples.len(),
        utils::cpus()
    );
    thread::scope(|s| {
        let samples = samples.as_slice();
        let handles: Vec<_> = variants(&base)
            .into_iter()
            .map(|(name, config)| (name, s.spawn(move || profile_with(samples, &config))))
            .collect();

        AblationResult::from_iter(handles.into_iter().map(|(name, th)| {
            (name, th.join().expect("Thread joining error"))
        }))
    })
}
