//! 算法运行统计.

use iris_berry::FeatureVector;
use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时.
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 单个策略组合的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 成功提取出特征的样本数.
    succeeded: u64,

    /// 因致命错误终止的样本数.
    failed: u64,

    /// 成功样本中未检测到睫毛遮挡的个数.
    lash_missing: u64,

    /// 处理样本的总时间.
    run_time: AccTimer,

    /// 最耗时的一次.
    most: Duration,

    /// 各项特征之和, 顺序同 [`FeatureVector::NAMES`].
    feature_sum: [f64; 11],
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            lash_missing: 0,
            run_time: AccTimer::new(),
            most: Duration::ZERO,
            feature_sum: [0.0; 11],
        }
    }

    /// 开始一次新的计时.
    #[inline]
    pub fn start(&mut self) {
        self.run_time.start();
    }

    /// 结束一次计时.
    #[inline]
    pub fn stop(&mut self) {
        let d = self.run_time.elapsed();
        self.most = self.most.max(d);
    }

    /// 记录一个成功的样本.
    pub fn count_success(&mut self, fv: &FeatureVector, lash_found: bool) {
        self.succeeded += 1;
        if !lash_found {
            self.lash_missing += 1;
        }
        for (acc, v) in self.feature_sum.iter_mut().zip(fv.to_array()) {
            *acc += v;
        }
    }

    /// 记录一个失败的样本.
    #[inline]
    pub fn count_failure(&mut self) {
        self.failed += 1;
    }

    /// 成功样本数.
    #[inline]
    pub fn get_succeeded(&self) -> u64 {
        self.succeeded
    }

    /// 失败样本数.
    #[inline]
    pub fn get_failed(&self) -> u64 {
        self.failed
    }

    /// 未检测到遮挡的成功样本数.
    #[inline]
    pub fn get_lash_missing(&self) -> u64 {
        self.lash_missing
    }

    /// 以微秒为单位获得总时间.
    #[inline]
    pub fn get_run_time_us(&self) -> u64 {
        self.run_time.get_total_us()
    }

    /// 最耗时的一次 (微秒).
    #[inline]
    pub fn get_most_us(&self) -> u64 {
        self.most.as_micros() as u64
    }

    /// 成功样本的平均特征. 没有成功样本时返回 `None`.
    pub fn get_avg_features(&self) -> Option<[f64; 11]> {
        match self.succeeded {
            0 => None,
            n => Some(self.feature_sum.map(|s| s / n as f64)),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
