//! 联合直方图与游程统计特征.

use super::{FractalIndexGrid, FractalPolicy, QuantizedGrayGrid};
use crate::consts::{FRACTAL_LEVELS, NON_IRIS, QUANT_LEVELS};
use crate::error::{Degenerate, LocateError, LocateResult};
use itertools::{iproduct, izip};
use ndarray::{Array2, ArrayView2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `(分形指数 0..=100) × (量化等级 0..=16)` 的联合计数表.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointHistogram {
    data: Array2<u64>,
}

impl Default for JointHistogram {
    fn default() -> Self {
        Self {
            data: Array2::zeros((FRACTAL_LEVELS + 1, QUANT_LEVELS + 1)),
        }
    }
}

impl JointHistogram {
    /// 对两张对齐网格中的每个虹膜格子计数一次.
    ///
    /// 分形指数先按 `policy` 映射为行号 (见 [`FractalPolicy::row`]), 越界的行号与等级被截断到表的边界.
    ///
    /// # 注意
    ///
    /// 两张网格的形状必须一致, 否则程序 panic.
    pub fn from_grids(
        fractal: &FractalIndexGrid,
        quant: &QuantizedGrayGrid,
        policy: FractalPolicy,
    ) -> Self {
        assert_eq!(fractal.shape(), quant.shape(), "网格形状不符");
        let mut hist = Self::default();
        for (&f, &q) in izip!(fractal.view().iter(), quant.view().iter()) {
            if f == NON_IRIS || q == NON_IRIS {
                continue;
            }
            let f = policy.row(f).clamp(0, FRACTAL_LEVELS as i32) as usize;
            let q = q.clamp(0, QUANT_LEVELS as i32) as usize;
            hist.data[(f, q)] += 1;
        }
        hist
    }

    /// `(f, q)` 处的计数.
    #[inline]
    pub fn get(&self, f: usize, q: usize) -> u64 {
        self.data.get((f, q)).copied().unwrap_or(0)
    }

    /// 计数总和.
    #[inline]
    pub fn total(&self) -> u64 {
        self.data.sum()
    }

    /// 底层数据的不可变视图.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, u64> {
        self.data.view()
    }

    /// 参与统计的格子: `f < 100` 且 `q < 16`.
    #[inline]
    fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        iproduct!(0..FRACTAL_LEVELS, 0..QUANT_LEVELS).map(|(f, q)| (f, q, self.data[(f, q)] as f64))
    }
}

/// 有效游程数 `Nr` 的计数方式.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunCountPolicy {
    /// 统计参与计算的非零格子数.
    #[default]
    Corrected,

    /// 兼容旧结果: 统计 `hist[f][16] > 0` 的行数 (`f < 100`).
    ///
    /// 量化等级 16 只出现在不低于量化上界 (均值加 2 倍标准差) 的格子上, 拉伸后的真实虹膜通常没有.
    /// 此时 `Nr = 0`, 所有特征为 0. 只在复现旧数据时使用.
    Legacy,
}

impl RunCountPolicy {
    /// 所有策略.
    pub const ALL: [RunCountPolicy; 2] = [Self::Corrected, Self::Legacy];

    fn count(&self, hist: &JointHistogram) -> usize {
        match self {
            Self::Corrected => hist.cells().filter(|c| c.2 > 0.0).count(),
            Self::Legacy => (0..FRACTAL_LEVELS)
                .filter(|&f| hist.get(f, QUANT_LEVELS) > 0)
                .count(),
        }
    }
}

/// 游程统计特征.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureVector {
    /// Short Run Emphasis.
    pub sre: f64,
    /// Long Run Emphasis.
    pub lre: f64,
    /// Run Length Non-uniformity.
    pub rln: f64,
    /// Gray Level Non-uniformity.
    pub gln: f64,
    /// Low Gray-level Run Emphasis.
    pub lgre: f64,
    /// High Gray-level Run Emphasis.
    pub hgre: f64,
    /// Short Run Low Gray-level Emphasis.
    pub srlge: f64,
    /// Short Run High Gray-level Emphasis.
    pub srhge: f64,
    /// Long Run Low Gray-level Emphasis.
    pub lrlge: f64,
    /// Long Run High Gray-level Emphasis.
    pub lrhge: f64,
    /// Run Percentage.
    pub rp: f64,
}

impl FeatureVector {
    /// 特征名, 与 [`FeatureVector::to_array`] 的顺序一致.
    pub const NAMES: [&'static str; 11] = [
        "SRE", "LRE", "RLN", "GLN", "LGRE", "HGRE", "SRLGE", "SRHGE", "LRLGE", "LRHGE", "RP",
    ];

    /// 按固定顺序展开.
    pub fn to_array(&self) -> [f64; 11] {
        [
            self.sre, self.lre, self.rln, self.gln, self.lgre, self.hgre, self.srlge, self.srhge,
            self.lrlge, self.lrhge, self.rp,
        ]
    }
}

/// 由联合直方图计算游程统计特征. `members` 为虹膜像素总数.
///
/// 分母含有为 0 的等级 (`f = 0` 或 `q = 0`) 的项被跳过. `Nr = 0` 时所有特征为 0.
pub fn run_length_features(
    hist: &JointHistogram,
    members: usize,
    policy: RunCountPolicy,
) -> LocateResult<FeatureVector> {
    if members == 0 {
        return Err(LocateError::GeometryDegenerate(Degenerate::EmptyIris));
    }
    let nr = policy.count(hist);
    if nr == 0 {
        return Ok(FeatureVector::default());
    }

    let mut pg = [0.0f64; FRACTAL_LEVELS];
    let mut pr = [0.0f64; QUANT_LEVELS];
    for (f, q, n) in hist.cells() {
        pg[f] += n;
        pr[q] += n;
    }

    let sq = |v: usize| (v * v) as f64;
    let mut fv = FeatureVector::default();
    for (q, &p) in pr.iter().enumerate() {
        if q > 0 {
            fv.sre += p / sq(q);
        }
        fv.lre += p * sq(q);
        fv.rln += p * p;
    }
    for (f, &p) in pg.iter().enumerate() {
        if f > 0 {
            fv.lgre += p / sq(f);
        }
        fv.hgre += p * sq(f);
        fv.gln += p * p;
    }
    for (f, q, n) in hist.cells() {
        let (f2, q2) = (sq(f), sq(q));
        if f > 0 && q > 0 {
            fv.srlge += n / (f2 * q2);
        }
        if q > 0 {
            fv.srhge += n * f2 / q2;
        }
        if f > 0 {
            fv.lrlge += n * q2 / f2;
        }
        fv.lrhge += n * f2 * q2;
    }

    let nr = nr as f64;
    for v in [
        &mut fv.sre,
        &mut fv.lre,
        &mut fv.rln,
        &mut fv.gln,
        &mut fv.lgre,
        &mut fv.hgre,
        &mut fv.srlge,
        &mut fv.srhge,
        &mut fv.lrlge,
        &mut fv.lrhge,
    ] {
        *v /= nr;
    }
    fv.rp = nr / members as f64;
    Ok(fv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Rect;
    use crate::texture::IrisArray;
    use ndarray::array;

    fn float_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn grids_with(
        f: ndarray::Array2<i32>,
        q: ndarray::Array2<i32>,
        policy: FractalPolicy,
    ) -> JointHistogram {
        let (h, w) = f.dim();
        let rect = Rect::new(0, 0, w - 1, h - 1);
        JointHistogram::from_grids(
            &IrisArray::from_array(rect, f).unwrap(),
            &IrisArray::from_array(rect, q).unwrap(),
            policy,
        )
    }

    fn grids(f: ndarray::Array2<i32>, q: ndarray::Array2<i32>) -> JointHistogram {
        grids_with(f, q, FractalPolicy::Inverted)
    }

    #[test]
    fn test_histogram_saturates() {
        let hist = grids(
            array![[250, 3, NON_IRIS, -7]],
            array![[16, 20, 4, 2]],
        );
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.get(100, 16), 1);
        assert_eq!(hist.get(3, 16), 1);
        assert_eq!(hist.get(0, 2), 1);
        assert_eq!(hist.view().dim(), (101, 17));
    }

    #[test]
    fn test_classic_rows() {
        // Classic 指数整体平移 200 行, 不再挤在最后一行.
        let f = array![[250, 200, 300, 199, 273]];
        let q = array![[1, 2, 3, 4, 5]];
        let hist = grids_with(f.clone(), q.clone(), FractalPolicy::Classic);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.get(50, 1), 1);
        assert_eq!(hist.get(0, 2), 1);
        assert_eq!(hist.get(100, 3), 1);
        assert_eq!(hist.get(0, 4), 1);
        assert_eq!(hist.get(73, 5), 1);

        let fv = run_length_features(&hist, 5, RunCountPolicy::Corrected).unwrap();
        // 参与统计的格子: (50, 1), (0, 2), (0, 4), (73, 5).
        assert!(float_eq(fv.rp, 4.0 / 5.0));
        assert!(fv.sre > 0.0);

        // 同样的指数按 Inverted 解释时全部截断到第 100 行, 不参与统计.
        let hist = grids_with(f, q, FractalPolicy::Inverted);
        assert_eq!(hist.get(100, 1) + hist.get(100, 5), 2);
        let fv = run_length_features(&hist, 5, RunCountPolicy::Corrected).unwrap();
        assert_eq!(fv, FeatureVector::default());
    }

    #[test]
    fn test_features_by_hand() {
        // hist[1][1] = 2, hist[2][3] = 1.
        let hist = grids(array![[1, 1, 2]], array![[1, 1, 3]]);
        let fv = run_length_features(&hist, 3, RunCountPolicy::Corrected).unwrap();
        assert!(float_eq(fv.sre, (2.0 + 1.0 / 9.0) / 2.0));
        assert!(float_eq(fv.lre, 5.5));
        assert!(float_eq(fv.rln, 2.5));
        assert!(float_eq(fv.gln, 2.5));
        assert!(float_eq(fv.lgre, 1.125));
        assert!(float_eq(fv.hgre, 3.0));
        assert!(float_eq(fv.srlge, (2.0 + 1.0 / 36.0) / 2.0));
        assert!(float_eq(fv.srhge, (2.0 + 4.0 / 9.0) / 2.0));
        assert!(float_eq(fv.lrlge, 2.125));
        assert!(float_eq(fv.lrhge, 19.0));
        assert!(float_eq(fv.rp, 2.0 / 3.0));
        assert_eq!(fv.to_array()[10], fv.rp);
    }

    #[test]
    fn test_zero_levels_skipped() {
        // 所有格子都在 f = 0, q = 0.
        let hist = grids(array![[0, 0]], array![[0, 0]]);
        let fv = run_length_features(&hist, 2, RunCountPolicy::Corrected).unwrap();
        assert!(float_eq(fv.sre, 0.0));
        assert!(float_eq(fv.lgre, 0.0));
        assert!(float_eq(fv.rln, 4.0));
        assert!(float_eq(fv.gln, 4.0));
        assert!(float_eq(fv.rp, 0.5));
        assert!(fv.to_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_legacy_run_count() {
        let hist = grids(array![[1, 1, 2, 5]], array![[1, 16, 3, 16]]);
        let legacy = run_length_features(&hist, 4, RunCountPolicy::Legacy).unwrap();
        let corrected = run_length_features(&hist, 4, RunCountPolicy::Corrected).unwrap();
        // Legacy: f = 1 与 f = 5 两行的 q = 16 非零. Corrected: 只有 (1, 1) 与 (2, 3).
        assert!(float_eq(legacy.rp, 0.5));
        assert!(float_eq(corrected.rp, 0.5));
        assert!(float_eq(legacy.lre, corrected.lre));

        // Legacy 下没有 q = 16 的格子时 Nr = 0, 所有特征为 0.
        let hist = grids(array![[1, 2]], array![[1, 3]]);
        let fv = run_length_features(&hist, 2, RunCountPolicy::Legacy).unwrap();
        assert_eq!(fv, FeatureVector::default());
    }

    #[test]
    fn test_empty_iris() {
        let hist = JointHistogram::default();
        assert!(matches!(
            run_length_features(&hist, 0, RunCountPolicy::Corrected),
            Err(LocateError::GeometryDegenerate(Degenerate::EmptyIris))
        ));
    }
}
