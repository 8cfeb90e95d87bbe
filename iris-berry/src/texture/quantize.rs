use super::{rescale, IrisArray, QuantizedGrayGrid};
use crate::consts::QUANT_LEVELS;
use crate::error::LocateResult;

/// 把 (已拉伸的) 虹膜灰度量化到 `0..=16`.
///
/// 与对比度拉伸使用相同的截断规则, 只是映射的上界为 16.
pub fn quantize(input: &IrisArray) -> LocateResult<QuantizedGrayGrid> {
    rescale(input, QUANT_LEVELS as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NON_IRIS;
    use crate::data::Rect;
    use ndarray::{array, Array2};

    #[test]
    fn test_quantize_boundaries() {
        // 0..=99 均匀分布: mean = 49.5, std ≈ 28.87, 区间截断为 [0, 107.2].
        let rect = Rect::new(0, 0, 9, 9);
        let data = Array2::from_shape_fn((10, 10), |(h, w)| (h * 10 + w) as i32);
        let q = quantize(&IrisArray::from_array(rect, data).unwrap()).unwrap();

        let max = 49.5 + 2.0 * (9999.0f64 / 12.0).sqrt();
        let expect = |v: f64| (v * 16.0 / max) as i32;
        assert_eq!(q[(0, 0)], 0);
        assert_eq!(q[(9, 9)], expect(99.0));
        assert_eq!(q[(5, 0)], expect(50.0));
        assert!(q.member_values().all(|v| (0..=16).contains(&v)));
    }

    #[test]
    fn test_quantize_outliers() {
        // 一个远离均值的高值被截断到 16, 非虹膜格子保持不变.
        let rect = Rect::new(0, 0, 10, 0);
        let mut data = Array2::from_elem((1, 11), 100);
        data[(0, 0)] = 101;
        data[(0, 1)] = 99;
        data[(0, 9)] = NON_IRIS;
        data[(0, 10)] = 250;
        let q = quantize(&IrisArray::from_array(rect, data).unwrap()).unwrap();
        assert_eq!(q[(0, 10)], 16);
        assert_eq!(q[(0, 9)], NON_IRIS);
        assert_eq!(q.members(), 10);
    }

    #[test]
    fn test_quantize_clamped_band() {
        // 均值 170, 区间 [170 - 2σ, 170 + 2σ] 两端截断为 [0, 255], 255 恰在上界.
        let rect = Rect::new(0, 0, 3, 0);
        let data = array![[0, 255, 255, NON_IRIS]];
        let q = quantize(&IrisArray::from_array(rect, data).unwrap()).unwrap();
        assert_eq!(q.view(), array![[0, 16, 16, NON_IRIS]]);
    }
}
