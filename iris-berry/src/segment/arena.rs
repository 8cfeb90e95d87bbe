//! 泛洪填充使用的点栈.

use crate::Idx2d;

/// 可以被泛洪填充的网格.
pub(crate) trait FloodTarget {
    /// 网格形状 `(h, w)`.
    fn shape(&self) -> Idx2d;

    /// 若 `pos` 是尚未访问的目标像素, 将其标记为已访问并返回 `true`.
    ///
    /// 调用方保证 `pos` 不越界.
    fn claim(&mut self, pos: Idx2d) -> bool;
}

/// 获得 `(h, w)` 的 4-邻居索引, 顺序为 `+x, -x, +y, -y`. 不检查越界.
#[inline]
fn neighbour4((h, w): Idx2d) -> [Idx2d; 4] {
    [
        (h, w.saturating_add(1)),
        (h, w.wrapping_sub(1)),
        (h.saturating_add(1), w),
        (h.wrapping_sub(1), w),
    ]
}

/// 预分配的点栈. 区域生长与睫毛泛洪共用同一个实例.
///
/// # 注意
///
/// 点栈不可重入: 每次 [`PointStack::grow`] 都会先清空内容,
/// 返回的切片借用必须在下一次填充之前结束. 借用检查器保证了这一点.
#[derive(Clone, Debug, Default)]
pub struct PointStack {
    buf: Vec<Idx2d>,
}

impl PointStack {
    /// 预分配 `capacity` 个位置. 最坏情况下一个区域覆盖整张图像.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// 当前容量.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// 从 `seed` 出发做 4-邻域泛洪, 返回按发现顺序排列的区域像素 (种子在首位).
    ///
    /// 像素在入栈时即被 `target` 标记为已访问. 若 `seed` 本身不可认领, 返回空切片.
    pub(crate) fn grow<T: FloodTarget>(&mut self, target: &mut T, seed: Idx2d) -> &[Idx2d] {
        self.buf.clear();
        let (height, width) = target.shape();
        if seed.0 >= height || seed.1 >= width || !target.claim(seed) {
            return &self.buf;
        }
        self.buf.push(seed);

        let mut cursor = 0;
        while cursor < self.buf.len() {
            let cur = self.buf[cursor];
            for pos in neighbour4(cur) {
                if pos.0 < height && pos.1 < width && target.claim(pos) {
                    self.buf.push(pos);
                }
            }
            cursor += 1;
        }
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    struct Mask(Array2<bool>);

    impl FloodTarget for Mask {
        fn shape(&self) -> Idx2d {
            self.0.dim()
        }

        fn claim(&mut self, pos: Idx2d) -> bool {
            std::mem::replace(&mut self.0[pos], false)
        }
    }

    #[test]
    fn test_grow_order() {
        let mut mask = Mask(array![
            [true, true, false],
            [true, false, false],
            [true, true, true],
        ]);
        let mut stack = PointStack::with_capacity(9);
        let area = stack.grow(&mut mask, (0, 0));
        assert_eq!(area, &[(0, 0), (0, 1), (1, 0), (2, 0), (2, 1), (2, 2)]);
        assert!(mask.0.iter().all(|v| !v));
        assert_eq!(stack.capacity(), 9);
    }

    #[test]
    fn test_grow_rejected_seed() {
        let mut mask = Mask(Array2::from_elem((2, 2), false));
        let mut stack = PointStack::with_capacity(4);
        assert!(stack.grow(&mut mask, (1, 1)).is_empty());
        assert!(stack.grow(&mut mask, (5, 0)).is_empty());
    }
}
