//! 睫毛轮廓的渐进式低通平滑.

/// 用半径为 `m` 的窗口均值把 `src` 的 `[start + m, end - m]` 写入 `dst`.
fn smooth_pass(src: &[i32], dst: &mut [i32], start: usize, end: usize, m: usize) {
    let div = (2 * m + 1) as i32;
    for c in start + m..=end.saturating_sub(m) {
        dst[c] = src[c - m..=c + m].iter().sum::<i32>() / div;
    }
}

/// 在 `[start, end]` 上做 `passes` 轮平滑, 第 `m` 轮的窗口半径为 `m`.
///
/// # 注意
///
/// 两个缓冲区轮流充当输入和输出, 每轮只写窗口完整的列,
/// 因此靠近两端的列保留的是更早轮次的结果. 最终结果与轮数的奇偶有关.
pub(crate) fn smooth_profile(values: &mut [i32], start: usize, end: usize, passes: usize) {
    if values.is_empty() || start > end {
        return;
    }
    let mut tmp = values.to_vec();
    let mut forward = true;
    for m in 1..=passes {
        if forward {
            smooth_pass(values, &mut tmp, start, end, m);
        } else {
            smooth_pass(&tmp, values, start, end, m);
        }
        forward = !forward;
    }
    if !forward {
        values.copy_from_slice(&tmp);
    }
}
