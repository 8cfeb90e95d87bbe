//! 消融实验的输入样本: 一组确定性的合成体模.

use iris_berry::data::{EyePhantom, LidShape};
use iris_berry::PixelBuffer;

/// 带名字的样本图像.
pub type Sample = (String, PixelBuffer);

/// 瞳孔半径 `10..=14`, 每个半径各渲染一张无遮挡与一张带上眼睑的体模.
///
/// 眼睑深度随瞳孔半径调整, 使遮挡总在睫毛种子行的上方.
pub fn phantoms() -> Vec<Sample> {
    let mut out = Vec::new();
    for pupil_radius in 10..=14 {
        let base = EyePhantom {
            pupil_radius,
            ..EyePhantom::default()
        };
        out.push((format!("phantom-r{pupil_radius}"), base.render()));

        let lid = EyePhantom {
            lid: Some(LidShape {
                depth: 48 - pupil_radius,
                spread: 60,
                gray: 30,
            }),
            ..base
        };
        out.push((format!("phantom-r{pupil_radius}-lid"), lid.render()));
    }
    out
}

/// 在默认体模上加入不同纹理振幅, 用于观察特征随纹理强度的变化.
pub fn textured_phantoms() -> Vec<Sample> {
    (4..=12)
        .step_by(4)
        .map(|texture| {
            let p = EyePhantom {
                texture,
                ..EyePhantom::default().with_default_lid()
            };
            (format!("phantom-t{texture}-lid"), p.render())
        })
        .collect()
}
