//! 曲线拟合.
//!
//! 给定一系列整数点 `(x, y)`, 该模块可以拟合出一条直线,
//! 用于把睫毛轮廓外推到未检测到遮挡的列.

mod line;

pub use line::{fit_line, Line};
