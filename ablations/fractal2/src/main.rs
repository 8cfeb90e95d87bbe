//! 分形指数取值方式与游程计数方式的消融实验.
//!
//! 样本为一组合成体模, 每个策略组合使用一个线程.

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::init_with_level(log::Level::Warn).unwrap();
    runner::run().analyze();
}
