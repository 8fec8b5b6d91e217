pub mod benchmarks;
pub mod evaluator;
pub mod operators;
