mod basic;

pub use basic::BasicEvaluator;
