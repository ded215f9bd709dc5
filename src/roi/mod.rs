//! 송장 처리 자동화 ROI 계산 모듈 모음.

pub mod bias;
pub mod engine;
pub mod inputs;

pub use bias::*;
pub use engine::*;
pub use inputs::*;
