pub mod loss;
mod rbm;
pub mod units;

pub use rbm::{ChainStep, Rbm};
