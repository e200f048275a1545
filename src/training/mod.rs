mod builder;
mod dataset;
mod pretrainer;
mod spec;

pub use builder::RbmBuilder;
pub use dataset::Dataset;
pub use pretrainer::Pretrainer;
pub use spec::{CostSpec, InitSpec, PretrainSpec, RbmSpec, UnitSpec};
