mod functions;
mod unit;

pub use functions::{sigmoid, softmax};
pub use unit::Unit;
