mod loss_fn;
mod mse;
mod xent;

pub use loss_fn::LossFn;
pub use mse::Mse;
pub use xent::Xent;
