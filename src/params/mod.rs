//! Parameter storage for a `Rbm` layer.
//!
//! Parameters live in a single flat `f32` buffer laid out as
//! `weights (visible x hidden, row-major) | hidden bias | visible bias`.
//! Gradient buffers follow the exact same layout.

pub mod init;
mod layout;
mod noise;
mod store;

pub use layout::{Layout, ParamKey};
pub use noise::WeightNoise;
pub use store::{ParamStore, Params};
