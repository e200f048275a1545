use crate::Result;

/// Defines the strategy for updating the parameters given a computed gradient.
pub trait Optimizer {
    /// Updates `params` using `grad`.
    ///
    /// # Returns
    /// An error if there's a mismatch in the sizes of `grad` and `params`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()>;
}
