use ndarray::ArrayView2;

/// Scores how far a reconstruction is from the original batch.
pub trait LossFn {
    /// Returns the mean cost per entry of `reconstruction` against `original`.
    fn loss(&self, reconstruction: ArrayView2<f32>, original: ArrayView2<f32>) -> f32;
}
