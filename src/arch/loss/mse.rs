use ndarray::{ArrayView2, Zip};

use super::LossFn;

/// Mean squared reconstruction error.
#[derive(Default, Clone, Copy, Debug)]
pub struct Mse;

impl Mse {
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, reconstruction: ArrayView2<f32>, original: ArrayView2<f32>) -> f32 {
        if original.is_empty() {
            return 0.;
        }

        let total = Zip::from(&reconstruction)
            .and(&original)
            .fold(0., |acc, &r, &o| acc + (r - o).powi(2));

        total / original.len() as f32
    }
}
