use ndarray::{ArrayView2, Zip};

use super::LossFn;

const EPS: f32 = 1e-7;

/// Binary cross entropy between a reconstruction in `[0, 1]` and the original batch.
///
/// Reconstructions are clamped to `[EPS, 1 - EPS]` so saturated units don't produce infinities.
#[derive(Default, Clone, Copy, Debug)]
pub struct Xent;

impl Xent {
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Xent {
    fn loss(&self, reconstruction: ArrayView2<f32>, original: ArrayView2<f32>) -> f32 {
        if original.is_empty() {
            return 0.;
        }

        let total = Zip::from(&reconstruction)
            .and(&original)
            .fold(0., |acc, &p, &y| {
                let p = p.clamp(EPS, 1. - EPS);
                acc - (y * p.ln() + (1. - y) * (1. - p).ln())
            });

        total / original.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn perfect_reconstruction_is_almost_free() {
        let y = array![[0., 1.], [1., 0.]];
        assert!(Xent.loss(y.view(), y.view()) < 1e-5);
    }

    #[test]
    fn uncertain_reconstruction_costs_ln2() {
        let reconstruction = array![[0.5, 0.5]];
        let original = array![[0., 1.]];

        let loss = Xent.loss(reconstruction.view(), original.view());
        assert!((loss - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn saturated_mistakes_stay_finite() {
        let reconstruction = array![[0., 1.]];
        let original = array![[1., 0.]];

        let loss = Xent.loss(reconstruction.view(), original.view());
        assert!(loss.is_finite());
        assert!(loss > 10.);
    }
}
