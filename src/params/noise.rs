use std::{cell::RefCell, rc::Rc};

use ndarray::{Array, CowArray, Dimension, Ix1, Ix2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;

use super::{Layout, ParamStore};
use crate::Result;

/// A `ParamStore` that perturbs the parameters of another store with zero-mean gaussian noise
/// whenever they are requested `with_noise`.
pub struct WeightNoise<P: ParamStore, R: Rng> {
    inner: P,
    rng: Rc<RefCell<R>>,
    distribution: Normal<f32>,
    apply_to_bias: bool,
}

impl<P: ParamStore, R: Rng> WeightNoise<P, R> {
    /// Creates a new `WeightNoise` store that only perturbs the weights.
    ///
    /// # Arguments
    /// * `inner` - The store holding the clean parameters.
    /// * `rng` - A random number generator.
    /// * `std_dev` - The standard deviation of the noise.
    ///
    /// # Returns
    /// An error if `std_dev` is negative or not finite.
    pub fn new(inner: P, rng: Rc<RefCell<R>>, std_dev: f32) -> Result<Self> {
        Ok(Self {
            inner,
            rng,
            distribution: Normal::new(0., std_dev)?,
            apply_to_bias: false,
        })
    }

    /// Also perturbs both biases.
    pub fn with_bias_noise(mut self) -> Self {
        self.apply_to_bias = true;
        self
    }

    fn perturb<'a, D>(&self, clean: CowArray<'a, f32, D>) -> CowArray<'a, f32, D>
    where
        D: Dimension,
    {
        let mut rng = self.rng.borrow_mut();
        let mut noisy = Array::random_using(clean.raw_dim(), &self.distribution, &mut *rng);
        noisy += &clean;
        CowArray::from(noisy)
    }
}

impl<P: ParamStore, R: Rng> ParamStore for WeightNoise<P, R> {
    fn layout(&self) -> Layout {
        self.inner.layout()
    }

    fn weights(&self, with_noise: bool) -> CowArray<'_, f32, Ix2> {
        let clean = self.inner.weights(false);

        match with_noise {
            true => self.perturb(clean),
            false => clean,
        }
    }

    fn hidden_bias(&self, with_noise: bool) -> CowArray<'_, f32, Ix1> {
        let clean = self.inner.hidden_bias(false);

        match with_noise && self.apply_to_bias {
            true => self.perturb(clean),
            false => clean,
        }
    }

    fn visible_bias(&self, with_noise: bool) -> CowArray<'_, f32, Ix1> {
        let clean = self.inner.visible_bias(false);

        match with_noise && self.apply_to_bias {
            true => self.perturb(clean),
            false => clean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use rand::{SeedableRng, rngs::StdRng};

    fn seeded_rng() -> Rc<RefCell<StdRng>> {
        Rc::new(RefCell::new(StdRng::seed_from_u64(42)))
    }

    #[test]
    fn clean_lookups_are_untouched() {
        let layout = Layout::new(3, 2);
        let raw = vec![1.; layout.size()];
        let params = Params::new(layout, &raw).unwrap();
        let noisy = WeightNoise::new(params.clone(), seeded_rng(), 0.5).unwrap();

        assert_eq!(noisy.weights(false), params.weights(false));
        assert_eq!(noisy.hidden_bias(false), params.hidden_bias(false));
        assert_eq!(noisy.layout(), layout);
    }

    #[test]
    fn noisy_lookups_perturb_only_the_weights() {
        let layout = Layout::new(3, 2);
        let raw = vec![1.; layout.size()];
        let params = Params::new(layout, &raw).unwrap();
        let noisy = WeightNoise::new(params.clone(), seeded_rng(), 0.5).unwrap();

        assert_ne!(noisy.weights(true), params.weights(false));
        assert_eq!(noisy.hidden_bias(true), params.hidden_bias(false));
        assert_eq!(noisy.visible_bias(true), params.visible_bias(false));
    }

    #[test]
    fn bias_noise_is_opt_in() {
        let layout = Layout::new(3, 2);
        let raw = vec![1.; layout.size()];
        let params = Params::new(layout, &raw).unwrap();
        let noisy = WeightNoise::new(params.clone(), seeded_rng(), 0.5)
            .unwrap()
            .with_bias_noise();

        assert_ne!(noisy.hidden_bias(true), params.hidden_bias(false));
        assert_ne!(noisy.visible_bias(true), params.visible_bias(false));
    }

    #[test]
    fn invalid_std_dev_fails() {
        let layout = Layout::new(1, 1);
        let raw = vec![0.; layout.size()];
        let params = Params::new(layout, &raw).unwrap();

        assert!(WeightNoise::new(params, seeded_rng(), f32::NAN).is_err());
    }
}
