use std::{cell::RefCell, num::NonZeroUsize, rc::Rc};

use log::{debug, info};
use ndarray::Array2;
use rand::rngs::StdRng;

use super::Dataset;
use crate::{
    Result,
    arch::Rbm,
    optimization::{GradientDescent, Optimizer},
    params::{ParamStore, Params, WeightNoise},
};

/// Trains a single `Rbm` with contrastive divergence over a dataset, descending the gradient of
/// every batch in turn.
pub struct Pretrainer {
    rbm: Rbm,
    optimizer: GradientDescent,
    dataset: Dataset,
    epochs: usize,
    batch_size: NonZeroUsize,
    rng: StdRng,
    weight_noise: Option<(f32, Rc<RefCell<StdRng>>)>,
}

impl Pretrainer {
    /// Returns a new `Pretrainer`.
    ///
    /// # Arguments
    /// * `rbm` - The layer that will be trained.
    /// * `optimizer` - The optimizer applying each batch gradient.
    /// * `dataset` - The visible samples.
    /// * `epochs` - The amount of passes over the dataset per `fit` call.
    /// * `batch_size` - The maximum amount of samples per batch.
    /// * `rng` - A random number generator, used to shuffle the dataset.
    /// * `weight_noise` - An optional standard deviation for the noise added to the weights on
    ///   the positive phase, along with the rng to draw it from.
    pub fn new(
        rbm: Rbm,
        optimizer: GradientDescent,
        dataset: Dataset,
        epochs: usize,
        batch_size: NonZeroUsize,
        rng: StdRng,
        weight_noise: Option<(f32, Rc<RefCell<StdRng>>)>,
    ) -> Self {
        Self {
            rbm,
            optimizer,
            dataset,
            epochs,
            batch_size,
            rng,
            weight_noise,
        }
    }

    pub fn rbm_mut(&mut self) -> &mut Rbm {
        &mut self.rbm
    }

    /// Performs `epochs` epochs of training over `params`, updating them in place.
    ///
    /// # Arguments
    /// * `params` - A flat parameter buffer following the layer's layout.
    ///
    /// # Returns
    /// The mean reconstruction score of every epoch.
    pub fn fit(&mut self, params: &mut [f32]) -> Result<Vec<f32>> {
        let layout = self.rbm.layout();
        let mut grad = vec![0.; layout.size()];
        let mut scores = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            self.dataset.shuffle(&mut self.rng);
            let batches = self.dataset.batches(self.batch_size)?;
            let n = batches.len();

            let mut total = 0.;
            for batch in batches {
                grad.fill(0.);

                let store = Params::new(layout, params)?;
                total += match self.weight_noise.clone() {
                    Some((std_dev, rng)) => {
                        let store = WeightNoise::new(store, rng, std_dev)?;
                        self.batch_gradient(&store, &batch, &mut grad)?
                    }
                    None => self.batch_gradient(&store, &batch, &mut grad)?,
                };

                self.optimizer.update_params(params, &grad)?;
            }

            let score = if n == 0 { 0. } else { total / n as f32 };
            info!(epoch = epoch, score = score; "finished epoch");
            scores.push(score);
        }

        Ok(scores)
    }

    fn batch_gradient<P: ParamStore>(
        &mut self,
        store: &P,
        batch: &Array2<f32>,
        grad: &mut [f32],
    ) -> Result<f32> {
        let score = self
            .rbm
            .compute_gradient_and_score_into(store, batch.view(), grad)?;

        debug!(rows = batch.nrows(), score = score; "applied batch gradient");
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::units::Unit,
        params::{Layout, init},
    };
    use rand::SeedableRng;

    fn stripes() -> Vec<f32> {
        [
            [1., 1., 0., 0.],
            [0., 0., 1., 1.],
            [1., 1., 0., 0.],
            [0., 0., 1., 1.],
        ]
        .concat()
    }

    fn pretrainer(epochs: usize, weight_noise: Option<f32>) -> Pretrainer {
        let layout = Layout::new(4, 2);
        let k = NonZeroUsize::new(1).unwrap();
        let rbm = Rbm::new(layout, Unit::Binary, Unit::Binary, k, StdRng::seed_from_u64(1)).unwrap();
        let dataset = Dataset::new(stripes(), 4).unwrap();
        let noise = weight_noise.map(|s| (s, Rc::new(RefCell::new(StdRng::seed_from_u64(3)))));

        Pretrainer::new(
            rbm,
            GradientDescent::new(0.1),
            dataset,
            epochs,
            NonZeroUsize::new(2).unwrap(),
            StdRng::seed_from_u64(2),
            noise,
        )
    }

    fn initial_params() -> Vec<f32> {
        init::normal(Layout::new(4, 2), 0.01, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn fit_scores_every_epoch() {
        let mut params = initial_params();
        let scores = pretrainer(5, None).fit(&mut params).unwrap();

        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|s| s.is_finite() && *s >= 0.));
    }

    #[test]
    fn fit_moves_the_params() {
        let initial = initial_params();
        let mut params = initial.clone();
        pretrainer(3, None).fit(&mut params).unwrap();

        assert_ne!(params, initial);
        assert!(params.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn fit_with_weight_noise_moves_the_params() {
        let initial = initial_params();
        let mut params = initial.clone();
        pretrainer(2, Some(0.01)).fit(&mut params).unwrap();

        assert_ne!(params, initial);
    }

    #[test]
    fn zero_epochs_leave_params_untouched() {
        let initial = initial_params();
        let mut params = initial.clone();
        let scores = pretrainer(0, None).fit(&mut params).unwrap();

        assert!(scores.is_empty());
        assert_eq!(params, initial);
    }

    #[test]
    fn wrong_buffer_fails() {
        let mut params = vec![0.; 3];
        assert!(pretrainer(1, None).fit(&mut params).is_err());
    }
}
