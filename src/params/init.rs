//! Initial parameter buffers for a `Rbm`: random weights and zeroed biases.

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::{Layout, ParamKey};
use crate::Result;

/// Creates a parameter buffer whose weights follow a normal distribution.
///
/// # Arguments
/// * `layout` - The layout of the buffer.
/// * `std_dev` - The standard deviation of the weights, centered at zero.
/// * `rng` - A random number generator.
///
/// # Returns
/// An error if `std_dev` is not finite (Nan or infinite).
pub fn normal<R: Rng>(layout: Layout, std_dev: f32, rng: &mut R) -> Result<Vec<f32>> {
    Ok(with_weights(layout, Normal::new(0., std_dev)?, rng))
}

/// Creates a parameter buffer using Xavier uniform initialization for its weights.
///
/// # Arguments
/// * `layout` - The layout of the buffer.
/// * `rng` - A random number generator.
///
/// # Returns
/// An error if the calculated range is invalid.
pub fn xavier_uniform<R: Rng>(layout: Layout, rng: &mut R) -> Result<Vec<f32>> {
    let range = (6. / (layout.visible() + layout.hidden()) as f32).sqrt();
    Ok(with_weights(layout, Uniform::new(-range, range)?, rng))
}

fn with_weights<D, R>(layout: Layout, distribution: D, rng: &mut R) -> Vec<f32>
where
    D: Distribution<f32>,
    R: Rng,
{
    let mut params = vec![0.; layout.size()];
    let weights = Array2::random_using((layout.visible(), layout.hidden()), distribution, rng);

    params[layout.range(ParamKey::Weights)]
        .iter_mut()
        .zip(weights.iter())
        .for_each(|(p, &w)| *p = w);

    params
}
