use ndarray::{Array2, ArrayView2, Zip};
use rand::Rng;

use super::functions::{sigmoid, softmax, unit_normal};

/// The stochastic unit family of one layer of a `Rbm`.
///
/// Every unit bundles three operations over a pre-activation matrix `z`:
/// its mean (expected activation), a sample drawn from that mean and the
/// derivative of the activation used by the backprop path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Identity,
    Binary,
    Gaussian,
    Linear,
    Rectified,
    Softmax,
}
use Unit::*;

impl Unit {
    /// Whether this unit can be used in the hidden layer.
    pub fn is_hidden_unit(&self) -> bool {
        !matches!(self, Linear)
    }

    /// Computes the mean activation of the layer given its pre-activation.
    ///
    /// Gaussian units return a `Normal(z, 1)` draw instead of `z` itself.
    ///
    /// # Arguments
    /// * `z` - The pre-activation, consumed and transformed in place.
    /// * `rng` - The layer's random number generator.
    pub fn mean<R>(&self, mut z: Array2<f32>, rng: &mut R) -> Array2<f32>
    where
        R: Rng + ?Sized,
    {
        match self {
            Identity | Linear => z,
            Binary => {
                z.par_mapv_inplace(sigmoid);
                z
            }
            Gaussian => unit_normal(z.view(), rng),
            Rectified => {
                z.par_mapv_inplace(|z| z.max(0.));
                z
            }
            Softmax => softmax(z),
        }
    }

    /// Draws a stochastic sample of the layer given its mean activation.
    ///
    /// # Arguments
    /// * `mean` - The mean activation, as returned by `Unit::mean`.
    /// * `rng` - The layer's random number generator.
    pub fn sample<R>(&self, mean: ArrayView2<f32>, rng: &mut R) -> Array2<f32>
    where
        R: Rng + ?Sized,
    {
        match self {
            Identity => mean.to_owned(),
            Binary => mean.mapv(|p| if rng.random::<f32>() < p { 1. } else { 0. }),
            Gaussian | Linear => unit_normal(mean, rng),
            Rectified => {
                let mut sample = unit_normal(mean, rng);

                Zip::from(&mut sample).and(&mean).for_each(|s, &m| {
                    *s = (m + *s * sigmoid(m).sqrt()).max(0.);
                });

                sample
            }
            Softmax => softmax(mean.to_owned()),
        }
    }

    /// Computes the derivative of the mean activation with respect to the pre-activation.
    ///
    /// Gaussian units yield the stochastic estimate `-2 * z * Normal(z, 1)`.
    ///
    /// # Arguments
    /// * `z` - The pre-activation.
    /// * `rng` - The layer's random number generator.
    pub fn derivative<R>(&self, z: ArrayView2<f32>, rng: &mut R) -> Array2<f32>
    where
        R: Rng + ?Sized,
    {
        match self {
            Identity | Linear => Array2::ones(z.raw_dim()),
            Binary => z.mapv(|z| {
                let s = sigmoid(z);
                s * (1. - s)
            }),
            Gaussian => {
                let mut d = unit_normal(z, rng);
                d.zip_mut_with(&z, |d, &z| *d *= -2. * z);
                d
            }
            Rectified => z.mapv(|z| if z > 0. { 1. } else { 0. }),
            Softmax => softmax(z.to_owned()).mapv_into(|s| s * (1. - s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn z() -> Array2<f32> {
        array![[-2., -0.5, 0., 0.5], [3., -1., 1., 0.25]]
    }

    #[test]
    fn binary_means_are_probabilities_and_samples_are_bits() {
        let mut rng = seeded_rng();

        let mean = Binary.mean(z(), &mut rng);
        assert!(mean.iter().all(|&p| (0. ..=1.).contains(&p)));

        let sample = Binary.sample(mean.view(), &mut rng);
        assert_eq!(sample.dim(), mean.dim());
        assert!(sample.iter().all(|&s| s == 0. || s == 1.));
    }

    #[test]
    fn binary_extremes_are_deterministic() {
        let mut rng = seeded_rng();
        let mean = array![[0., 1.], [1., 0.]];

        let sample = Binary.sample(mean.view(), &mut rng);
        assert_eq!(sample, mean);
    }

    #[test]
    fn identity_is_a_no_op() {
        let mut rng = seeded_rng();

        let mean = Identity.mean(z(), &mut rng);
        assert_eq!(mean, z());
        assert_eq!(Identity.sample(mean.view(), &mut rng), z());
        assert_eq!(Identity.derivative(z().view(), &mut rng), Array2::<f32>::ones((2, 4)));
    }

    #[test]
    fn rectified_is_never_negative() {
        let mut rng = seeded_rng();

        let mean = Rectified.mean(z(), &mut rng);
        assert_eq!(mean, z().mapv(|z| z.max(0.)));

        let sample = Rectified.sample(mean.view(), &mut rng);
        assert!(sample.iter().all(|&s| s >= 0.));

        let d = Rectified.derivative(z().view(), &mut rng);
        assert_eq!(d, array![[0., 0., 0., 1.], [1., 0., 1., 1.]]);
    }

    #[test]
    fn binary_derivative_matches_sigmoid_prime() {
        let mut rng = seeded_rng();

        let d = Binary.derivative(z().view(), &mut rng);
        assert_eq!(d[[0, 2]], 0.25);

        let s = sigmoid(3.);
        assert!((d[[1, 0]] - s * (1. - s)).abs() < 1e-7);
    }

    #[test]
    fn softmax_mean_and_sample_are_distributions() {
        let mut rng = seeded_rng();

        let mean = Softmax.mean(z(), &mut rng);
        let sample = Softmax.sample(mean.view(), &mut rng);

        for row in mean.rows().into_iter().chain(sample.rows()) {
            assert!((row.sum() - 1.).abs() < 1e-6);
        }
    }

    #[test]
    fn gaussian_derivative_scales_a_normal_draw() {
        let z = array![[0., 1., -2.]];

        let d = Gaussian.derivative(z.view(), &mut seeded_rng());
        let draw = unit_normal(z.view(), &mut seeded_rng());

        assert_eq!(d, -2f32 * &z * &draw);
        assert_eq!(d[[0, 0]], 0.);
    }

    #[test]
    fn softmax_derivative_is_the_jacobian_diagonal() {
        let mut rng = seeded_rng();

        let d = Softmax.derivative(z().view(), &mut rng);
        let s = softmax(z());

        assert_eq!(d, s.mapv(|s| s * (1. - s)));
        assert!(d.iter().all(|&d| d > 0. && d <= 0.25));
    }

    #[test]
    fn gaussian_draws_are_reproducible() {
        let mean = Gaussian.mean(z(), &mut seeded_rng());
        let again = Gaussian.mean(z(), &mut seeded_rng());

        assert_eq!(mean, again);
        assert_ne!(mean, z());
    }

    #[test]
    fn linear_is_visible_only() {
        assert!(!Linear.is_hidden_unit());
        assert!([Identity, Binary, Gaussian, Rectified, Softmax]
            .iter()
            .all(Unit::is_hidden_unit));
    }
}
