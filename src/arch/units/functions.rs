use ndarray::{Array2, ArrayView2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

/// The logistic function.
pub fn sigmoid(z: f32) -> f32 {
    1. / (1. + (-z).exp())
}

/// Applies a softmax over each row of `z`.
///
/// The row maximum is subtracted before exponentiating so large activations don't overflow.
pub fn softmax(mut z: Array2<f32>) -> Array2<f32> {
    for mut row in z.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
        row.mapv_inplace(|x| (x - max).exp());

        let sum = row.sum();
        row /= sum;
    }

    z
}

/// Draws one `Normal(mean, 1)` sample per entry of `mean`, consuming `rng` in logical order.
pub(super) fn unit_normal<R>(mean: ArrayView2<f32>, rng: &mut R) -> Array2<f32>
where
    R: Rng + ?Sized,
{
    let mut noise = Array2::<f32>::random_using(mean.raw_dim(), StandardNormal, rng);
    noise += &mean;
    noise
}
