use ndarray::{Array2, ArrayView1, ArrayView2, Axis, Zip, linalg};
use ndarray_rand::RandomExt;

use super::{Rbm, check_size};
use crate::{
    Result,
    gradient::{Gradient, GradientViewMut},
    params::ParamStore,
};

impl Rbm {
    /// Makes a single forward pass, as an ordinary feed-forward layer would.
    ///
    /// When `training` is set and dropout is enabled, inputs are dropped before propagating up.
    pub fn activate<P: ParamStore>(
        &mut self,
        params: &P,
        v: ArrayView2<f32>,
        training: bool,
    ) -> Result<Array2<f32>> {
        let Some(dropout) = self.dropout.as_ref().filter(|_| training) else {
            return self.prop_up(params, v, training);
        };

        let keep = Array2::random_using(v.raw_dim(), &dropout.mask, &mut self.rng);
        let scale = dropout.retain.recip();

        let dropped = Zip::from(&keep)
            .and(&v)
            .map_collect(|&keep, &x| if keep { x * scale } else { 0. });

        self.prop_up(params, dropped.view(), training)
    }

    /// Backpropagates an error signal through the layer and **adds** the gradient of the weights
    /// and hidden bias to `grad`. The visible bias gets no signal on this path.
    ///
    /// # Arguments
    /// * `params` - The layer's parameters.
    /// * `v` - The visible batch the layer was activated with.
    /// * `epsilon` - The error signal w.r.t. the layer's output, shaped `(batch, hidden)`.
    /// * `mask` - An optional per example weight, masked rows get a zero delta.
    /// * `grad` - A flat gradient buffer following the layer's layout.
    ///
    /// # Returns
    /// The error signal for the preceding layer, shaped `(batch, visible)`.
    pub fn backprop_gradient_into<P: ParamStore>(
        &mut self,
        params: &P,
        v: ArrayView2<f32>,
        epsilon: ArrayView2<f32>,
        mask: Option<ArrayView1<f32>>,
        grad: &mut [f32],
    ) -> Result<Array2<f32>> {
        let mut grad = GradientViewMut::new(self.layout, grad)?;
        let z = self.pre_output(params, v, true)?;

        check_size("error batch", epsilon.nrows(), z.nrows())?;
        check_size("error width", epsilon.ncols(), z.ncols())?;

        let mut delta = self.hidden.derivative(z.view(), &mut self.rng);
        delta *= &epsilon;

        if let Some(mask) = mask {
            check_size("mask", mask.len(), delta.nrows())?;
            delta *= &mask.insert_axis(Axis(1));
        }

        linalg::general_mat_mul(1., &v.t(), &delta, 1., &mut grad.weights);
        grad.hidden_bias += &delta.sum_axis(Axis(0));

        let w = params.weights(false);
        Ok(delta.dot(&w.t()))
    }

    /// Backpropagates an error signal through the layer into a fresh gradient.
    ///
    /// # Returns
    /// A tuple with the gradient and the error signal for the preceding layer.
    pub fn backprop_gradient<P: ParamStore>(
        &mut self,
        params: &P,
        v: ArrayView2<f32>,
        epsilon: ArrayView2<f32>,
        mask: Option<ArrayView1<f32>>,
    ) -> Result<(Gradient, Array2<f32>)> {
        let mut buf = vec![0.; self.layout.size()];
        let epsilon_next = self.backprop_gradient_into(params, v, epsilon, mask, &mut buf)?;
        let grad = Gradient::from_flat(self.layout, &buf)?;

        Ok((grad, epsilon_next))
    }
}
