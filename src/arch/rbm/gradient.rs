use log::{debug, trace};
use ndarray::{ArrayView2, Axis, linalg};

use super::Rbm;
use crate::{
    Result,
    gradient::{Gradient, GradientViewMut},
    params::ParamStore,
};

impl Rbm {
    /// Computes the contrastive divergence gradient of the parameters over a visible batch and
    /// **adds** it to `grad`.
    ///
    /// The positive phase samples the hidden layer given `v0` and the chain is seeded with the
    /// hidden means. The negative phase runs `k` gibbs transitions and keeps the last one.
    ///
    /// # Arguments
    /// * `params` - The layer's parameters.
    /// * `v0` - The visible batch, shaped `(batch, visible)`.
    /// * `grad` - A flat gradient buffer following the layer's layout. The caller must be its
    ///   only writer for the duration of the call.
    ///
    /// # Returns
    /// The reconstruction score of the last visible sample against `v0`.
    pub fn compute_gradient_and_score_into<P: ParamStore>(
        &mut self,
        params: &P,
        v0: ArrayView2<f32>,
        grad: &mut [f32],
    ) -> Result<f32> {
        let mut grad = GradientViewMut::new(self.layout, grad)?;

        let (h_prob0, _) = self.sample_hidden_given_visible(params, v0)?;

        debug!(k = self.k.get(), batch = v0.nrows(); "running negative phase");
        let neg = self.gibbs_chain(params, h_prob0.view())?;

        let sign = if self.pretrain { -1. } else { 1. };

        linalg::general_mat_mul(sign, &v0.t(), &h_prob0, 1., &mut grad.weights);
        linalg::general_mat_mul(-sign, &neg.v_prob.t(), &neg.h_prob, 1., &mut grad.weights);

        let sparsity = self.sparsity;
        let hb_grad = if sparsity != 0. {
            h_prob0.mapv(|h| sparsity - h).sum_axis(Axis(0))
        } else {
            (&h_prob0 - &neg.h_prob).sum_axis(Axis(0))
        };
        grad.hidden_bias.scaled_add(sign, &hb_grad);

        let vb_grad = (&v0 - &neg.v_prob).sum_axis(Axis(0));
        grad.visible_bias.scaled_add(sign, &vb_grad);

        let score = self.cost.loss(neg.v_sample.view(), v0);
        trace!(score = score; "computed contrastive divergence gradient");

        let view = grad.view();
        for listener in self.listeners.iter_mut() {
            listener.on_backward_pass(&view);
        }

        Ok(score)
    }

    /// Computes the contrastive divergence gradient over a visible batch into a fresh buffer.
    ///
    /// # Returns
    /// A tuple with the gradient and the reconstruction score.
    pub fn compute_gradient_and_score<P: ParamStore>(
        &mut self,
        params: &P,
        v0: ArrayView2<f32>,
    ) -> Result<(Gradient, f32)> {
        let mut buf = vec![0.; self.layout.size()];
        let score = self.compute_gradient_and_score_into(params, v0, &mut buf)?;
        let grad = Gradient::from_flat(self.layout, &buf)?;

        Ok((grad, score))
    }
}
