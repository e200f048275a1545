use ndarray::{Array2, ArrayView2};

use super::{Rbm, check_size};
use crate::{Result, params::ParamStore};

impl Rbm {
    /// Computes the hidden pre-activation `v * W + hbias`.
    ///
    /// # Arguments
    /// * `params` - The layer's parameters.
    /// * `v` - A visible batch, shaped `(batch, visible)`.
    /// * `training` - Whether to look the parameters up with noise.
    pub fn pre_output<P: ParamStore>(
        &self,
        params: &P,
        v: ArrayView2<f32>,
        training: bool,
    ) -> Result<Array2<f32>> {
        self.check_params(params)?;
        check_size("visible batch", v.ncols(), self.layout.visible())?;

        let w = params.weights(training);
        let hb = params.hidden_bias(training);

        let mut z = v.dot(&w);
        z += &hb;
        Ok(z)
    }

    /// Computes the mean activation of the hidden layer given a visible batch.
    ///
    /// # Returns
    /// The hidden means, shaped `(batch, hidden)`.
    pub fn prop_up<P: ParamStore>(
        &mut self,
        params: &P,
        v: ArrayView2<f32>,
        training: bool,
    ) -> Result<Array2<f32>> {
        let z = self.pre_output(params, v, training)?;
        Ok(self.hidden.mean(z, &mut self.rng))
    }

    /// Computes the mean activation of the visible layer given a hidden batch, `h * W^T + vbias`
    /// followed by the visible unit's mean.
    ///
    /// # Returns
    /// The visible means, shaped `(batch, visible)`.
    pub fn prop_down<P: ParamStore>(
        &mut self,
        params: &P,
        h: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        self.check_params(params)?;
        check_size("hidden batch", h.ncols(), self.layout.hidden())?;

        let w = params.weights(false);
        let vb = params.visible_bias(false);

        let mut z = h.dot(&w.t());
        z += &vb;
        Ok(self.visible.mean(z, &mut self.rng))
    }
}
