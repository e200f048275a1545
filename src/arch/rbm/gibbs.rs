use ndarray::{Array2, ArrayView2};

use super::{ChainStep, Rbm};
use crate::{Result, params::ParamStore};

impl Rbm {
    /// Samples the hidden layer given a visible batch.
    ///
    /// # Returns
    /// A tuple with the hidden means and a sample drawn from them.
    pub fn sample_hidden_given_visible<P: ParamStore>(
        &mut self,
        params: &P,
        v: ArrayView2<f32>,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        let h_prob = self.prop_up(params, v, true)?;
        let h_sample = self.hidden.sample(h_prob.view(), &mut self.rng);
        Ok((h_prob, h_sample))
    }

    /// Samples the visible layer given a hidden batch.
    ///
    /// # Returns
    /// A tuple with the visible means and a sample drawn from them.
    pub fn sample_visible_given_hidden<P: ParamStore>(
        &mut self,
        params: &P,
        h: ArrayView2<f32>,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        let v_prob = self.prop_down(params, h)?;
        let v_sample = self.visible.sample(v_prob.view(), &mut self.rng);
        Ok((v_prob, v_sample))
    }

    /// Runs one gibbs transition: hidden -> visible -> hidden.
    ///
    /// The hidden layer is resampled from the visible means, not from the visible sample.
    pub fn gibbs_hvh<P: ParamStore>(&mut self, params: &P, h: ArrayView2<f32>) -> Result<ChainStep> {
        let (v_prob, v_sample) = self.sample_visible_given_hidden(params, h)?;
        let (h_prob, h_sample) = self.sample_hidden_given_visible(params, v_prob.view())?;

        Ok(ChainStep {
            v_prob,
            v_sample,
            h_prob,
            h_sample,
        })
    }

    /// Runs `k` chained gibbs transitions starting at `start`, feeding the hidden sample of each
    /// step into the next one.
    ///
    /// # Returns
    /// The last step of the chain.
    pub fn gibbs_chain<P: ParamStore>(
        &mut self,
        params: &P,
        start: ArrayView2<f32>,
    ) -> Result<ChainStep> {
        let mut step = self.gibbs_hvh(params, start)?;

        for _ in 1..self.k.get() {
            step = self.gibbs_hvh(params, step.h_sample.view())?;
        }

        Ok(step)
    }
}
