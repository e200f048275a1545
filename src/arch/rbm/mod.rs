//! A Restricted Boltzmann Machine layer.
//!
//! The layer is a pure function of its parameters, its configuration and its random number
//! generator: it never owns the parameters, which are read through a `ParamStore`, and it
//! writes gradients into caller-owned buffers.

mod backprop;
mod gibbs;
mod gradient;
mod propagation;

use std::num::NonZeroUsize;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand_distr::Bernoulli;

use super::{
    loss::{LossFn, Mse},
    units::Unit,
};
use crate::{MlErr, Result, gradient::GradientListener, params::Layout, params::ParamStore};

/// The four matrices produced by one hidden -> visible -> hidden gibbs transition.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainStep {
    pub v_prob: Array2<f32>,
    pub v_sample: Array2<f32>,
    pub h_prob: Array2<f32>,
    pub h_sample: Array2<f32>,
}

/// Input dropout applied by `Rbm::activate` while training.
struct Dropout {
    retain: f32,
    mask: Bernoulli,
}

/// A Restricted Boltzmann Machine trained by `k` steps of contrastive divergence.
pub struct Rbm {
    layout: Layout,
    visible: Unit,
    hidden: Unit,
    k: NonZeroUsize,
    sparsity: f32,
    pretrain: bool,
    dropout: Option<Dropout>,
    rng: StdRng,
    cost: Box<dyn LossFn + Send>,
    listeners: Vec<Box<dyn GradientListener>>,
}

impl Rbm {
    /// Creates a new `Rbm` in pretrain mode, without a sparsity target and scored by `Mse`.
    ///
    /// # Arguments
    /// * `layout` - The amount of visible and hidden units.
    /// * `visible` - The unit family of the visible layer.
    /// * `hidden` - The unit family of the hidden layer.
    /// * `k` - The amount of gibbs steps run on each gradient computation.
    /// * `rng` - The random number generator every sample of this layer is drawn from.
    ///
    /// # Returns
    /// A new `Rbm` or an error if `hidden` can't be used in the hidden layer.
    pub fn new(
        layout: Layout,
        visible: Unit,
        hidden: Unit,
        k: NonZeroUsize,
        rng: StdRng,
    ) -> Result<Self> {
        if !hidden.is_hidden_unit() {
            return Err(MlErr::UnsupportedUnit {
                layer: "hidden",
                unit: hidden,
            });
        }

        Ok(Self {
            layout,
            visible,
            hidden,
            k,
            sparsity: 0.,
            pretrain: true,
            dropout: None,
            rng,
            cost: Box::new(Mse),
            listeners: Vec::new(),
        })
    }

    /// Sets the desired mean activation of the hidden units, `0` disables it.
    pub fn with_sparsity(mut self, sparsity: f32) -> Self {
        self.sparsity = sparsity;
        self
    }

    /// Sets whether the layer is being pretrained, which negates every computed gradient so
    /// that descending it ascends the likelihood.
    pub fn with_pretrain(mut self, pretrain: bool) -> Self {
        self.pretrain = pretrain;
        self
    }

    /// Enables input dropout on training activations.
    ///
    /// # Arguments
    /// * `retain` - The probability of keeping each input, kept inputs are scaled by `1 / retain`.
    ///
    /// # Returns
    /// The layer or an error if `retain` is not in `(0, 1]`.
    pub fn with_dropout(mut self, retain: f32) -> Result<Self> {
        if !(retain > 0. && retain <= 1.) {
            return Err(MlErr::InvalidDropout(retain));
        }

        let mask = Bernoulli::new(retain as f64).map_err(|_| MlErr::InvalidDropout(retain))?;
        self.dropout = Some(Dropout { retain, mask });
        Ok(self)
    }

    /// Sets the cost used to score reconstructions.
    pub fn with_cost<L>(mut self, cost: L) -> Self
    where
        L: LossFn + Send + 'static,
    {
        self.cost = Box::new(cost);
        self
    }

    /// Registers a listener notified after every contrastive divergence gradient.
    pub fn add_listener(&mut self, listener: Box<dyn GradientListener>) {
        self.listeners.push(listener);
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn visible_unit(&self) -> Unit {
        self.visible
    }

    pub fn hidden_unit(&self) -> Unit {
        self.hidden
    }

    pub fn k(&self) -> NonZeroUsize {
        self.k
    }

    pub fn sparsity(&self) -> f32 {
        self.sparsity
    }

    pub fn is_pretrain(&self) -> bool {
        self.pretrain
    }

    /// Returns the input retain probability, if dropout is enabled.
    pub fn dropout(&self) -> Option<f32> {
        self.dropout.as_ref().map(|d| d.retain)
    }

    fn check_params<P: ParamStore>(&self, params: &P) -> Result<()> {
        let layout = params.layout();

        check_size("params visible units", layout.visible(), self.layout.visible())?;
        check_size("params hidden units", layout.hidden(), self.layout.hidden())
    }
}

fn check_size(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(MlErr::SizeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}
