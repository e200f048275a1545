use std::{cell::RefCell, num::NonZeroUsize, rc::Rc};

use log::info;
use rand::{SeedableRng, rngs::StdRng};

use super::{
    CostSpec, Dataset, InitSpec, PretrainSpec, Pretrainer, RbmSpec, UnitSpec,
};
use crate::{
    MlErr, Result,
    arch::{
        Rbm,
        loss::{Mse, Xent},
        units::Unit,
    },
    optimization::GradientDescent,
    params::{Layout, init},
};

/// Builds `Rbm`s and `Pretrainer`s given a specification.
#[derive(Default)]
pub struct RbmBuilder;

impl RbmBuilder {
    /// Creates a new `RbmBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Rbm` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the layer.
    ///
    /// # Returns
    /// The layer or an error if the spec describes an invalid one.
    pub fn build(&self, spec: &RbmSpec) -> Result<Rbm> {
        let layout = Layout::new(spec.visible, spec.hidden);
        let visible = self.resolve_unit(spec.visible_unit);
        let hidden = self.resolve_unit(spec.hidden_unit);
        let k = NonZeroUsize::new(spec.k).ok_or(MlErr::InvalidGibbsSteps)?;
        let rng = self.generate_rng(spec.seed);

        let rbm = Rbm::new(layout, visible, hidden, k, rng)?
            .with_sparsity(spec.sparsity)
            .with_pretrain(spec.pretrain);

        let rbm = match spec.cost {
            CostSpec::Mse => rbm.with_cost(Mse::new()),
            CostSpec::Xent => rbm.with_cost(Xent::new()),
        };

        let rbm = match spec.dropout {
            Some(retain) => rbm.with_dropout(retain)?,
            None => rbm,
        };

        info!(
            visible = spec.visible,
            hidden = spec.hidden,
            k = spec.k;
            "built {:?}/{:?} rbm", visible, hidden
        );

        Ok(rbm)
    }

    /// Builds a new `Pretrainer` following a spec, along with the initial parameters to train.
    ///
    /// # Arguments
    /// * `spec` - The specification for the pretrainer.
    /// * `data` - The visible samples, one after the other.
    ///
    /// # Returns
    /// A tuple with the pretrainer and the initial parameters, or an error if the spec is invalid.
    pub fn build_pretrainer(
        &self,
        spec: &PretrainSpec,
        data: Vec<f32>,
    ) -> Result<(Pretrainer, Vec<f32>)> {
        let batch_size = NonZeroUsize::new(spec.batch_size).ok_or(MlErr::InvalidBatchSize)?;
        let rbm = self.build(&spec.rbm)?;
        let layout = rbm.layout();

        let dataset = Dataset::new(data, layout.visible())?;
        let optimizer = GradientDescent::new(spec.learning_rate);

        // The layer's rng stays private to the layer, the rest derive from the seed.
        let mut rng = self.generate_rng(spec.rbm.seed.map(|seed| seed.wrapping_add(1)));
        let params = self.resolve_init(spec.init, layout, &mut rng)?;
        let noise_rng = Rc::new(RefCell::new(StdRng::from_rng(&mut rng)));

        let pretrainer = Pretrainer::new(
            rbm,
            optimizer,
            dataset,
            spec.epochs,
            batch_size,
            rng,
            spec.weight_noise.map(|std_dev| (std_dev, noise_rng)),
        );

        Ok((pretrainer, params))
    }

    fn resolve_unit(&self, spec: UnitSpec) -> Unit {
        match spec {
            UnitSpec::Identity => Unit::Identity,
            UnitSpec::Binary => Unit::Binary,
            UnitSpec::Gaussian => Unit::Gaussian,
            UnitSpec::Linear => Unit::Linear,
            UnitSpec::Rectified => Unit::Rectified,
            UnitSpec::Softmax => Unit::Softmax,
        }
    }

    fn resolve_init(&self, spec: InitSpec, layout: Layout, rng: &mut StdRng) -> Result<Vec<f32>> {
        match spec {
            InitSpec::Normal { std_dev } => init::normal(layout, std_dev, rng),
            InitSpec::XavierUniform => init::xavier_uniform(layout, rng),
        }
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
