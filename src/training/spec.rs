use serde::{Deserialize, Serialize};

use crate::Result;

/// The specification for the `Unit` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSpec {
    Identity,
    Binary,
    Gaussian,
    Linear,
    Rectified,
    Softmax,
}

/// The specification for the reconstruction cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSpec {
    #[default]
    Mse,
    Xent,
}

/// The specification for the initial parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Normal { std_dev: f32 },
    XavierUniform,
}

impl Default for InitSpec {
    fn default() -> Self {
        Self::Normal { std_dev: 0.01 }
    }
}

/// The specification for the `Rbm` layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbmSpec {
    pub visible: usize,
    pub hidden: usize,
    pub visible_unit: UnitSpec,
    pub hidden_unit: UnitSpec,
    pub k: usize,
    #[serde(default)]
    pub sparsity: f32,
    #[serde(default = "default_pretrain")]
    pub pretrain: bool,
    #[serde(default)]
    pub cost: CostSpec,
    pub dropout: Option<f32>,
    pub seed: Option<u64>,
}

impl RbmSpec {
    /// Parses a `RbmSpec` out of a json document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The specification for the `Pretrainer` struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PretrainSpec {
    pub rbm: RbmSpec,
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    #[serde(default)]
    pub init: InitSpec,
    pub weight_noise: Option<f32>,
}

impl PretrainSpec {
    /// Parses a `PretrainSpec` out of a json document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_pretrain() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MlErr;

    #[test]
    fn minimal_spec_uses_defaults() {
        let json = r#"{
            "visible": 6,
            "hidden": 3,
            "visible_unit": "binary",
            "hidden_unit": "rectified",
            "k": 1,
            "seed": null
        }"#;

        let spec = RbmSpec::from_json(json).unwrap();

        assert_eq!(spec.hidden_unit, UnitSpec::Rectified);
        assert_eq!(spec.sparsity, 0.);
        assert!(spec.pretrain);
        assert_eq!(spec.cost, CostSpec::Mse);
        assert_eq!(spec.dropout, None);
    }

    #[test]
    fn unknown_unit_is_a_spec_error() {
        let json = r#"{
            "visible": 6,
            "hidden": 3,
            "visible_unit": "binary",
            "hidden_unit": "tanh",
            "k": 1,
            "seed": 1
        }"#;

        assert!(matches!(RbmSpec::from_json(json), Err(MlErr::Spec(_))));
    }

    #[test]
    fn pretrain_spec_nests_the_rbm() {
        let json = r#"{
            "rbm": {
                "visible": 4,
                "hidden": 2,
                "visible_unit": "gaussian",
                "hidden_unit": "binary",
                "k": 3,
                "sparsity": 0.05,
                "cost": "xent",
                "dropout": 0.8,
                "seed": 7
            },
            "learning_rate": 0.1,
            "epochs": 10,
            "batch_size": 2,
            "init": "xavier_uniform",
            "weight_noise": 0.01
        }"#;

        let spec = PretrainSpec::from_json(json).unwrap();

        assert_eq!(spec.rbm.k, 3);
        assert_eq!(spec.rbm.seed, Some(7));
        assert_eq!(spec.rbm.cost, CostSpec::Xent);
        assert_eq!(spec.rbm.dropout, Some(0.8));
        assert_eq!(spec.init, InitSpec::XavierUniform);
        assert_eq!(spec.weight_noise, Some(0.01));
    }
}
