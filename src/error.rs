use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::{NormalError, uniform::Error as UniformError};

use crate::arch::units::Unit;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    UnsupportedUnit {
        layer: &'static str,
        unit: Unit,
    },
    InvalidGibbsSteps,
    InvalidBatchSize,
    InvalidDropout(f32),
    Shape(ShapeError),
    Spec(serde_json::Error),
    Normal(NormalError),
    Uniform(UniformError),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::UnsupportedUnit { layer, unit } => {
                write!(f, "The {layer} layer does not support {unit:?} units")
            }
            MlErr::InvalidGibbsSteps => {
                write!(f, "The amount of gibbs steps (k) must be at least 1")
            }
            MlErr::InvalidBatchSize => write!(f, "The batch size must be at least 1"),
            MlErr::InvalidDropout(p) => {
                write!(f, "The dropout retain probability must be in (0, 1], got {p}")
            }
            MlErr::Shape(e) => write!(f, "shape error: {e}"),
            MlErr::Spec(e) => write!(f, "invalid spec: {e}"),
            MlErr::Normal(e) => write!(f, "invalid normal distribution: {e}"),
            MlErr::Uniform(e) => write!(f, "invalid uniform distribution: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::Spec(e) => Some(e),
            MlErr::Normal(e) => Some(e),
            MlErr::Uniform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Spec(value)
    }
}

impl From<NormalError> for MlErr {
    fn from(value: NormalError) -> Self {
        Self::Normal(value)
    }
}

impl From<UniformError> for MlErr {
    fn from(value: UniformError) -> Self {
        Self::Uniform(value)
    }
}
