use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView2, Axis};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// An in-memory set of visible samples, stored row-major.
pub struct Dataset {
    data: Vec<f32>,
    width: usize,
    order: Vec<usize>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The samples, one after the other.
    /// * `width` - The amount of features of each sample.
    ///
    /// # Returns
    /// A new `Dataset` or an error if `data` doesn't hold a whole number of samples.
    pub fn new(data: Vec<f32>, width: usize) -> Result<Self> {
        if width == 0 || data.len() % width != 0 {
            return Err(MlErr::SizeMismatch {
                what: "dataset",
                got: data.len(),
                expected: data.len().next_multiple_of(width.max(1)),
            });
        }

        let len = data.len() / width;

        Ok(Self {
            data,
            width,
            order: (0..len).collect(),
        })
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn view(&self) -> Result<ArrayView2<'_, f32>> {
        Ok(ArrayView2::from_shape((self.len(), self.width), &self.data)?)
    }

    /// Shuffles the order in which samples are batched.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
    }

    /// Splits the samples into batches of at most `batch_size` rows, following the current order.
    pub fn batches(&self, batch_size: NonZeroUsize) -> Result<Vec<Array2<f32>>> {
        let all = self.view()?;

        let batches = self
            .order
            .chunks(batch_size.get())
            .map(|rows| all.select(Axis(0), rows))
            .collect();

        Ok(batches)
    }
}
