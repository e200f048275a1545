use ndarray::{ArrayView1, ArrayView2, CowArray, Ix1, Ix2};

use super::Layout;
use crate::Result;

/// Source of a `Rbm`'s parameters.
///
/// Every getter takes a `with_noise` flag: stores that regularize training may hand out a
/// perturbed copy when it's set, and must return the clean values otherwise.
pub trait ParamStore {
    /// Returns the layout of the parameters held by this store.
    fn layout(&self) -> Layout;

    /// Returns the weight matrix, shaped `(visible, hidden)`.
    fn weights(&self, with_noise: bool) -> CowArray<'_, f32, Ix2>;

    /// Returns the hidden bias, of length `hidden`.
    fn hidden_bias(&self, with_noise: bool) -> CowArray<'_, f32, Ix1>;

    /// Returns the visible bias, of length `visible`.
    fn visible_bias(&self, with_noise: bool) -> CowArray<'_, f32, Ix1>;
}

/// A read-only `ParamStore` over a flat parameter slice. It never adds noise.
#[derive(Clone, Debug)]
pub struct Params<'a> {
    layout: Layout,
    weights: ArrayView2<'a, f32>,
    hidden_bias: ArrayView1<'a, f32>,
    visible_bias: ArrayView1<'a, f32>,
}

impl<'a> Params<'a> {
    /// Creates a new `Params`.
    ///
    /// # Arguments
    /// * `layout` - The layout of `raw`.
    /// * `raw` - The flat parameter slice.
    ///
    /// # Returns
    /// A new `Params` instance or an error if `raw`'s length doesn't match `layout`.
    pub fn new(layout: Layout, raw: &'a [f32]) -> Result<Self> {
        let (weights, hidden_bias, visible_bias) = layout.view(raw)?;

        Ok(Self {
            layout,
            weights,
            hidden_bias,
            visible_bias,
        })
    }
}

impl ParamStore for Params<'_> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn weights(&self, _with_noise: bool) -> CowArray<'_, f32, Ix2> {
        CowArray::from(self.weights.view())
    }

    fn hidden_bias(&self, _with_noise: bool) -> CowArray<'_, f32, Ix1> {
        CowArray::from(self.hidden_bias.view())
    }

    fn visible_bias(&self, _with_noise: bool) -> CowArray<'_, f32, Ix1> {
        CowArray::from(self.visible_bias.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MlErr;

    #[test]
    fn noise_flag_is_ignored() {
        let layout = Layout::new(2, 2);
        let raw: Vec<f32> = (0..layout.size()).map(|i| i as f32).collect();
        let params = Params::new(layout, &raw).unwrap();

        assert_eq!(params.weights(true), params.weights(false));
        assert_eq!(params.hidden_bias(true).to_vec(), [4., 5.]);
        assert_eq!(params.visible_bias(false).to_vec(), [6., 7.]);
    }

    #[test]
    fn short_slice_is_rejected() {
        let raw = [0.; 3];
        assert!(matches!(
            Params::new(Layout::new(2, 2), &raw),
            Err(MlErr::SizeMismatch { .. })
        ));
    }
}
