use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};

use crate::{Result, params::Layout};

/// A freshly owned gradient of a `Rbm`'s parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub weights: Array2<f32>,
    pub hidden_bias: Array1<f32>,
    pub visible_bias: Array1<f32>,
}

impl Gradient {
    /// Builds a `Gradient` out of a flat buffer.
    ///
    /// # Arguments
    /// * `layout` - The layout of `buf`.
    /// * `buf` - The flat gradient.
    ///
    /// # Returns
    /// The gradient or an error if `buf`'s length doesn't match `layout`.
    pub fn from_flat(layout: Layout, buf: &[f32]) -> Result<Self> {
        let (weights, hidden_bias, visible_bias) = layout.view(buf)?;

        Ok(Self {
            weights: weights.to_owned(),
            hidden_bias: hidden_bias.to_owned(),
            visible_bias: visible_bias.to_owned(),
        })
    }
}

/// A read-only view of a gradient, handed to `GradientListener`s.
#[derive(Clone, Debug)]
pub struct GradientView<'a> {
    pub weights: ArrayView2<'a, f32>,
    pub hidden_bias: ArrayView1<'a, f32>,
    pub visible_bias: ArrayView1<'a, f32>,
}

/// A mutable view of a caller-owned flat gradient buffer.
#[derive(Debug)]
pub struct GradientViewMut<'a> {
    pub weights: ArrayViewMut2<'a, f32>,
    pub hidden_bias: ArrayViewMut1<'a, f32>,
    pub visible_bias: ArrayViewMut1<'a, f32>,
}

impl<'a> GradientViewMut<'a> {
    /// Views a raw gradient slice following `layout`.
    ///
    /// # Returns
    /// The view or an error if `buf`'s length doesn't match `layout`.
    pub fn new(layout: Layout, buf: &'a mut [f32]) -> Result<Self> {
        let (weights, hidden_bias, visible_bias) = layout.view_mut(buf)?;

        Ok(Self {
            weights,
            hidden_bias,
            visible_bias,
        })
    }

    pub fn view(&self) -> GradientView<'_> {
        GradientView {
            weights: self.weights.view(),
            hidden_bias: self.hidden_bias.view(),
            visible_bias: self.visible_bias.view(),
        }
    }
}

/// Observes the gradients computed by a `Rbm` during pretraining.
pub trait GradientListener: Send {
    /// Called once per gradient computation, after the gradient was written.
    fn on_backward_pass(&mut self, grad: &GradientView<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn flat_round_trip_keeps_groups_apart() {
        let layout = Layout::new(2, 1);
        let buf = [1., 2., 3., 4., 5.];

        let grad = Gradient::from_flat(layout, &buf).unwrap();

        assert_eq!(grad.weights, array![[1.], [2.]]);
        assert_eq!(grad.hidden_bias, array![3.]);
        assert_eq!(grad.visible_bias, array![4., 5.]);
    }

    #[test]
    fn mutable_view_writes_into_the_buffer() {
        let layout = Layout::new(1, 2);
        let mut buf = [0.; 5];

        let mut view = GradientViewMut::new(layout, &mut buf).unwrap();
        view.hidden_bias += &array![1., 2.];
        assert_eq!(view.view().hidden_bias, array![1., 2.]);

        assert_eq!(buf, [0., 0., 1., 2., 0.]);
    }
}
