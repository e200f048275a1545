use std::ops::Range;

use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};

use crate::{MlErr, Result};

/// Identifies one of the parameter groups of a `Rbm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKey {
    Weights,
    HiddenBias,
    VisibleBias,
}

/// The shape of a `Rbm`'s parameters and where each group lives in a flat buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    visible: usize,
    hidden: usize,
}

impl Layout {
    /// Creates a new `Layout`.
    ///
    /// # Arguments
    /// * `visible` - The amount of visible units.
    /// * `hidden` - The amount of hidden units.
    pub fn new(visible: usize, hidden: usize) -> Self {
        Self { visible, hidden }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Returns the amount of scalar parameters of the layer.
    pub fn size(&self) -> usize {
        self.visible * self.hidden + self.hidden + self.visible
    }

    /// Returns the range a parameter group occupies in a flat buffer.
    pub fn range(&self, key: ParamKey) -> Range<usize> {
        let w_size = self.visible * self.hidden;

        match key {
            ParamKey::Weights => 0..w_size,
            ParamKey::HiddenBias => w_size..w_size + self.hidden,
            ParamKey::VisibleBias => w_size + self.hidden..self.size(),
        }
    }

    /// Gives a view of a raw parameter slice as the weights, hidden bias and visible bias.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// The three views or an error if the slice's length doesn't match this layout.
    pub fn view<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>, ArrayView1<'a, f32>)> {
        self.check_len("params", params.len())?;

        let w = ArrayView2::from_shape(self.dim(), &params[self.range(ParamKey::Weights)])?;
        let hb = ArrayView1::from_shape(self.hidden, &params[self.range(ParamKey::HiddenBias)])?;
        let vb = ArrayView1::from_shape(self.visible, &params[self.range(ParamKey::VisibleBias)])?;
        Ok((w, hb, vb))
    }

    /// Gives a mutable view of a raw slice as the weights, hidden bias and visible bias.
    ///
    /// # Arguments
    /// * `buf` - A parameter or gradient slice.
    ///
    /// # Returns
    /// The three views or an error if the slice's length doesn't match this layout.
    pub fn view_mut<'a>(
        &self,
        buf: &'a mut [f32],
    ) -> Result<(
        ArrayViewMut2<'a, f32>,
        ArrayViewMut1<'a, f32>,
        ArrayViewMut1<'a, f32>,
    )> {
        self.check_len("gradient", buf.len())?;

        let w_size = self.visible * self.hidden;
        let (w_raw, rest) = buf.split_at_mut(w_size);
        let (hb_raw, vb_raw) = rest.split_at_mut(self.hidden);

        let w = ArrayViewMut2::from_shape(self.dim(), w_raw)?;
        let hb = ArrayViewMut1::from_shape(self.hidden, hb_raw)?;
        let vb = ArrayViewMut1::from_shape(self.visible, vb_raw)?;
        Ok((w, hb, vb))
    }

    fn dim(&self) -> (usize, usize) {
        (self.visible, self.hidden)
    }

    fn check_len(&self, what: &'static str, got: usize) -> Result<()> {
        let expected = self.size();

        if got != expected {
            return Err(MlErr::SizeMismatch {
                what,
                got,
                expected,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_the_buffer() {
        let layout = Layout::new(4, 3);

        assert_eq!(layout.size(), 19);
        assert_eq!(layout.range(ParamKey::Weights), 0..12);
        assert_eq!(layout.range(ParamKey::HiddenBias), 12..15);
        assert_eq!(layout.range(ParamKey::VisibleBias), 15..19);
    }

    #[test]
    fn views_are_row_major() {
        let layout = Layout::new(2, 3);
        let params: Vec<f32> = (0..layout.size()).map(|i| i as f32).collect();

        let (w, hb, vb) = layout.view(&params).unwrap();

        assert_eq!(w.dim(), (2, 3));
        assert_eq!(w[[1, 0]], 3.);
        assert_eq!(hb.to_vec(), [6., 7., 8.]);
        assert_eq!(vb.to_vec(), [9., 10.]);
    }

    #[test]
    fn wrong_length_fails() {
        let layout = Layout::new(2, 3);
        let mut buf = vec![0.; layout.size() - 1];

        assert!(matches!(
            layout.view(&buf),
            Err(MlErr::SizeMismatch {
                got: 10,
                expected: 11,
                ..
            })
        ));
        assert!(layout.view_mut(&mut buf).is_err());
    }

    #[test]
    fn mutable_views_write_through() {
        let layout = Layout::new(2, 1);
        let mut buf = vec![0.; layout.size()];

        {
            let (mut w, mut hb, mut vb) = layout.view_mut(&mut buf).unwrap();
            w.fill(1.);
            hb.fill(2.);
            vb.fill(3.);
        }

        assert_eq!(buf, [1., 1., 2., 3., 3.]);
    }
}
