use ndarray::{Array3, ArrayD, ArrayViewD, Axis};

use crate::consts::{MAX_SPATIAL_DIMS, MIN_SPATIAL_DIMS};
use crate::error::{CalciaError, Result};

/// A time series of image frames.
///
/// The time axis is the leading axis; the remaining 2 or 3 axes are spatial
/// (tyx or tzyx). Pixel values are f32.
#[derive(Clone, Debug)]
pub struct FrameStack {
    data: ArrayD<f32>,
}

impl FrameStack {
    /// Wrap an array as a frame stack, validating its dimensionality.
    pub fn new(data: ArrayD<f32>) -> Result<Self> {
        let spatial = data.ndim().saturating_sub(1);
        if !(MIN_SPATIAL_DIMS..=MAX_SPATIAL_DIMS).contains(&spatial) {
            return Err(CalciaError::InvalidDimensions { ndim: data.ndim() });
        }
        if data.len_of(Axis(0)) == 0 {
            return Err(CalciaError::EmptySequence);
        }
        Ok(Self { data })
    }

    /// Build a stack from a sequence of equally shaped 2D frames.
    pub fn from_frames(frames: &[ndarray::Array2<f32>]) -> Result<Self> {
        let first = frames.first().ok_or(CalciaError::EmptySequence)?;
        let (h, w) = first.dim();
        let mut data = Array3::<f32>::zeros((frames.len(), h, w));
        for (k, frame) in frames.iter().enumerate() {
            if frame.dim() != (h, w) {
                return Err(CalciaError::ShapeMismatch {
                    expected: vec![h, w],
                    actual: frame.shape().to_vec(),
                });
            }
            data.index_axis_mut(Axis(0), k).assign(frame);
        }
        Self::new(data.into_dyn())
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn num_frames(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Per-frame spatial shape (the stack shape without the time axis).
    pub fn spatial_shape(&self) -> &[usize] {
        &self.data.shape()[1..]
    }

    /// Number of spatial axes (2 or 3).
    pub fn spatial_ndim(&self) -> usize {
        self.data.ndim() - 1
    }

    pub fn frame(&self, index: usize) -> ArrayViewD<'_, f32> {
        self.data.index_axis(Axis(0), index)
    }
}

/// A stack with an explicit validity bitmap.
///
/// `mask` is `true` where a value is invalid (content that wrapped around the
/// frame boundary during registration). Invalid sites are distinct from sites
/// that are legitimately zero.
#[derive(Clone, Debug)]
pub struct MaskedStack {
    pub data: ArrayD<f32>,
    pub mask: ArrayD<bool>,
}

impl MaskedStack {
    /// Materialize the stack with invalid sites filled with zero.
    pub fn filled(&self) -> ArrayD<f32> {
        let mut out = self.data.clone();
        out.zip_mut_with(&self.mask, |v, &masked| {
            if masked {
                *v = 0.0;
            }
        });
        out
    }

    /// Fraction of sites marked invalid.
    pub fn masked_fraction(&self) -> f64 {
        let masked = self.mask.iter().filter(|&&m| m).count();
        masked as f64 / self.mask.len() as f64
    }
}
