//! À trous wavelet decomposition of images and volumes.
//!
//! Successive smoothing with the dilated binomial B3 kernel; each step's
//! detail layer is the difference between the input and its smoothed version,
//! and the final smoothed image is the residual. The original can be
//! reconstructed exactly as sum(details) + residual.

use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::B3_KERNEL;
use crate::error::{CalciaError, Result};

/// Decomposition depth: one value for every axis, or one per axis.
///
/// A per-axis scale stops smoothing an axis once the step exceeds its entry;
/// an entry of zero leaves that axis untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(usize),
    PerAxis(Vec<usize>),
}

impl Scale {
    /// Resolve to a per-axis vector, validating the length against the data
    /// dimensionality.
    pub fn resolve(&self, ndim: usize) -> Result<Vec<usize>> {
        match self {
            Scale::Uniform(s) => Ok(vec![*s; ndim]),
            Scale::PerAxis(v) if v.len() == ndim => Ok(v.clone()),
            Scale::PerAxis(v) => Err(CalciaError::ScaleLengthMismatch {
                got: v.len(),
                ndim,
            }),
        }
    }
}

/// Parameters for the wavelet transform stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaveletParams {
    pub scale: Scale,
}

impl Default for WaveletParams {
    fn default() -> Self {
        Self {
            scale: Scale::Uniform(5),
        }
    }
}

/// Detail layers and smoothed residual of an à trous decomposition.
#[derive(Clone, Debug)]
pub struct WaveletDecomposition {
    /// One detail layer per scale step, finest first.
    pub details: Vec<ArrayD<f32>>,
    /// The remaining smoothed image.
    pub residual: ArrayD<f32>,
}

impl WaveletDecomposition {
    /// Exact inverse of the decomposition.
    pub fn reconstruct(&self) -> ArrayD<f32> {
        let mut out = self.residual.clone();
        for detail in &self.details {
            out += detail;
        }
        out
    }
}

/// Decompose an image into wavelet detail layers plus a residual.
///
/// At step i the B3 kernel is applied separably with dilation 2^(i-1), along
/// every axis whose scale entry is at least i.
pub fn wavelet_transform(data: &ArrayD<f32>, scale: &Scale) -> Result<WaveletDecomposition> {
    let per_axis = scale.resolve(data.ndim())?;
    let depth = per_axis.iter().copied().max().unwrap_or(0);

    let mut details = Vec::with_capacity(depth);
    let mut current = data.clone();
    for step in 1..=depth {
        let mut smoothed = current.clone();
        for (axis, &axis_scale) in per_axis.iter().enumerate() {
            if step <= axis_scale {
                smoothed = convolve_axis(&smoothed, axis, step);
            }
        }
        details.push(&current - &smoothed);
        current = smoothed;
    }

    Ok(WaveletDecomposition {
        details,
        residual: current,
    })
}

/// À trous convolution along one axis: the 5-tap B3 kernel read at intervals
/// of 2^(step-1), with mirrored borders.
fn convolve_axis(data: &ArrayD<f32>, axis: usize, step: usize) -> ArrayD<f32> {
    let dilation = 1isize << (step - 1);
    let len = data.shape()[axis];
    let mut out = data.clone();

    for (lane_in, mut lane_out) in data
        .lanes(Axis(axis))
        .into_iter()
        .zip(out.lanes_mut(Axis(axis)))
    {
        for i in 0..len {
            let mut sum = 0.0f32;
            for (ki, &kv) in B3_KERNEL.iter().enumerate() {
                let offset = (ki as isize - 2) * dilation;
                let src = mirror_index(i as isize + offset, len);
                sum += lane_in[src] * kv;
            }
            lane_out[i] = sum;
        }
    }

    out
}

/// Mirror boundary handling: reflect index into [0, size).
/// Even function (f(-k) = f(k)) with period 2*size, ping-ponging within
/// [0, size).
pub fn mirror_index(idx: isize, size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    let period = 2 * size;
    let abs_idx = idx.unsigned_abs();
    let m = abs_idx % period;

    if m < size {
        m
    } else {
        2 * size - 1 - m
    }
}
