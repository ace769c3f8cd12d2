//! Separable complex FFT over the spatial axes of frames and frame blocks.
//!
//! Inverse transforms carry the 1/N normalization so that
//! inverse(forward(x)) == x.

use std::f64::consts::TAU;

use ndarray::parallel::prelude::*;
use ndarray::{ArrayD, ArrayViewMutD, Axis, IxDyn};
use num_complex::Complex;
use num_traits::Zero;
use rustfft::{FftDirection, FftPlanner};

use crate::consts::PARALLEL_FRAME_THRESHOLD;

/// Forward FFT over every axis of a single frame, in place.
pub fn forward_frame(frame: &mut ArrayViewMutD<'_, Complex<f64>>) {
    transform(frame, FftDirection::Forward);
}

/// Inverse FFT over every axis of a single frame, in place.
pub fn inverse_frame(frame: &mut ArrayViewMutD<'_, Complex<f64>>) {
    transform(frame, FftDirection::Inverse);
    normalize(frame);
}

/// Forward FFT over the spatial axes of a block of frames (leading axis is
/// time), one independent transform per frame.
pub fn forward_frames(block: &mut ArrayViewMutD<'_, Complex<f64>>) {
    transform_frames(block, FftDirection::Forward);
}

/// Inverse FFT over the spatial axes of a block of frames.
pub fn inverse_frames(block: &mut ArrayViewMutD<'_, Complex<f64>>) {
    transform_frames(block, FftDirection::Inverse);
    for mut frame in block.axis_iter_mut(Axis(0)) {
        normalize(&mut frame);
    }
}

/// The frequency-domain equivalent of `roll(frame, shift)`: multiplying a
/// frame's spectrum by this ramp circularly shifts the frame by `shift`.
pub fn phase_ramp(shift: &[i64], shape: &[usize]) -> ArrayD<Complex<f64>> {
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let mut arg = 0.0;
        for d in 0..shape.len() {
            arg -= TAU * shift[d] as f64 * idx[d] as f64 / shape[d] as f64;
        }
        Complex::from_polar(1.0, arg)
    })
}

fn transform_frames(block: &mut ArrayViewMutD<'_, Complex<f64>>, direction: FftDirection) {
    if block.len_of(Axis(0)) >= PARALLEL_FRAME_THRESHOLD {
        block
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut frame| transform(&mut frame, direction));
    } else {
        for mut frame in block.axis_iter_mut(Axis(0)) {
            transform(&mut frame, direction);
        }
    }
}

/// Separable transform: 1D FFTs along each axis in turn, gathering each lane
/// into a contiguous buffer.
fn transform(frame: &mut ArrayViewMutD<'_, Complex<f64>>, direction: FftDirection) {
    let mut planner = FftPlanner::new();
    for ax in 0..frame.ndim() {
        let len = frame.shape()[ax];
        let fft = planner.plan_fft(len, direction);
        let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];
        let mut buffer = vec![Complex::zero(); len];
        for mut lane in frame.lanes_mut(Axis(ax)) {
            for (b, v) in buffer.iter_mut().zip(lane.iter()) {
                *b = *v;
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);
            for (v, &b) in lane.iter_mut().zip(buffer.iter()) {
                *v = b;
            }
        }
    }
}

fn normalize(frame: &mut ArrayViewMutD<'_, Complex<f64>>) {
    let scale = 1.0 / frame.len() as f64;
    frame.mapv_inplace(|v| v * scale);
}
