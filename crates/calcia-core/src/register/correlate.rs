//! Fourier-domain cross-correlation against a template.

use ndarray::{Array1, Array2, ArrayViewD, Axis, Dimension};
use num_complex::Complex;
use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{CalciaError, Result};

use super::fft;

/// Find the integer displacement aligning each frame to the template.
///
/// Both inputs are in the frequency domain: `frames_fft` is a block of frame
/// spectra with the time axis leading, `template_fft` a single spectrum of
/// matching spatial shape. Multiplying each frame's spectrum by the conjugate
/// template spectrum is the Fourier form of their cross-correlation; the
/// position of the correlation peak in real space is the best overlap, and the
/// displacement is its negation (rolling the frame by minus the peak
/// coordinate centers the peak at the origin).
pub fn find_offsets(
    frames_fft: ArrayViewD<'_, Complex<f64>>,
    template_fft: ArrayViewD<'_, Complex<f64>>,
) -> Result<Array2<i64>> {
    if &frames_fft.shape()[1..] != template_fft.shape() {
        return Err(CalciaError::ShapeMismatch {
            expected: template_fft.shape().to_vec(),
            actual: frames_fft.shape()[1..].to_vec(),
        });
    }

    let num_frames = frames_fft.len_of(Axis(0));
    let frames: Vec<_> = frames_fft.axis_iter(Axis(0)).collect();
    let rows: Vec<Vec<i64>> = if num_frames >= PARALLEL_FRAME_THRESHOLD {
        frames
            .par_iter()
            .map(|frame| frame_offset(frame, &template_fft))
            .collect()
    } else {
        frames
            .iter()
            .map(|frame| frame_offset(frame, &template_fft))
            .collect()
    };

    let mut offsets = Array2::<i64>::zeros((num_frames, template_fft.ndim()));
    for (mut out, row) in offsets.rows_mut().into_iter().zip(&rows) {
        for (o, &v) in out.iter_mut().zip(row) {
            *o = v;
        }
    }
    Ok(offsets)
}

/// Single-frame convenience wrapper: adds an implicit batch axis and strips
/// it from the result.
pub fn find_offset(
    frame_fft: ArrayViewD<'_, Complex<f64>>,
    template_fft: ArrayViewD<'_, Complex<f64>>,
) -> Result<Array1<i64>> {
    let batch = frame_fft.insert_axis(Axis(0));
    let offsets = find_offsets(batch, template_fft)?;
    Ok(offsets.row(0).to_owned())
}

/// Correlate one frame with the template and locate the peak.
fn frame_offset(
    frame_fft: &ArrayViewD<'_, Complex<f64>>,
    template_fft: &ArrayViewD<'_, Complex<f64>>,
) -> Vec<i64> {
    let mut conv = frame_fft.to_owned();
    conv.zip_mut_with(template_fft, |v, &t| *v *= t.conj());
    fft::inverse_frame(&mut conv.view_mut());

    // Peak of the correlation magnitude; ties resolve to the first index in
    // row-major order.
    let mut best = f64::NEG_INFINITY;
    let mut best_idx = vec![0usize; conv.ndim()];
    for (idx, v) in conv.indexed_iter() {
        let mag = v.norm_sqr();
        if mag > best {
            best = mag;
            best_idx = idx.slice().to_vec();
        }
    }

    best_idx.into_iter().map(|i| -(i as i64)).collect()
}
