//! Iterative registration of a frame stack against its own mean projection.

use ndarray::{s, Array2, ArrayD, Axis, IxDyn, Slice, Zip};
use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::Result;
use crate::stack::{FrameStack, MaskedStack};

use super::{correlate, fft, offsets, roll};

/// Parameters for mean-offset registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistrationParams {
    /// Iteration cap. `None` runs until the shifts stop changing; parameter
    /// files may use a negative number for the same effect.
    #[serde(default, deserialize_with = "negative_is_none")]
    pub max_iters: Option<usize>,
    /// Frames transformed and correlated per block, bounding peak memory.
    /// `None` processes the whole stack at once.
    #[serde(default, deserialize_with = "negative_is_none")]
    pub block_frames: Option<usize>,
}

/// Outcome of registering a stack.
#[derive(Clone, Debug)]
pub struct Registration {
    /// Registered frames with wrapped-in regions marked invalid.
    pub frames: MaskedStack,
    /// Final per-frame shift vectors (N x D), each component in
    /// `(-shape_d/2, shape_d/2]`.
    pub shifts: Array2<i64>,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the shifts reached a fixed point before the iteration cap.
    pub converged: bool,
}

/// Register an image stack against its mean projection.
///
/// Repeats two steps until no shift changes: rebuild the consensus template
/// as the phase-shifted mean of all frame spectra under the current shift
/// estimate, then re-estimate every frame's shift against that template by
/// cross-correlation. Each round removes the global translation bias (rounded
/// mean shift) and renormalizes shifts onto the shortest wraparound. Frames
/// are processed in blocks of `block_frames` to bound peak memory.
///
/// Reaching the iteration cap is not an error: the best estimate so far is
/// returned with `converged` unset.
pub fn register_mean_offsets(
    stack: &FrameStack,
    params: &RegistrationParams,
) -> Result<Registration> {
    let num_frames = stack.num_frames();
    let spatial = stack.spatial_shape().to_vec();
    let block = params.block_frames.unwrap_or(num_frames).max(1);

    info!(
        frames = num_frames,
        spatial = ?spatial,
        block,
        "registering stack against its mean projection"
    );

    // One spatial FFT per frame, computed once and reused every iteration.
    let mut frames_fft = stack.data().mapv(|v| Complex::new(v as f64, 0.0));
    for (lo, hi) in block_ranges(num_frames, block) {
        let mut chunk = frames_fft.slice_axis_mut(Axis(0), Slice::from(lo..hi));
        fft::forward_frames(&mut chunk);
    }

    let mut shifts = Array2::<i64>::zeros((num_frames, spatial.len()));
    let mut template_fft = ArrayD::<Complex<f64>>::zeros(IxDyn(&spatial));
    let mut iterations = 0usize;
    let mut converged = false;

    loop {
        if let Some(cap) = params.max_iters {
            if iterations >= cap {
                break;
            }
        }

        // Consensus template: the mean of all frame spectra, each shifted by
        // its current estimate via the phase-shift theorem. The template must
        // be complete before any offset is re-estimated against it.
        template_fft.fill(Complex::new(0.0, 0.0));
        for (lo, hi) in block_ranges(num_frames, block) {
            for k in lo..hi {
                let ramp = fft::phase_ramp(&shifts.row(k).to_vec(), &spatial);
                let frame_fft = frames_fft.index_axis(Axis(0), k);
                Zip::from(&mut template_fft)
                    .and(&frame_fft)
                    .and(&ramp)
                    .for_each(|t, &f, &r| *t += f * r);
            }
        }
        template_fft.mapv_inplace(|v| v / num_frames as f64);

        let mut new_shifts = Array2::<i64>::zeros((num_frames, spatial.len()));
        for (lo, hi) in block_ranges(num_frames, block) {
            let chunk = frames_fft.slice_axis(Axis(0), Slice::from(lo..hi));
            let found = correlate::find_offsets(chunk, template_fft.view())?;
            new_shifts.slice_mut(s![lo..hi, ..]).assign(&found);
        }

        // Remove the global translation bias, then take the shortest roll.
        let center = offsets::rounded_mean(&new_shifts);
        offsets::relative_offsets(&mut new_shifts, &center);
        offsets::shortest_wraparound(&mut new_shifts, &spatial);

        // Shifts are integers throughout, so the exact-zero test is sound.
        let mut delta_sq: i64 = 0;
        for (&new, &old) in new_shifts.iter().zip(shifts.iter()) {
            let d = new - old;
            delta_sq += d * d;
        }
        shifts = new_shifts;
        iterations += 1;
        debug!(iteration = iterations, delta_sq, "registration iteration");

        if delta_sq == 0 {
            converged = true;
            break;
        }
    }

    let frames = apply_shifts(stack, &shifts);
    info!(
        iterations,
        converged,
        masked_fraction = frames.masked_fraction(),
        "registration finished"
    );

    Ok(Registration {
        frames,
        shifts,
        iterations,
        converged,
    })
}

/// Roll each original frame by its final shift, marking wrapped-in regions
/// invalid.
fn apply_shifts(stack: &FrameStack, shifts: &Array2<i64>) -> MaskedStack {
    let num_frames = stack.num_frames();
    let rolled: Vec<_> = if num_frames >= PARALLEL_FRAME_THRESHOLD {
        (0..num_frames)
            .into_par_iter()
            .map(|k| roll::roll_masked(stack.frame(k), &shifts.row(k).to_vec()))
            .collect()
    } else {
        (0..num_frames)
            .map(|k| roll::roll_masked(stack.frame(k), &shifts.row(k).to_vec()))
            .collect()
    };

    let mut data = ArrayD::<f32>::zeros(stack.data().raw_dim());
    let mut mask = ArrayD::<bool>::from_elem(stack.data().raw_dim(), false);
    for (k, (frame, frame_mask)) in rolled.into_iter().enumerate() {
        data.index_axis_mut(Axis(0), k).assign(&frame);
        mask.index_axis_mut(Axis(0), k).assign(&frame_mask);
    }
    MaskedStack { data, mask }
}

/// Contiguous `[lo, hi)` chunks of the frame axis.
fn block_ranges(total: usize, block: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..total)
        .step_by(block.max(1))
        .map(move |lo| (lo, (lo + block).min(total)))
}

/// Parameter files inherited from the original pipeline use a negative limit
/// to mean "unlimited".
fn negative_is_none<'de, D>(de: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(de)?;
    Ok(value.and_then(|v| usize::try_from(v).ok()))
}
