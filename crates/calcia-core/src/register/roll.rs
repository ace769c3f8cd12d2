//! Circular translation of frames with optional invalidity marking.

use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// Circularly shift a frame by an integer vector.
///
/// Content shifted past one edge reappears at the opposite edge, matching the
/// periodicity assumption of the discrete Fourier transform.
pub fn roll(frame: ArrayViewD<'_, f32>, shift: &[i64]) -> ArrayD<f32> {
    let source = source_maps(frame.shape(), shift);
    let mut out = ArrayD::<f32>::zeros(IxDyn(frame.shape()));
    let mut src = vec![0usize; frame.ndim()];
    for (idx, value) in out.indexed_iter_mut() {
        for (d, s) in src.iter_mut().enumerate() {
            *s = source[d][idx[d]];
        }
        *value = frame[src.as_slice()];
    }
    out
}

/// Circularly shift a frame and mark the wrapped-in region as invalid.
///
/// Along an axis of length `len` with signed shift `s`, the invalid indices
/// are `[0, s)` for s >= 0 and `[len + s, len)` for s < 0; a site is invalid
/// if any axis wrapped there. The returned mask is `true` at invalid sites.
pub fn roll_masked(frame: ArrayViewD<'_, f32>, shift: &[i64]) -> (ArrayD<f32>, ArrayD<bool>) {
    let shape: Vec<usize> = frame.shape().to_vec();
    let rolled = roll(frame, shift);
    let wrapped = wrapped_maps(&shape, shift);
    let mut mask = ArrayD::<bool>::from_elem(IxDyn(&shape), false);
    for (idx, flag) in mask.indexed_iter_mut() {
        *flag = wrapped.iter().enumerate().any(|(d, w)| w[idx[d]]);
    }
    (rolled, mask)
}

/// Per-axis source index tables: out[i] = in[source[i]].
fn source_maps(shape: &[usize], shift: &[i64]) -> Vec<Vec<usize>> {
    shape
        .iter()
        .zip(shift)
        .map(|(&len, &s)| {
            (0..len)
                .map(|i| (i as i64 - s).rem_euclid(len as i64) as usize)
                .collect()
        })
        .collect()
}

/// Per-axis tables flagging indices whose content wrapped around the edge.
fn wrapped_maps(shape: &[usize], shift: &[i64]) -> Vec<Vec<bool>> {
    shape
        .iter()
        .zip(shift)
        .map(|(&len, &s)| {
            let len_i = len as i64;
            (0..len as i64)
                .map(|i| {
                    if s >= 0 {
                        i < s.min(len_i)
                    } else {
                        i >= len_i + s.max(-len_i)
                    }
                })
                .collect()
        })
        .collect()
}
