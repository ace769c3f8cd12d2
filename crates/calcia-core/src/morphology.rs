//! Binary dilation and erosion on boolean arrays of arbitrary dimension.
//!
//! Used on the validity bitmaps produced by registration. Out-of-bounds
//! neighbors are treated as background, so erosion strips pixels whose
//! footprint extends past the border.

use ndarray::{ArrayD, Dimension, IxDyn};

use crate::error::{CalciaError, Result};

/// A filled hypercube footprint of the given side length.
pub fn box_footprint(ndim: usize, size: usize) -> ArrayD<bool> {
    ArrayD::from_elem(IxDyn(&vec![size; ndim]), true)
}

/// Binary dilation: a site becomes true if any site under the centered
/// footprint is true.
pub fn binary_dilation(input: &ArrayD<bool>, footprint: &ArrayD<bool>) -> Result<ArrayD<bool>> {
    let offsets = footprint_offsets(input, footprint)?;
    Ok(apply(input, &offsets, |hits, _oob| hits > 0))
}

/// Binary erosion: a site stays true only if every site under the centered
/// footprint is true.
pub fn binary_erosion(input: &ArrayD<bool>, footprint: &ArrayD<bool>) -> Result<ArrayD<bool>> {
    let offsets = footprint_offsets(input, footprint)?;
    let count = offsets.len();
    Ok(apply(input, &offsets, move |hits, oob| {
        oob == 0 && hits == count
    }))
}

fn apply<F>(input: &ArrayD<bool>, offsets: &[Vec<isize>], keep: F) -> ArrayD<bool>
where
    F: Fn(usize, usize) -> bool,
{
    let shape = input.shape().to_vec();
    let mut out = ArrayD::<bool>::from_elem(IxDyn(&shape), false);
    let mut probe = vec![0usize; shape.len()];
    for (idx, value) in out.indexed_iter_mut() {
        let mut hits = 0usize;
        let mut oob = 0usize;
        'offsets: for offset in offsets {
            for d in 0..shape.len() {
                let p = idx[d] as isize + offset[d];
                if p < 0 || p >= shape[d] as isize {
                    oob += 1;
                    continue 'offsets;
                }
                probe[d] = p as usize;
            }
            if input[probe.as_slice()] {
                hits += 1;
            }
        }
        *value = keep(hits, oob);
    }
    out
}

/// Offsets of the footprint's true cells relative to its center.
fn footprint_offsets(input: &ArrayD<bool>, footprint: &ArrayD<bool>) -> Result<Vec<Vec<isize>>> {
    if footprint.ndim() != input.ndim() {
        return Err(CalciaError::FootprintMismatch {
            footprint_ndim: footprint.ndim(),
            ndim: input.ndim(),
        });
    }
    let center: Vec<isize> = footprint.shape().iter().map(|&l| (l / 2) as isize).collect();
    Ok(footprint
        .indexed_iter()
        .filter(|(_, &v)| v)
        .map(|(idx, _)| {
            idx.slice()
                .iter()
                .zip(&center)
                .map(|(&i, &c)| i as isize - c)
                .collect()
        })
        .collect())
}
