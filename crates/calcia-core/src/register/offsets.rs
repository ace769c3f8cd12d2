//! Integer arithmetic on shift vectors over the torus defined by the frame
//! shape.

use ndarray::{Array1, Array2};

/// Wrap a single offset component onto the shortest equivalent roll for an
/// axis of length `len`.
///
/// The result lies in `(-len/2, len/2]`: an offset of `len - 1` becomes `-1`,
/// and for even `len` the exact half-length offset is a fixed point.
pub fn wrap_component(value: i64, len: usize) -> i64 {
    let len = len as i64;
    let r = value.rem_euclid(len);
    if 2 * r > len {
        r - len
    } else {
        r
    }
}

/// Normalize every shift vector to its shortest wraparound-equivalent
/// representative, in place.
pub fn shortest_wraparound(shifts: &mut Array2<i64>, shape: &[usize]) {
    for mut row in shifts.rows_mut() {
        for (v, &len) in row.iter_mut().zip(shape) {
            *v = wrap_component(*v, len);
        }
    }
}

/// Subtract `center` from every shift vector, in place.
pub fn relative_offsets(shifts: &mut Array2<i64>, center: &Array1<i64>) {
    for mut row in shifts.rows_mut() {
        for (v, &c) in row.iter_mut().zip(center.iter()) {
            *v -= c;
        }
    }
}

/// Per-axis mean of the shift vectors, rounded to the nearest integer.
pub fn rounded_mean(shifts: &Array2<i64>) -> Array1<i64> {
    let n = shifts.nrows().max(1) as f64;
    let mut mean = Array1::<i64>::zeros(shifts.ncols());
    for (d, m) in mean.iter_mut().enumerate() {
        let sum: i64 = shifts.column(d).sum();
        *m = (sum as f64 / n).round() as i64;
    }
    mean
}
