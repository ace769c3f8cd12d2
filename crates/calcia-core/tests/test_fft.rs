use ndarray::{ArrayD, IxDyn};
use num_complex::Complex;

use calcia_core::register::fft::{
    forward_frame, forward_frames, inverse_frame, inverse_frames, phase_ramp,
};
use calcia_core::register::roll::roll;

fn test_frame(shape: &[usize]) -> ArrayD<f32> {
    let strides: Vec<usize> = (0..shape.len())
        .map(|d| shape[d + 1..].iter().product::<usize>())
        .collect();
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let flat: usize = (0..shape.len()).map(|d| idx[d] * strides[d]).sum();
        (flat as f32 * 0.37).sin() + 0.1 * flat as f32
    })
}

fn to_complex(frame: &ArrayD<f32>) -> ArrayD<Complex<f64>> {
    frame.mapv(|v| Complex::new(v as f64, 0.0))
}

#[test]
fn test_forward_inverse_roundtrip() {
    let frame = test_frame(&[5, 6]);
    let mut freq = to_complex(&frame);
    forward_frame(&mut freq.view_mut());
    inverse_frame(&mut freq.view_mut());

    for (orig, out) in frame.iter().zip(freq.iter()) {
        assert!(
            (out.re - *orig as f64).abs() < 1e-9,
            "roundtrip mismatch: {} vs {}",
            orig,
            out.re
        );
        assert!(out.im.abs() < 1e-9, "imaginary residue {}", out.im);
    }
}

#[test]
fn test_blockwise_roundtrip_matches_per_frame() {
    let frame = test_frame(&[6, 4, 5]);
    let mut block = to_complex(&frame);
    forward_frames(&mut block.view_mut());
    inverse_frames(&mut block.view_mut());

    for (orig, out) in frame.iter().zip(block.iter()) {
        assert!((out.re - *orig as f64).abs() < 1e-9);
        assert!(out.im.abs() < 1e-9);
    }
}

#[test]
fn test_phase_ramp_is_frequency_domain_roll() {
    let frame = test_frame(&[5, 8]);
    let shift = [2i64, -3];

    let mut freq = to_complex(&frame);
    forward_frame(&mut freq.view_mut());
    let ramp = phase_ramp(&shift, &[5, 8]);
    freq.zip_mut_with(&ramp, |v, &r| *v *= r);
    inverse_frame(&mut freq.view_mut());

    let expected = roll(frame.view(), &shift);
    for (e, out) in expected.iter().zip(freq.iter()) {
        assert!(
            (out.re - *e as f64).abs() < 1e-6,
            "phase-shifted frame should equal the rolled frame: {} vs {}",
            e,
            out.re
        );
    }
}

#[test]
fn test_phase_ramp_zero_shift_is_unity() {
    let ramp = phase_ramp(&[0, 0], &[4, 4]);
    for v in ramp.iter() {
        assert!((v.re - 1.0).abs() < 1e-12 && v.im.abs() < 1e-12);
    }
}
