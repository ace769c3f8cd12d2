use ndarray::array;

use calcia_core::register::roll::{roll, roll_masked};

#[test]
fn test_roll_forward_wraps_circularly() {
    let frame = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
    let rolled = roll(frame.view(), &[0, 1]);
    assert_eq!(rolled, array![[3.0f32, 1.0, 2.0], [6.0, 4.0, 5.0]].into_dyn());
}

#[test]
fn test_roll_negative_shift() {
    let frame = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
    let rolled = roll(frame.view(), &[-1, 0]);
    assert_eq!(rolled, array![[4.0f32, 5.0, 6.0], [1.0, 2.0, 3.0]].into_dyn());
}

#[test]
fn test_roll_full_period_is_identity() {
    let frame = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
    assert_eq!(roll(frame.view(), &[2, 3]), frame);
    assert_eq!(roll(frame.view(), &[-2, -3]), frame);
}

#[test]
fn test_roll_masked_marks_wrapped_region() {
    let frame = array![
        [1.0f32, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 10.0, 11.0, 12.0]
    ]
    .into_dyn();
    let (rolled, mask) = roll_masked(frame.view(), &[1, -2]);

    // Row 0 wrapped in from the bottom edge, the last two columns from the
    // left edge.
    for c in 0..4 {
        assert!(mask[[0, c]], "row 0 col {c} should be invalid");
    }
    for r in 0..3 {
        assert!(mask[[r, 2]] && mask[[r, 3]], "row {r} cols 2..4 should be invalid");
    }
    assert!(!mask[[1, 0]] && !mask[[1, 1]]);
    assert!(!mask[[2, 0]] && !mask[[2, 1]]);

    // The data itself still rolls circularly underneath the mask.
    assert_eq!(rolled[[1, 0]], 3.0);
    assert_eq!(rolled[[1, 1]], 4.0);
    assert_eq!(rolled[[2, 0]], 7.0);
}

#[test]
fn test_roll_masked_zero_shift_is_fully_valid() {
    let frame = array![[1.0f32, 2.0], [3.0, 4.0]].into_dyn();
    let (rolled, mask) = roll_masked(frame.view(), &[0, 0]);
    assert_eq!(rolled, frame);
    assert!(mask.iter().all(|&m| !m));
}

#[test]
fn test_roll_masked_volumetric() {
    let frame = ndarray::ArrayD::from_shape_fn(ndarray::IxDyn(&[3, 3, 3]), |idx| {
        (idx[0] * 9 + idx[1] * 3 + idx[2]) as f32
    });
    let (rolled, mask) = roll_masked(frame.view(), &[0, 1, 0]);

    assert_eq!(rolled[[0, 0, 0]], frame[[0, 2, 0]]);
    assert_eq!(rolled[[2, 1, 2]], frame[[2, 0, 2]]);
    for z in 0..3 {
        for x in 0..3 {
            assert!(mask[[z, 0, x]]);
            assert!(!mask[[z, 1, x]] && !mask[[z, 2, x]]);
        }
    }
}
