use ndarray::{array, Array2};

use calcia_core::error::CalciaError;
use calcia_core::io::{load_frame, load_stack_dir, save_png, save_shifts, save_tiff};

#[test]
fn test_png_roundtrip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("frame.png");

    let frame = Array2::from_shape_fn((8, 6), |(r, c)| (r * 6 + c) as f32 / 47.0);
    save_png(frame.view(), &path).unwrap();
    let loaded = load_frame(&path).unwrap();

    assert_eq!(loaded.dim(), (8, 6));
    for (orig, read) in frame.iter().zip(loaded.iter()) {
        assert!(
            (orig - read).abs() < 0.005,
            "8-bit roundtrip drifted: {orig} vs {read}"
        );
    }
}

#[test]
fn test_tiff_roundtrip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("frame.tiff");

    let frame = Array2::from_shape_fn((5, 9), |(r, c)| (r as f32 * 0.1 + c as f32 * 0.02).fract());
    save_tiff(frame.view(), &path).unwrap();
    let loaded = load_frame(&path).unwrap();

    for (orig, read) in frame.iter().zip(loaded.iter()) {
        assert!((orig - read).abs() < 1e-4);
    }
}

#[test]
fn test_load_stack_dir_orders_by_name() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let bright = Array2::from_elem((4, 4), 1.0f32);
    let dark = Array2::from_elem((4, 4), 0.0f32);
    // Written out of order; loading must sort by file name.
    save_png(dark.view(), &dir.path().join("frame_001.png")).unwrap();
    save_png(bright.view(), &dir.path().join("frame_000.png")).unwrap();

    let stack = load_stack_dir(dir.path()).unwrap();
    assert_eq!(stack.num_frames(), 2);
    assert!(stack.frame(0).iter().all(|&v| v > 0.9));
    assert!(stack.frame(1).iter().all(|&v| v < 0.1));
}

#[test]
fn test_load_stack_dir_rejects_mixed_shapes() {
    let dir = tempfile::tempdir().expect("create temp dir");
    save_png(Array2::<f32>::zeros((4, 4)).view(), &dir.path().join("a.png")).unwrap();
    save_png(Array2::<f32>::zeros((4, 5)).view(), &dir.path().join("b.png")).unwrap();

    assert!(matches!(
        load_stack_dir(dir.path()),
        Err(CalciaError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_load_stack_dir_requires_frames() {
    let dir = tempfile::tempdir().expect("create temp dir");
    assert!(matches!(
        load_stack_dir(dir.path()),
        Err(CalciaError::EmptySequence)
    ));
}

#[test]
fn test_save_shifts_as_json_rows() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("shifts.json");

    let shifts = array![[0i64, 0], [1, -2]];
    save_shifts(&shifts, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<Vec<i64>> = serde_json::from_str(&text).unwrap();
    assert_eq!(rows, vec![vec![0, 0], vec![1, -2]]);
}
