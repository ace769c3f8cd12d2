use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use ndarray::{Array2, ArrayView2};

use crate::error::{CalciaError, Result};
use crate::stack::FrameStack;

/// Load a sorted directory of grayscale images as a frame stack.
///
/// Files are ordered by name; every frame must share the same shape.
pub fn load_stack_dir(dir: &Path) -> Result<FrameStack> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("png" | "tif" | "tiff")
            )
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CalciaError::EmptySequence);
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        frames.push(load_frame(path)?);
    }
    FrameStack::from_frames(&frames)
}

/// Load a grayscale image file into a 2D array with values in [0.0, 1.0].
pub fn load_frame(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Ok(data)
}

/// Save a frame as 16-bit grayscale TIFF.
pub fn save_tiff(frame: ArrayView2<'_, f32>, path: &Path) -> Result<()> {
    let (h, w) = frame.dim();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            let val = (frame[[row, col]].clamp(0.0, 1.0) * 65535.0) as u16;
            pixels.push(val);
        }
    }

    let img = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .expect("buffer size matches dimensions");
    img.save(path)?;
    Ok(())
}

/// Save a frame as 8-bit grayscale PNG.
pub fn save_png(frame: ArrayView2<'_, f32>, path: &Path) -> Result<()> {
    let (h, w) = frame.dim();

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let val = (frame[[row, col]].clamp(0.0, 1.0) * 255.0) as u8;
            img.put_pixel(col as u32, row as u32, Luma([val]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a frame, choosing format from the file extension.
pub fn save_image(frame: ArrayView2<'_, f32>, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(frame, path),
        Some("png") => save_png(frame, path),
        _ => save_tiff(frame, path),
    }
}

/// Save shift vectors as JSON, one row per frame.
pub fn save_shifts(shifts: &ndarray::Array2<i64>, path: &Path) -> Result<()> {
    let rows: Vec<Vec<i64>> = shifts.rows().into_iter().map(|r| r.to_vec()).collect();
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}
