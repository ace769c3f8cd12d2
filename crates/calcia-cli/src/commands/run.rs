use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ndarray::Axis;

use calcia_core::config::load_params;
use calcia_core::io::{load_stack_dir, save_shifts};
use calcia_core::wavelet::wavelet_transform;

use super::register::{register_stack, write_frames};
use super::wavelet::write_layers;

#[derive(Args)]
pub struct RunArgs {
    /// JSON parameter file
    pub config: PathBuf,

    /// Directory of grayscale frames (png/tif), ordered by file name
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let params = load_params(&args.config)?;
    let stack = load_stack_dir(&args.input)?;
    println!(
        "Processing {} frames of shape {:?}",
        stack.num_frames(),
        stack.spatial_shape()
    );

    let registration = register_stack(&stack, &params.registration)?;

    let frames_dir = args.output.join("registered");
    std::fs::create_dir_all(&frames_dir)?;
    write_frames(&registration, &frames_dir)?;
    save_shifts(&registration.shifts, &args.output.join("shifts.json"))?;

    if let Some(wavelet) = &params.wavelet {
        // Decompose the consensus projection of the registered stack; invalid
        // sites enter as zero.
        let filled = registration.frames.filled();
        let mean = filled.sum_axis(Axis(0)) / stack.num_frames() as f32;
        let decomposition = wavelet_transform(&mean, &wavelet.scale)?;

        let wavelet_dir = args.output.join("wavelet");
        std::fs::create_dir_all(&wavelet_dir)?;
        write_layers(&decomposition, &wavelet_dir)?;
    }

    println!("Pipeline output written to {}", args.output.display());
    Ok(())
}
