use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Axis, Ix2};

use calcia_core::io::{load_stack_dir, save_image, save_shifts};
use calcia_core::register::{register_mean_offsets, Registration, RegistrationParams};
use calcia_core::stack::FrameStack;

#[derive(Args)]
pub struct RegisterArgs {
    /// Directory of grayscale frames (png/tif), ordered by file name
    pub input: PathBuf,

    /// Maximum iterations before accepting the current estimate
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Frames Fourier-transformed and correlated per block
    #[arg(long)]
    pub block_frames: Option<usize>,

    /// Output directory for registered frames
    #[arg(short, long, default_value = "registered")]
    pub output: PathBuf,

    /// Write per-frame shift vectors to this JSON file
    #[arg(long)]
    pub shifts: Option<PathBuf>,
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let stack = load_stack_dir(&args.input)?;
    tracing::debug!(
        frames = stack.num_frames(),
        spatial = ?stack.spatial_shape(),
        "stack loaded"
    );
    println!(
        "Registering {} frames of shape {:?}",
        stack.num_frames(),
        stack.spatial_shape()
    );

    let params = RegistrationParams {
        max_iters: args.max_iters,
        block_frames: args.block_frames,
    };
    let registration = register_stack(&stack, &params)?;

    std::fs::create_dir_all(&args.output)?;
    write_frames(&registration, &args.output)?;

    if let Some(path) = &args.shifts {
        save_shifts(&registration.shifts, path)?;
        println!("Wrote shift vectors to {}", path.display());
    }

    println!(
        "Wrote {} registered frames to {} ({:.1}% masked)",
        registration.shifts.nrows(),
        args.output.display(),
        100.0 * registration.frames.masked_fraction()
    );
    Ok(())
}

pub fn register_stack(stack: &FrameStack, params: &RegistrationParams) -> Result<Registration> {
    let registration = register_mean_offsets(stack, params)?;
    if !registration.converged {
        println!(
            "Iteration cap reached after {} iterations; shifts may not be final",
            registration.iterations
        );
    }
    Ok(registration)
}

pub fn write_frames(registration: &Registration, output: &Path) -> Result<()> {
    let filled = registration.frames.filled();
    let total = filled.len_of(Axis(0));
    let bar = ProgressBar::new(total as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} frames",
    )?);

    for (k, frame) in filled.axis_iter(Axis(0)).enumerate() {
        let frame = frame.into_dimensionality::<Ix2>()?;
        save_image(frame, &output.join(format!("frame_{k:05}.png")))?;
        bar.inc(1);
    }
    bar.finish();
    Ok(())
}
