use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use ndarray::{ArrayD, Ix2};

use calcia_core::io::{load_frame, save_image};
use calcia_core::wavelet::{wavelet_transform, Scale, WaveletDecomposition};

#[derive(Args)]
pub struct WaveletArgs {
    /// Input grayscale image
    pub input: PathBuf,

    /// Decomposition depth
    #[arg(long, default_value = "5")]
    pub scale: usize,

    /// Output directory for detail layers and residual
    #[arg(short, long, default_value = "wavelet")]
    pub output: PathBuf,
}

pub fn run(args: &WaveletArgs) -> Result<()> {
    let frame = load_frame(&args.input)?.into_dyn();
    let decomposition = wavelet_transform(&frame, &Scale::Uniform(args.scale))?;

    std::fs::create_dir_all(&args.output)?;
    write_layers(&decomposition, &args.output)?;

    println!(
        "Wrote {} detail layers and residual to {}",
        decomposition.details.len(),
        args.output.display()
    );
    Ok(())
}

pub fn write_layers(decomposition: &WaveletDecomposition, output: &Path) -> Result<()> {
    for (i, detail) in decomposition.details.iter().enumerate() {
        save_layer(detail, &output.join(format!("detail_{i}.png")), true)?;
    }
    save_layer(&decomposition.residual, &output.join("residual.png"), false)
}

/// Detail layers are signed; remap them around mid-gray for viewing.
fn save_layer(layer: &ArrayD<f32>, path: &Path, signed: bool) -> Result<()> {
    let vis = if signed {
        layer.mapv(|v| v + 0.5)
    } else {
        layer.clone()
    };
    let view = vis.view().into_dimensionality::<Ix2>()?;
    save_image(view, path)?;
    Ok(())
}
