use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::register::RegistrationParams;
use crate::wavelet::WaveletParams;

/// Parameters for a full preprocessing run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineParams {
    #[serde(default)]
    pub registration: RegistrationParams,
    /// Wavelet stage; omitted means registration only.
    pub wavelet: Option<WaveletParams>,
}

/// Read a JSON parameter file.
///
/// No validation beyond what parsing itself performs: a malformed file
/// surfaces as a `Config` error propagated to the caller.
pub fn load_params(path: &Path) -> Result<PipelineParams> {
    debug!(path = %path.display(), "reading parameter file");
    let file = File::open(path)?;
    let params = serde_json::from_reader(BufReader::new(file))?;
    Ok(params)
}
