pub mod fft;
pub mod offsets;
pub mod roll;

mod correlate;
mod mean_offsets;

pub use correlate::{find_offset, find_offsets};
pub use mean_offsets::{register_mean_offsets, Registration, RegistrationParams};
