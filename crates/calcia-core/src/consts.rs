/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Fewest spatial axes a frame stack may have (yx).
pub const MIN_SPATIAL_DIMS: usize = 2;

/// Most spatial axes a frame stack may have (zyx).
pub const MAX_SPATIAL_DIMS: usize = 3;

/// Binomial B3 spline 1D kernel coefficients: [1, 4, 6, 4, 1] / 16.
/// Row 4 of Pascal's triangle normalized on the L1 norm.
pub const B3_KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];
