//! Correlation-function estimation and time-window partitioning.
//!
//! Purpose
//! -------
//! Turn preprocessed fields into the correlation functions the fit engines
//! consume:
//!
//! - the spectral (Wiener–Khinchin) perpendicular estimator,
//!   `C(Δx, Δy) = IFFT2(|f(kx, ky)|²)` per time sample, which avoids an
//!   explicit O(N²) spatial sum because the field is already spectral;
//! - direct convolution-based correlation for the time and parallel
//!   paths, where inputs are real-space signals;
//! - the [`windows::TimeWindowSplitter`] that partitions the time axis
//!   into fixed-length, non-overlapping windows for per-window statistics.
//!
//! Conventions
//! -----------
//! - Correlation functions are normalized by their zero-separation value
//!   so peak heights are comparable across windows and fits stay
//!   well-conditioned.
//! - Direct correlation follows the full 2N−1 output convention with the
//!   zero-separation sample at index N−1 (derived from the convolution
//!   identity, not assumed from the array midpoint).
pub mod estimator;
pub mod windows;

pub use estimator::{
    correlate_full, parallel_correlation, perp_correlation, time_correlation,
};
pub use windows::{TimeWindow, TimeWindowSplitter};
