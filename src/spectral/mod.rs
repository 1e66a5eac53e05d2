//! Spectral transforms between (kx, ky) and real space.
//!
//! Purpose
//! -------
//! Convert spectral field slices into real-space slices through a 2D
//! inverse Fourier transform, batched over all non-spectral axes, and
//! provide the FFT building blocks the Wiener–Khinchin correlation
//! estimator composes directly.
//!
//! Key behaviors
//! -------------
//! - [`transform::fft2`] / [`transform::ifft2`]: unitary round trip,
//!   `ifft2(fft2(x)) == x` to floating-point tolerance.
//! - [`transform::hermitian_extend`]: reconstruct the negative-ky half of
//!   the spectrum from the stored half spectrum of a real field.
//! - [`transform::SpectralTransform`]: per-time-slice batched transforms
//!   and the cached real-space field used by all time-window operations.
//!
//! Conventions
//! -----------
//! - Transforms over different time samples are independent and run in
//!   parallel; nothing here touches fit state.
//! - Degenerate spectral axes (length <= 1) are rejected with
//!   [`crate::field::FieldError::InsufficientResolution`].
pub mod transform;

pub use transform::{fft2, fftshift2, hermitian_extend, ifft2, RealSpaceField, SpectralTransform};
