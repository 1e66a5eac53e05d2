//! The spectral field and its coordinate axes.
//!
//! Purpose
//! -------
//! Hold one reduced field f(t, kx, ky) — species and parallel indices have
//! already been applied by the external data source — together with its
//! wavenumber and time axes, and provide the preprocessing the analysis
//! pipeline applies before correlating: scale zeroing, regular-grid time
//! resampling, and time-range truncation.
//!
//! Conventions
//! -----------
//! - Axis order is fixed: (time, kx, ky), matching every downstream
//!   operation. The ky axis is a half spectrum (ky >= 0); negative ky
//!   modes are implied by the reality of the underlying field.
//! - kx follows the FFT layout 0, ..., kx_max, -kx_max, ..., kx_min, so
//!   kx[1] is the smallest positive radial wavenumber.
//! - Real-space grids are derived, not stored: x spans ±2π/kx[1] (scaled
//!   by ρ_ref, in metres) over nkx points, y spans ±2π/ky[1] (scaled by
//!   ρ_ref·tan(pitch_angle)) over 2·nky − 1 points, so zero separation
//!   sits exactly at the centre index.
use interp1d::Interp1d;
use ndarray::{Array1, Array3, s};
use num_complex::Complex64;

use crate::field::errors::{FieldError, FieldResult};

/// A complex spectral field over (time, kx, ky) with coordinate axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    data: Array3<Complex64>,
    kx: Array1<f64>,
    ky: Array1<f64>,
    t: Array1<f64>,
}

impl Field {
    /// Build a field from raw data and axes, validating the invariants the
    /// rest of the pipeline relies on.
    ///
    /// # Errors
    /// - [`FieldError::InsufficientResolution`] when a spectral axis has
    ///   fewer than 2 points.
    /// - [`FieldError::AxisLengthMismatch`] when an axis does not pair 1:1
    ///   with its array dimension.
    /// - [`FieldError::NonMonotonicTimeAxis`] when the time axis is not
    ///   strictly increasing.
    pub fn new(
        data: Array3<Complex64>, t: Array1<f64>, kx: Array1<f64>, ky: Array1<f64>,
    ) -> FieldResult<Self> {
        let (nt, nkx, nky) = data.dim();
        for (axis, expected, found) in [
            ("time", nt, t.len()),
            ("kx", nkx, kx.len()),
            ("ky", nky, ky.len()),
        ] {
            if expected != found {
                return Err(FieldError::AxisLengthMismatch { axis, expected, found });
            }
        }
        for (axis, len) in [("kx", nkx), ("ky", nky)] {
            if len <= 1 {
                return Err(FieldError::InsufficientResolution { axis, len });
            }
        }
        for i in 1..nt {
            if t[i] <= t[i - 1] {
                return Err(FieldError::NonMonotonicTimeAxis { index: i });
            }
        }
        Ok(Field { data, kx, ky, t })
    }

    pub fn data(&self) -> &Array3<Complex64> {
        &self.data
    }

    pub fn t(&self) -> &Array1<f64> {
        &self.t
    }

    pub fn kx(&self) -> &Array1<f64> {
        &self.kx
    }

    pub fn ky(&self) -> &Array1<f64> {
        &self.ky
    }

    pub fn nt(&self) -> usize {
        self.t.len()
    }

    pub fn nkx(&self) -> usize {
        self.kx.len()
    }

    pub fn nky(&self) -> usize {
        self.ky.len()
    }

    /// Number of real-space y points after Hermitian extension of the ky
    /// half spectrum: 2·nky − 1 (odd, so Δy = 0 has a grid point).
    pub fn ny(&self) -> usize {
        2 * self.nky() - 1
    }

    /// Radial real-space grid in metres, spanning ±2π/kx[1] · ρ_ref.
    pub fn x_grid(&self, rho_ref: f64) -> Array1<f64> {
        let half = 2.0 * std::f64::consts::PI / self.kx[1] * rho_ref;
        Array1::linspace(-half, half, self.nkx())
    }

    /// Poloidal real-space grid in metres, spanning ±2π/ky[1] · ρ_ref ·
    /// tan(pitch_angle). The tangent maps the toroidal output plane onto
    /// the poloidal plane the diagnostics live in.
    pub fn y_grid(&self, rho_ref: f64, pitch_angle: f64) -> Array1<f64> {
        let half = 2.0 * std::f64::consts::PI / self.ky[1] * rho_ref * pitch_angle.tan();
        Array1::linspace(-half, half, self.ny())
    }

    /// Zero modes on scales larger than the BES viewing area.
    ///
    /// The BES diagnostic covers roughly 160 × 80 mm (radial × poloidal),
    /// so modes with |kx| < 0.25 and ky < 0.5 (normalized units, k = 2π/L)
    /// carry structure the instrument cannot see.
    pub fn zero_bes_scales(&mut self) {
        for (i, &kx) in self.kx.iter().enumerate() {
            for (j, &ky) in self.ky.iter().enumerate() {
                if kx.abs() < 0.25 && ky < 0.5 {
                    self.data.slice_mut(s![.., i, j]).fill(Complex64::new(0.0, 0.0));
                }
            }
        }
    }

    /// Zero the zonal-flow (ky = 0) modes.
    pub fn zero_zf_scales(&mut self) {
        self.data.slice_mut(s![.., .., 0]).fill(Complex64::new(0.0, 0.0));
    }

    /// Truncate to the half-open sample range `[start, end)` of the time
    /// axis. Range validity is checked by configuration validation before
    /// the pipeline runs.
    pub fn slice_time(&self, start: usize, end: usize) -> Field {
        Field {
            data: self.data.slice(s![start..end, .., ..]).to_owned(),
            kx: self.kx.clone(),
            ky: self.ky.clone(),
            t: self.t.slice(s![start..end]).to_owned(),
        }
    }

    /// Resample the field onto a regular time grid with `fac × nt` points.
    ///
    /// Simulation output is rarely equally spaced in time; spectral
    /// operations along the time axis require a regular grid. Each (kx, ky)
    /// mode is linearly interpolated, real and imaginary parts separately,
    /// onto `linspace(t_min, t_max, fac·nt)`.
    ///
    /// # Errors
    /// [`FieldError::Interpolation`] if an interpolant cannot be built.
    pub fn interpolate_time(&self, fac: usize) -> FieldResult<Field> {
        let nt_new = self.nt() * fac;
        let t_reg = Array1::linspace(self.t[0], self.t[self.nt() - 1], nt_new);
        let (_, nkx, nky) = self.data.dim();
        let mut data = Array3::<Complex64>::zeros((nt_new, nkx, nky));
        let t_vec = self.t.to_vec();

        for i in 0..nkx {
            for j in 0..nky {
                let re: Vec<f64> = self.data.slice(s![.., i, j]).iter().map(|c| c.re).collect();
                let im: Vec<f64> = self.data.slice(s![.., i, j]).iter().map(|c| c.im).collect();
                let interp_re = Interp1d::new_unsorted(t_vec.clone(), re)
                    .map_err(|_| FieldError::Interpolation { reason: "real part" })?;
                let interp_im = Interp1d::new_unsorted(t_vec.clone(), im)
                    .map_err(|_| FieldError::Interpolation { reason: "imaginary part" })?;
                for (it, &tv) in t_reg.iter().enumerate() {
                    data[[it, i, j]] =
                        Complex64::new(interp_re.interpolate(tv), interp_im.interpolate(tv));
                }
            }
        }
        Ok(Field { data, kx: self.kx.clone(), ky: self.ky.clone(), t: t_reg })
    }
}
