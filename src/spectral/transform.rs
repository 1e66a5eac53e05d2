//! 2D FFT plumbing and the batched spectral-to-real-space transform.
use std::sync::Arc;

use ndarray::{Array1, Array2, Array3, ArrayView2, Axis, Zip};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::field::data::Field;
use crate::field::errors::{FieldError, FieldResult};

/// Apply `fft` along every lane of `axis`.
///
/// rustfft operates on contiguous buffers, so each lane is gathered,
/// transformed, and scattered back.
fn transform_lanes(a: &mut Array2<Complex64>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    for mut lane in a.lanes_mut(axis) {
        let mut buf: Vec<Complex64> = lane.to_vec();
        fft.process(&mut buf);
        for (dst, src) in lane.iter_mut().zip(buf) {
            *dst = src;
        }
    }
}

/// Forward 2D FFT, unnormalized (matching the usual FFT convention).
pub fn fft2(a: &Array2<Complex64>) -> Array2<Complex64> {
    let (n0, n1) = a.dim();
    let mut planner = FftPlanner::new();
    let mut out = a.clone();
    transform_lanes(&mut out, Axis(0), &planner.plan_fft_forward(n0));
    transform_lanes(&mut out, Axis(1), &planner.plan_fft_forward(n1));
    out
}

/// Inverse 2D FFT, scaled by 1/(n0·n1) so that `ifft2(fft2(x)) == x`.
pub fn ifft2(a: &Array2<Complex64>) -> Array2<Complex64> {
    let (n0, n1) = a.dim();
    let mut planner = FftPlanner::new();
    let mut out = a.clone();
    transform_lanes(&mut out, Axis(0), &planner.plan_fft_inverse(n0));
    transform_lanes(&mut out, Axis(1), &planner.plan_fft_inverse(n1));
    let scale = 1.0 / (n0 * n1) as f64;
    out.mapv_inplace(|c| c * scale);
    out
}

/// Reconstruct the full ky spectrum of a real field from its half
/// spectrum.
///
/// The stored field keeps only ky >= 0. For a real field the missing modes
/// follow from Hermitian symmetry, `f(-kx, -ky) = conj(f(kx, ky))`: the
/// output has 2·nky − 1 columns in standard FFT order, where column
/// `2·nky − 1 − j` holds the ky = −ky[j] mode.
pub fn hermitian_extend(half: ArrayView2<'_, Complex64>) -> Array2<Complex64> {
    let (nkx, nky) = half.dim();
    let nyf = 2 * nky - 1;
    let mut full = Array2::<Complex64>::zeros((nkx, nyf));
    full.slice_mut(ndarray::s![.., ..nky]).assign(&half);
    for i in 0..nkx {
        let neg_i = (nkx - i) % nkx;
        for j in 1..nky {
            full[[i, nyf - j]] = half[[neg_i, j]].conj();
        }
    }
    full
}

/// Shift the zero-frequency/zero-separation sample to the array centre.
///
/// Index (0, 0) moves to (n0/2, n1/2); for the odd-length separation axes
/// used by the correlation functions that is exactly the middle sample.
pub fn fftshift2(a: &Array2<f64>) -> Array2<f64> {
    let (n0, n1) = a.dim();
    let mut out = Array2::zeros((n0, n1));
    for ((i, j), &v) in a.indexed_iter() {
        out[[(i + n0 / 2) % n0, (j + n1 / 2) % n1]] = v;
    }
    out
}

/// A real-space field f(t, x, y), cached once and reused by every
/// time-window operation.
#[derive(Debug, Clone)]
pub struct RealSpaceField {
    pub data: Array3<f64>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub t: Array1<f64>,
}

/// Batched spectral-to-real-space transform for one field geometry.
#[derive(Debug, Clone, Copy)]
pub struct SpectralTransform {
    nkx: usize,
    nky: usize,
}

impl SpectralTransform {
    /// Build a transform for the given spectral axis lengths.
    ///
    /// # Errors
    /// [`FieldError::InsufficientResolution`] when either axis is
    /// degenerate (length <= 1): no 2D transform is defined over it.
    pub fn new(nkx: usize, nky: usize) -> FieldResult<Self> {
        for (axis, len) in [("kx", nkx), ("ky", nky)] {
            if len <= 1 {
                return Err(FieldError::InsufficientResolution { axis, len });
            }
        }
        Ok(SpectralTransform { nkx, nky })
    }

    pub fn for_field(field: &Field) -> FieldResult<Self> {
        SpectralTransform::new(field.nkx(), field.nky())
    }

    /// Transform one spectral slice f(kx, ky) into real space f(x, y).
    ///
    /// The half spectrum is Hermitian-extended along ky first, so the
    /// result of the inverse transform is real up to rounding; the
    /// imaginary part is dropped. Output shape is (nkx, 2·nky − 1).
    pub fn to_real_space(&self, spec: ArrayView2<'_, Complex64>) -> Array2<f64> {
        ifft2(&hermitian_extend(spec)).mapv(|c| c.re)
    }

    /// Transform every time sample of `field` into real space.
    ///
    /// Time samples are independent, so the batch runs in parallel. The
    /// result is the cached `field_real_space(t, x, y)` derived quantity;
    /// compute it once and share it across all windows.
    pub fn real_space_field(
        &self, field: &Field, rho_ref: f64, pitch_angle: f64,
    ) -> RealSpaceField {
        let mut data = Array3::<f64>::zeros((field.nt(), self.nkx, 2 * self.nky - 1));
        Zip::from(data.outer_iter_mut())
            .and(field.data().outer_iter())
            .par_for_each(|mut out, spec| out.assign(&self.to_real_space(spec)));
        RealSpaceField {
            data,
            x: field.x_grid(rho_ref),
            y: field.y_grid(rho_ref, pitch_angle),
            t: field.t().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};

    #[test]
    // ifft2 undoes fft2 to floating-point tolerance.
    fn fft2_ifft2_round_trip() {
        let a = array![
            [Complex64::new(1.0, 0.5), Complex64::new(-2.0, 0.0), Complex64::new(0.3, 1.0)],
            [Complex64::new(0.0, -1.0), Complex64::new(4.0, 2.0), Complex64::new(-0.7, 0.2)],
        ];
        let back = ifft2(&fft2(&a));
        for (orig, rt) in a.iter().zip(back.iter()) {
            assert_relative_eq!(orig.re, rt.re, epsilon = 1e-12);
            assert_relative_eq!(orig.im, rt.im, epsilon = 1e-12);
        }
    }

    #[test]
    // A pure DC spectrum transforms to a constant real-space slice.
    fn dc_spectrum_gives_constant_slice() {
        let mut spec = Array2::<Complex64>::zeros((4, 3));
        spec[[0, 0]] = Complex64::new(20.0, 0.0);
        let transform = SpectralTransform::new(4, 3).unwrap();
        let real = transform.to_real_space(spec.view());
        assert_eq!(real.dim(), (4, 5));
        for &v in real.iter() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    // Hermitian extension makes the inverse transform real. The ky = 0
    // column must itself be Hermitian in kx, as it is for a real field.
    fn hermitian_extension_yields_real_output() {
        let spec = array![
            [Complex64::new(1.0, 0.0), Complex64::new(0.4, -0.3)],
            [Complex64::new(0.2, 0.7), Complex64::new(-1.1, 0.9)],
            [Complex64::new(0.2, -0.7), Complex64::new(0.5, 0.1)],
        ];
        let full = hermitian_extend(spec.view());
        assert_eq!(full.dim(), (3, 3));
        // kx rows must pair up under conjugation for the extended columns.
        assert_eq!(full[[1, 2]], spec[[2, 1]].conj());
        assert_eq!(full[[0, 2]], spec[[0, 1]].conj());

        let real = ifft2(&full);
        for c in real.iter() {
            assert_relative_eq!(c.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_axes_are_rejected() {
        assert_eq!(
            SpectralTransform::new(1, 8).unwrap_err(),
            FieldError::InsufficientResolution { axis: "kx", len: 1 }
        );
        assert_eq!(
            SpectralTransform::new(8, 1).unwrap_err(),
            FieldError::InsufficientResolution { axis: "ky", len: 1 }
        );
    }

    #[test]
    // fftshift puts index (0, 0) at the centre of odd-length axes.
    fn fftshift_centres_zero_sample() {
        let mut a = Array2::<f64>::zeros((5, 3));
        a[[0, 0]] = 1.0;
        let shifted = fftshift2(&a);
        assert_relative_eq!(shifted[[2, 1]], 1.0);
    }

    #[test]
    // The batched path agrees with the per-slice path sample by sample.
    fn batched_transform_matches_per_slice() {
        let mut data = Array3::<Complex64>::zeros((3, 4, 3));
        for ((it, i, j), v) in data.indexed_iter_mut() {
            *v = Complex64::new((it + i) as f64 * 0.3, (j as f64) - 1.0);
        }
        let field = Field::new(
            data,
            Array1::linspace(0.0, 2.0, 3),
            Array1::from_vec(vec![0.0, 0.5, -0.5, 1.0]),
            Array1::from_vec(vec![0.0, 0.2, 0.4]),
        )
        .unwrap();
        let transform = SpectralTransform::for_field(&field).unwrap();
        let batched = transform.real_space_field(&field, 1.0, 0.6);
        for it in 0..3 {
            let single = transform.to_real_space(field.data().index_axis(Axis(0), it));
            for (a, b) in batched.data.index_axis(Axis(0), it).iter().zip(single.iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-12);
            }
        }
    }
}
