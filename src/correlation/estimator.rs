//! Correlation-function estimators.
//!
//! Two algorithms live here. The perpendicular estimator works in spectral
//! space through the Wiener–Khinchin theorem; the time and parallel
//! estimators correlate real-space signals directly, as a convolution of
//! one signal with the reversed other.
use ndarray::{Array1, Array2, Array3, ArrayView2, Zip, s};
use num_complex::Complex64;

use crate::field::data::Field;
use crate::field::errors::FieldResult;
use crate::spectral::transform::{fftshift2, hermitian_extend, ifft2, SpectralTransform};

/// Perpendicular correlation function C(t, Δx, Δy) via Wiener–Khinchin.
///
/// Per time sample: square the spectral amplitudes, Hermitian-extend the
/// power spectrum along ky (|f(−k)|² = |f(k)|² for a real field), inverse
/// transform, shift zero separation to the array centre, and normalize to
/// 1 at zero separation. Time samples are independent and computed in
/// parallel.
///
/// Output shape is (nt, nkx, 2·nky − 1); zero separation sits at
/// (nkx/2, nky − 1) after the shift.
///
/// # Errors
/// [`crate::field::FieldError::InsufficientResolution`] for degenerate
/// spectral axes.
pub fn perp_correlation(field: &Field) -> FieldResult<Array3<f64>> {
    SpectralTransform::for_field(field)?;
    let (nt, nkx, nky) = field.data().dim();
    let mut corr = Array3::<f64>::zeros((nt, nkx, 2 * nky - 1));
    Zip::from(corr.outer_iter_mut())
        .and(field.data().outer_iter())
        .par_for_each(|mut out, spec| {
            let power = spec.mapv(|c| Complex64::new(c.norm_sqr(), 0.0));
            let slice = fftshift2(&ifft2(&hermitian_extend(power.view())).mapv(|c| c.re));
            let peak = slice.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if peak > 0.0 {
                out.assign(&(&slice / peak));
            } else {
                out.assign(&slice);
            }
        });
    Ok(corr)
}

/// Full cross-correlation of two equal-convention signals.
///
/// `correlation(a, b)[k] = convolution(a, reverse(b))[k]`: the output has
/// `a.len() + b.len() − 1` samples over lags
/// `τ = k − (b.len() − 1) ∈ [−(Nb−1), Na−1]`, so for equal lengths N the
/// zero-separation sample is at index N − 1 regardless of parity of N.
pub fn correlate_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    let (na, nb) = (a.len(), b.len());
    let mut out = vec![0.0; na + nb - 1];
    for (k, slot) in out.iter_mut().enumerate() {
        let tau = k as isize - (nb as isize - 1);
        let mut acc = 0.0;
        for (i, &bv) in b.iter().enumerate() {
            let ai = i as isize + tau;
            if (0..na as isize).contains(&ai) {
                acc += a[ai as usize] * bv;
            }
        }
        *slot = acc;
    }
    out
}

/// Direct 2D autocorrelation of one (t, y) window at fixed x.
fn autocorrelation_2d(window: ArrayView2<'_, f64>) -> Array2<f64> {
    let (nt, ny) = window.dim();
    let mut corr = Array2::<f64>::zeros((2 * nt - 1, 2 * ny - 1));
    for (k, mut row) in corr.outer_iter_mut().enumerate() {
        let dt = k as isize - (nt as isize - 1);
        for (l, slot) in row.iter_mut().enumerate() {
            let dy = l as isize - (ny as isize - 1);
            let mut acc = 0.0;
            for it in 0..nt as isize {
                let jt = it + dt;
                if !(0..nt as isize).contains(&jt) {
                    continue;
                }
                for iy in 0..ny as isize {
                    let jy = iy + dy;
                    if (0..ny as isize).contains(&jy) {
                        acc += window[[it as usize, iy as usize]]
                            * window[[jt as usize, jy as usize]];
                    }
                }
            }
            *slot = acc;
        }
    }
    corr
}

/// Time correlation function C(Δt, Δy) for one time window of a cached
/// real-space field f(t, x, y).
///
/// Each radial position contributes an independent 2D autocorrelation over
/// (t, y); the contributions are averaged over x and the result is
/// normalized by its zero-separation value. Output shape is
/// (2·T − 1, 2·ny − 1) for a window of T samples, zero lag at
/// (T − 1, ny − 1).
pub fn time_correlation(window: ndarray::ArrayView3<'_, f64>) -> Array2<f64> {
    let (nt, nx, ny) = window.dim();
    let mut corr = Array2::<f64>::zeros((2 * nt - 1, 2 * ny - 1));
    for ix in 0..nx {
        corr += &autocorrelation_2d(window.slice(s![.., ix, ..]));
    }
    corr /= nx as f64;
    let zero_lag = corr[[nt - 1, ny - 1]];
    if zero_lag != 0.0 {
        corr /= zero_lag;
    }
    corr
}

/// Parallel correlation function C(Δz), averaged over every sample row.
///
/// `samples` holds one parallel profile per row (the (t, x, y) axes of the
/// field flattened by the caller); each row is autocorrelated directly and
/// the average is normalized by its zero-separation value at index nz − 1.
pub fn parallel_correlation(samples: ArrayView2<'_, f64>) -> Array1<f64> {
    let (nrows, nz) = samples.dim();
    let mut corr = Array1::<f64>::zeros(2 * nz - 1);
    for row in samples.outer_iter() {
        let profile = row.to_vec();
        let c = correlate_full(&profile, &profile);
        corr += &Array1::from_vec(c);
    }
    corr /= nrows as f64;
    let zero_lag = corr[nz - 1];
    if zero_lag != 0.0 {
        corr /= zero_lag;
    }
    corr
}
