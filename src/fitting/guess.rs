//! Adaptive warm-start state carried across time windows.
//!
//! Purpose
//! -------
//! Each analysis run walks its windows strictly left to right, seeding every
//! fit with the parameters of the last *successful* fit. [`FitGuess`] is
//! that state made explicit: seeded from configuration at the start of a
//! run, owned exclusively by the engine driving that run, and updated only
//! when a window's fit is accepted. A failed window leaves the guess
//! untouched, so later windows are seeded as if the failure never happened.
use crate::fitting::model::Params;

/// The current best initial-parameter estimate for the next window.
#[derive(Debug, Clone, PartialEq)]
pub struct FitGuess {
    current: Params,
}

impl FitGuess {
    /// Seed the guess from the configured starting parameters.
    pub fn seeded(seed: &[f64]) -> FitGuess {
        FitGuess { current: Params::from_vec(seed.to_vec()) }
    }

    pub fn current(&self) -> &Params {
        &self.current
    }

    /// Adopt the parameters of a successful fit as the next window's seed.
    pub fn accept(&mut self, params: &[f64]) {
        self.current = Params::from_vec(params.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Accepted parameters replace the seed; the sequence of currents is
    // exactly the sequence of successful fits.
    fn accept_replaces_current() {
        let mut guess = FitGuess::seeded(&[1.0, 2.0]);
        assert_eq!(guess.current().as_slice().unwrap(), &[1.0, 2.0]);
        guess.accept(&[0.5, 3.0]);
        assert_eq!(guess.current().as_slice().unwrap(), &[0.5, 3.0]);
    }
}
