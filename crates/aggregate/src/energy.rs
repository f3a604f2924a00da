//! Top-of-atmosphere and surface energy balance.

use crate::error::AggregateError;
use crate::variables::VariableSet;

/// Flux variables required by the energy balance, in argument order of
/// [`energy_balance`].
pub const FLUX_VARIABLES: [&str; 6] = ["FSNT", "FLNT", "FSNS", "FLNS", "LHFLX", "SHFLX"];

/// Net energy fluxes at one step (W/m2, positive downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    /// Net flux at the top of the atmosphere.
    pub toa: f64,
    /// Net flux into the surface.
    pub surface: f64,
}

impl EnergyBalance {
    /// Both balances set to NaN.
    pub const MISSING: EnergyBalance = EnergyBalance {
        toa: f64::NAN,
        surface: f64::NAN,
    };
}

/// Computes `toa = fsnt - flnt` and `surface = fsns - flns - lhflx - shflx`.
pub fn energy_balance(
    fsnt: f64,
    flnt: f64,
    fsns: f64,
    flns: f64,
    lhflx: f64,
    shflx: f64,
) -> EnergyBalance {
    EnergyBalance {
        toa: fsnt - flnt,
        surface: fsns - flns - lhflx - shflx,
    }
}

/// Energy balance bound to the raw-slot positions of one variable set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBalanceCalculator {
    positions: [usize; 6],
}

impl EnergyBalanceCalculator {
    /// Locates the six flux variables among the raw slots of `set`.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::MissingFlux`] naming every flux absent from
    /// the read list.
    pub fn from_variable_set(set: &VariableSet) -> Result<Self, AggregateError> {
        let raw: Vec<&str> = set.raw_names().collect();
        let mut positions = [0; 6];
        let mut missing = Vec::new();
        for (slot, flux) in positions.iter_mut().zip(FLUX_VARIABLES) {
            match raw.iter().position(|name| *name == flux) {
                Some(p) => *slot = p,
                None => missing.push(flux.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(AggregateError::MissingFlux {
                component: set.component(),
                missing,
            });
        }
        Ok(Self { positions })
    }

    /// Evaluates the balance from one step's raw means, ordered like the
    /// set's raw slots.
    pub fn compute(&self, raw_means: &[f64]) -> EnergyBalance {
        let v = |k: usize| raw_means.get(self.positions[k]).copied().unwrap_or(f64::NAN);
        energy_balance(v(0), v(1), v(2), v(3), v(4), v(5))
    }
}
