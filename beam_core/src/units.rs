//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI units a beam force table is
//! expressed in. Units are a documented convention of the input file and are
//! never converted or enforced; the wrappers keep positions, forces and
//! moments from being mixed up on their way through the pipeline.
//!
//! - Length: metres (m)
//! - Force: kilonewtons (kN)
//! - Moment: kilonewton-metres (kN·m)
//!
//! ## Example
//!
//! ```rust
//! use beam_core::units::{KiloNewtons, Meters};
//!
//! let x = Meters(7.5);
//! let v = KiloNewtons(-12.25);
//! assert_eq!(format!("{x}"), "7.50 m");
//! assert_eq!(format!("{v}"), "-12.25 kN");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

impl Meters {
    pub const SYMBOL: &'static str = "m";
}

impl KiloNewtons {
    pub const SYMBOL: &'static str = "kN";
}

impl KiloNewtonMeters {
    pub const SYMBOL: &'static str = "kN·m";
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.0, Self::SYMBOL)
    }
}

impl fmt::Display for KiloNewtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.0, Self::SYMBOL)
    }
}

impl fmt::Display for KiloNewtonMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.0, Self::SYMBOL)
    }
}
