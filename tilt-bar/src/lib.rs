//! Tilt-bar analyzes the four-bar linkage that drives a tilting plate.
//!
//! The library has two layers: a closed-form angle solver for a single
//! linkage ([`Linkage::angles()`]) and an exhaustive sweep over candidate
//! link lengths ([`AdvantageField`]) that keeps, per candidate, the
//! worst-case mechanical-advantage ratio across the required tilt range
//! and reports the best design.
//!
//! ```
//! use tilt_bar::{AdvantageField, SweepCfg};
//!
//! let field = AdvantageField::make(&SweepCfg::default()).unwrap();
//! let best = field.optimum().unwrap();
//! assert!(best.advantage > 1.);
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]
pub use crate::{mech::*, sweep::*};

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
pub mod mech;
pub mod sweep;
#[cfg(test)]
mod tests;
