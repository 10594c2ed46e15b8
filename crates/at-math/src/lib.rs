//! Alert Triage math utilities.

pub mod math;

pub use math::beta::*;
pub use math::similarity::*;
pub use math::stable::*;
pub use math::summary::*;
