//! Math submodules: stable log-domain helpers, Beta distribution,
//! sample summaries, and text similarity ratios.

pub mod beta;
pub mod similarity;
pub mod stable;
pub mod summary;
