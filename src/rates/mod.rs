//! Per-site rate estimation over a validated alignment.
//!
//! An estimator first ingests the alignment (`build_bitsets`) and then
//! produces one rate per column (`calc_rates`).

pub mod bitset;
pub mod tiger;

use crate::model::Alignment;

/// A rate-heterogeneity estimator over alignment columns.
pub trait RateEstimator {
    /// Builds the estimator's internal representation of `alignment`.
    fn build_bitsets(&mut self, alignment: &Alignment);

    /// Returns one rate per site of the last alignment built.
    fn calc_rates(&self) -> Vec<f64>;
}
