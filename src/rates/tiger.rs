//! TIGER: Tree-Independent Generation of Evolutionary Rates.
//!
//! Every site splits the species into sets by character state. Site `j`
//! agrees with site `i` to the extent that the sets of `j` nest inside the
//! sets of `i`:
//!
//! ```text
//! pa(i, j) = |{ s in P(j) : s is a subset of some t in P(i) }| / |P(j)|
//! rate(i)  = mean of pa(i, j) over all j != i
//! ```
//!
//! Invariant sites get rate 1; sites that conflict with everything else
//! approach 0. Gap and unknown symbols (`-`, `?`, `.`) belong to no set, and
//! a site made only of those carries no information and gets rate 1.
//!
//! Identical partitions are stored once with a multiplicity, so the
//! comparison cost grows with the number of distinct site patterns rather
//! than with the alignment length.

use std::collections::HashMap;

use log::debug;

use super::bitset::Bitset;
use super::RateEstimator;
use crate::model::Alignment;

/// Sets of species sharing a character state, in canonical (sorted) order.
type Partition = Vec<Bitset>;

/// Returns true for symbols treated as missing data.
pub fn is_missing(symbol: u8) -> bool {
    matches!(symbol, b'-' | b'?' | b'.')
}

/// TIGER rate estimator.
#[derive(Debug, Default)]
pub struct Tiger {
    /// Distinct site partitions
    patterns: Vec<Partition>,
    /// Number of sites sharing each pattern
    multiplicity: Vec<usize>,
    /// Pattern index of every site
    site_pattern: Vec<usize>,
}

impl Tiger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct site patterns seen by the last build.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Splits the species at `col` into one set per character state.
    fn partition_column(alignment: &Alignment, col: usize, words: usize) -> Partition {
        let mut sets: Vec<(u8, Bitset)> = Vec::new();

        if let Some(site) = alignment.column(col) {
            for (row, symbol) in site.enumerate() {
                if is_missing(symbol) {
                    continue;
                }
                match sets.iter_mut().find(|(state, _)| *state == symbol) {
                    Some((_, set)) => set.set(row),
                    None => {
                        let mut set = Bitset::zeros(words);
                        set.set(row);
                        sets.push((symbol, set));
                    }
                }
            }
        }

        let mut partition: Partition = sets.into_iter().map(|(_, set)| set).collect();
        partition.sort_unstable();
        partition
    }
}

/// Fraction of the sets of `other` that nest inside some set of `site`.
///
/// A site with no sets (all missing data) agrees fully in both directions.
fn partition_agreement(site: &[Bitset], other: &[Bitset]) -> f64 {
    if site.is_empty() || other.is_empty() {
        return 1.0;
    }
    let nested = other
        .iter()
        .filter(|set| site.iter().any(|outer| set.is_subset_of(outer)))
        .count();
    nested as f64 / other.len() as f64
}

impl RateEstimator for Tiger {
    fn build_bitsets(&mut self, alignment: &Alignment) {
        let words = Bitset::words_for(alignment.species_count());
        let mut index: HashMap<Partition, usize> = HashMap::new();

        self.patterns.clear();
        self.multiplicity.clear();
        self.site_pattern.clear();
        self.site_pattern.reserve(alignment.sequence_length());

        for col in 0..alignment.sequence_length() {
            let partition = Self::partition_column(alignment, col, words);
            let next = self.patterns.len();
            let pattern = *index.entry(partition).or_insert_with_key(|partition| {
                self.patterns.push(partition.clone());
                self.multiplicity.push(0);
                next
            });
            self.multiplicity[pattern] += 1;
            self.site_pattern.push(pattern);
        }

        debug!(
            "Built {} distinct site patterns from {} sites",
            self.patterns.len(),
            self.site_pattern.len()
        );
    }

    fn calc_rates(&self) -> Vec<f64> {
        let sites = self.site_pattern.len();
        if sites <= 1 {
            return vec![1.0; sites];
        }

        let pattern_rates: Vec<f64> = self
            .patterns
            .iter()
            .map(|site| {
                let total: f64 = self
                    .patterns
                    .iter()
                    .zip(&self.multiplicity)
                    .map(|(other, &count)| count as f64 * partition_agreement(site, other))
                    .sum();
                // a site always agrees fully with itself
                (total - 1.0) / (sites - 1) as f64
            })
            .collect();

        self.site_pattern
            .iter()
            .map(|&pattern| pattern_rates[pattern])
            .collect()
    }
}
