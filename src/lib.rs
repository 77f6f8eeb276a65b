//! # tigger - alignment ingestion for per-site rate estimation
//!
//! Reads Phylip and FASTA alignments into a validated byte matrix and
//! estimates one evolutionary rate per site with TIGER.
//!
//! ## Architecture
//!
//! - `grammar`: character classes and line scanners for names and bases
//! - `formats`: Phylip and FASTA parsers, format dispatch and file reading
//! - `validate`: alignment-wide checks run after parsing
//! - `model`: parsed records and the `Alignment` matrix
//! - `rates`: the `RateEstimator` seam and the TIGER estimator
//!
//! ```no_run
//! use tigger::{read, RateEstimator, Tiger};
//!
//! let alignment = read("primates.phy").unwrap();
//! let mut tiger = Tiger::new();
//! tiger.build_bitsets(&alignment);
//! let rates = tiger.calc_rates();
//! assert_eq!(rates.len(), alignment.sequence_length());
//! ```

pub mod formats;
pub mod grammar;
pub mod model;
pub mod rates;
pub mod validate;

pub use formats::{parse_str, read, AlignmentError, FileFormat};
pub use model::Alignment;
pub use rates::tiger::Tiger;
pub use rates::RateEstimator;
