//! Descriptive statistics over the ligandability tables produced by the
//! `analyze` step, exported as the small CSV tables behind the manuscript
//! figures.
//!
//! Every panel follows the same pattern. A reactivity [`Table`] is loaded
//! and, for peptide tables, deduplicated:
//!
//! ```rust,ignore
//! # use ligand::*;
//! let t = Table::load("peptides_compounds.tsv", TableKind::Peptide)?.deduplicate();
//! ```
//!
//! Ratios are then thresholded with [`is_liganded`], folded into groups by a
//! [`Grouping`] and counted per [`Entity`] in a single pass:
//!
//! ```rust,ignore
//! # use ligand::*;
//! let agg = Aggregation::new(&t, Grouping::Compound, Level::Protein)?;
//!
//! // Number of distinct compounds liganding each protein: 1, 2, .., >=6
//! let competitors: Histogram = agg.histogram(Histogram::DEFAULT_OVERFLOW);
//! let partition: Partition = agg.partition();
//! let sharing: Vec<Sharing> = agg.sharing();
//! ```
//!
//! The [`report`] module wires these together into the individual figure
//! panels, and [`archive::package`] bundles the results.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod aggregation;
pub mod archive;
pub mod codes;
mod error;
mod grouping;
mod histogram;
mod parser;
pub mod report;
mod table;

pub use aggregation::{Aggregation, EntityHits, Partition, Sharing};
pub use codes::CodeBook;
pub use error::{Error, Result};
pub use grouping::{compound_name, Grouping};
pub use histogram::Histogram;
pub use table::{DedupKey, Entity, Level, MetaColumn, Row, Table, TableKind};

/// Residue number of a quantified lysine within its protein
pub type Residue = u16;

/// Competition ratio at or above which a site counts as liganded
pub const LIGANDED_THRESHOLD: f64 = 4.0;

/// Decide whether a single competition ratio is a liganding event
#[inline]
pub fn is_liganded(ratio: f64) -> bool {
    ratio >= LIGANDED_THRESHOLD
}
