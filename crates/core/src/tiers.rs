//! Tier assignment — the output of the title-filter stage.
//!
//! The first model pass classifies every paper id in the day's dataset into
//! one of three pairwise-disjoint sets. The assignment is persisted once
//! produced and never mutated; regenerating it requires deleting its cache
//! entry first.

use crate::error::ExtractionError;
use crate::paper::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The tripartite classification of a dataset's paper ids.
///
/// Wire format: a JSON object with exactly the three named fields, each a
/// list of paper identifiers. Unknown extra fields are ignored; a missing
/// field is a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAssignment {
    /// Must-read papers, reviewed in depth in the report
    pub tier1: Vec<String>,

    /// Possibly relevant papers, reviewed lightly
    pub tier2: Vec<String>,

    /// Papers not promoted to the abstract-review stage
    pub skip: Vec<String>,
}

impl TierAssignment {
    /// Validate this assignment against the dataset it classifies.
    ///
    /// Rules:
    /// - every id in any tier must exist in the dataset
    /// - no id may appear in more than one tier
    /// - no id may be repeated, even within a single tier (the tiers are
    ///   sets; a repeat would skew the per-tier counts)
    ///
    /// An all-skip assignment over a non-empty dataset is valid — an
    /// uninteresting day, not an error.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ExtractionError> {
        let known = dataset.ids();
        let mut seen: HashMap<&str, &'static str> = HashMap::new();

        for (tier, ids) in [
            ("tier1", &self.tier1),
            ("tier2", &self.tier2),
            ("skip", &self.skip),
        ] {
            for id in ids {
                if !known.contains(id.as_str()) {
                    return Err(ExtractionError::UnknownId(id.clone()));
                }
                match seen.insert(id.as_str(), tier) {
                    Some(previous) if previous == tier => {
                        return Err(ExtractionError::DuplicateId(id.clone()));
                    }
                    Some(_) => {
                        return Err(ExtractionError::OverlappingTiers(id.clone()));
                    }
                    None => {}
                }
            }
        }

        Ok(())
    }

    /// The ids promoted to the abstract-review stage: tier1 ∪ tier2.
    pub fn selected_ids(&self) -> HashSet<String> {
        self.tier1
            .iter()
            .chain(self.tier2.iter())
            .cloned()
            .collect()
    }

    /// (tier1, tier2, skip) counts, for the final status line.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.tier1.len(), self.tier2.len(), self.skip.len())
    }
}
