//! Closed set of authorised identity numbers.
//!
//! Built once from a literal allow-list plus synthetic entries drawn from a
//! seeded ChaCha8 stream, then frozen. The same seed and target size always
//! yield the same membership, which is what the tests pin down.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::checksum::IDENTITY_LEN;
use crate::config::RegistryConfig;
use crate::error::CoreError;

const SYNTHETIC_MIN: u64 = 100_000_000_000;
const SYNTHETIC_MAX: u64 = 999_999_999_999;

/// Outcome of a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLookup {
    pub found: bool,
    /// Advisory text for reports.
    pub message: &'static str,
}

/// Immutable snapshot of the authorised identifiers.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    ids: BTreeSet<String>,
}

impl RegistryStore {
    /// Seed the store from `config`.
    ///
    /// Allow-list entries go in first; synthetic 12-digit numbers are then
    /// drawn until the set holds `target_size` members, skipping collisions.
    pub fn build(config: &RegistryConfig) -> Result<Self, CoreError> {
        let mut ids = BTreeSet::new();
        for id in &config.allow_list {
            if id.len() != IDENTITY_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CoreError::BadAllowListEntry(id.clone()));
            }
            ids.insert(id.clone());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut draws = 0usize;
        while ids.len() < config.target_size {
            let candidate: u64 = rng.gen_range(SYNTHETIC_MIN..=SYNTHETIC_MAX);
            draws += 1;
            if !ids.insert(candidate.to_string()) {
                debug!(candidate, "registry seed collision skipped");
            }
        }

        info!(
            members = ids.len(),
            seed = config.seed,
            draws,
            "registry snapshot built"
        );
        Ok(Self { ids })
    }

    /// Exact-match membership. Callers strip whitespace first.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Membership plus an advisory message.
    pub fn lookup(&self, id: &str) -> RegistryLookup {
        if self.contains(id) {
            RegistryLookup {
                found: true,
                message: "ID found in authorized database.",
            }
        } else {
            RegistryLookup {
                found: false,
                message: "ID not found in database.",
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
