//! The prompt generator: `(seed, index) → text`, with no state of its own.
//!
//! Two output styles exist and are kept as named modes instead of being
//! merged into one:
//! - [`Variant::Elastic`] substitutes every occurrence of a placeholder and
//!   returns the full text (callers wrap it onto several lines).
//! - [`Variant::Classic`] substitutes only the first occurrence per category
//!   and truncates long results to a single short line.

use crate::hash::{hash_slot, slot_index, TEMPLATE_SLOT};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Results longer than this many characters are truncated in truncate mode.
pub const TRUNCATE_AT: usize = 100;
/// Appended to truncated results.
pub const ELLIPSIS: &str = "...";

/// How placeholders are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Substitution {
    /// Replace every `{category}` marker.
    AllOccurrences,
    /// Replace only the first marker per category; later repeats stay verbatim.
    FirstOccurrence,
}

/// What happens to long results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthPolicy {
    /// Return the whole text; layout wraps it.
    Wrap,
    /// Cut to `TRUNCATE_AT - ELLIPSIS.len()` characters plus [`ELLIPSIS`].
    Truncate,
}

/// Named bundle of generator and presentation behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Multi-line elastic billboards.
    #[default]
    Elastic,
    /// Single-line truncated billboards.
    Classic,
}

impl Variant {
    pub fn substitution(self) -> Substitution {
        match self {
            Variant::Elastic => Substitution::AllOccurrences,
            Variant::Classic => Substitution::FirstOccurrence,
        }
    }

    pub fn length_policy(self) -> LengthPolicy {
        match self {
            Variant::Elastic => LengthPolicy::Wrap,
            Variant::Classic => LengthPolicy::Truncate,
        }
    }

    /// Index of the first prompt a fresh field shows.
    ///
    /// Elastic fields claim an index before generating, so they start at 1.
    pub fn first_index(self) -> u64 {
        match self {
            Variant::Elastic => 1,
            Variant::Classic => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Elastic => "elastic",
            Variant::Classic => "classic",
        }
    }
}

/// Indices chosen for one generation call, before any text is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub template: usize,
    /// One entry index per pool, in pool order.
    pub entries: Vec<usize>,
}

/// Deterministic prompt source bound to one profile.
#[derive(Debug, Clone)]
pub struct PromptGenerator {
    profile: Arc<Profile>,
    substitution: Substitution,
    length: LengthPolicy,
}

impl PromptGenerator {
    pub fn new(profile: Arc<Profile>, substitution: Substitution, length: LengthPolicy) -> Self {
        Self {
            profile,
            substitution,
            length,
        }
    }

    pub fn for_variant(profile: Arc<Profile>, variant: Variant) -> Self {
        Self::new(profile, variant.substitution(), variant.length_policy())
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    pub fn substitution(&self) -> Substitution {
        self.substitution
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.length
    }

    /// Choose a template and one entry per pool.
    pub fn select(&self, seed: u32, index: u64) -> Selection {
        select(&self.profile, seed, index)
    }

    /// Produce the prompt at `index` for `seed`.
    pub fn generate(&self, seed: u32, index: u64) -> String {
        let selection = self.select(seed, index);
        let text = assemble(&self.profile, &selection, self.substitution);
        match self.length {
            LengthPolicy::Wrap => text,
            LengthPolicy::Truncate => truncate(text),
        }
    }
}

/// Full-featured generation: every occurrence substituted, no truncation.
pub fn generate(seed: u32, index: u64, profile: &Profile) -> String {
    let selection = select(profile, seed, index);
    assemble(profile, &selection, Substitution::AllOccurrences)
}

fn select(profile: &Profile, seed: u32, index: u64) -> Selection {
    let templates = profile.templates();
    let template = slot_index(hash_slot(seed, index, TEMPLATE_SLOT), templates.len());
    let entries = profile
        .pools()
        .iter()
        .zip(1u32..)
        .map(|(pool, slot)| slot_index(hash_slot(seed, index, slot), pool.entries.len()))
        .collect();
    Selection { template, entries }
}

fn assemble(profile: &Profile, selection: &Selection, substitution: Substitution) -> String {
    let mut text = profile.templates()[selection.template].clone();
    for (pool, &entry) in profile.pools().iter().zip(&selection.entries) {
        let marker = pool.placeholder();
        let value = &pool.entries[entry];
        text = match substitution {
            Substitution::AllOccurrences => text.replace(&marker, value),
            Substitution::FirstOccurrence => text.replacen(&marker, value, 1),
        };
    }
    text
}

fn truncate(text: String) -> String {
    if text.chars().count() <= TRUNCATE_AT {
        return text;
    }
    let keep = TRUNCATE_AT - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
