// ── Record identity ──
//
// `RecordId` is the server-assigned primary key. A record that has not been
// created yet is a `Staged::Draft` and has no id at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── RecordId ────────────────────────────────────────────────────────

/// Server-assigned integer id of any inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// A persisted entity: its id plus the kind-specific fields.
///
/// On the wire the fields sit next to `id` in one flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Record<F> {
    pub fn new(id: RecordId, fields: F) -> Self {
        Self { id, fields }
    }
}

// ── Staged ──────────────────────────────────────────────────────────

/// A record being edited, tagged with whether the server has seen it.
///
/// Saving a `Draft` creates; saving a `Persisted` record updates by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Staged<F> {
    Draft(F),
    Persisted(Record<F>),
}

impl<F> Staged<F> {
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Self::Draft(_) => None,
            Self::Persisted(record) => Some(record.id),
        }
    }

    pub fn fields(&self) -> &F {
        match self {
            Self::Draft(fields) => fields,
            Self::Persisted(record) => &record.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut F {
        match self {
            Self::Draft(fields) => fields,
            Self::Persisted(record) => &mut record.fields,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft(_))
    }
}

impl<F> From<Record<F>> for Staged<F> {
    fn from(record: Record<F>) -> Self {
        Self::Persisted(record)
    }
}
