// ── Domain model ──
//
// Canonical record types shared by the CLI and the TUI.

pub mod entities;
pub mod kind;
pub mod record;
pub mod user;

pub use entities::{
    CustomerFields, DidFields, DidStatus, EntityFields, NsoTrunkFields, TrunkMappingFields,
    TrunkStatus, TrunkType, VnoTrunkFields,
};
pub use kind::{EntityKind, FieldKind, FieldSpec};
pub use record::{Record, RecordId, Staged};
pub use user::{Role, Session, UserIdentity};

pub type NsoTrunk = Record<NsoTrunkFields>;
pub type VnoTrunk = Record<VnoTrunkFields>;
pub type Customer = Record<CustomerFields>;
pub type TrunkMapping = Record<TrunkMappingFields>;
pub type Did = Record<DidFields>;

/// Kind-erased row: id plus one display string per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub id: RecordId,
    pub values: Vec<String>,
}

impl<F: EntityFields> From<&Record<F>> for RecordView {
    fn from(record: &Record<F>) -> Self {
        Self {
            id: record.id,
            values: record.fields.values(),
        }
    }
}
