// ── Edit form ──
//
// Kind-erased staged record used by the edit modal and the CLI. Values are
// raw strings in field-table order; they are parsed into the typed fields
// only when the form is saved.

use crate::error::CoreError;
use crate::model::{EntityKind, FieldSpec, RecordId, RecordView};

/// Whether saving the form creates a record or updates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Draft,
    Persisted(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub kind: EntityKind,
    pub target: FormTarget,
    pub values: Vec<String>,
}

impl EditForm {
    /// Blank form pre-filled with the kind's template.
    pub fn for_add(kind: EntityKind) -> Self {
        Self {
            kind,
            target: FormTarget::Draft,
            values: kind.template_values(),
        }
    }

    /// Copy of an existing row.
    pub fn for_edit(kind: EntityKind, row: &RecordView) -> Self {
        Self {
            kind,
            target: FormTarget::Persisted(row.id),
            values: row.values.clone(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.target == FormTarget::Draft
    }

    pub fn title(&self) -> String {
        match self.target {
            FormTarget::Draft => format!("Add {}", self.kind.singular()),
            FormTarget::Persisted(id) => format!("Edit {} {id}", self.kind.singular()),
        }
    }

    /// Field descriptors paired with their current values.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        self.kind
            .fields()
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Replace one value by position. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Replace one value by wire key.
    pub fn set_by_key(&mut self, key: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let index = self
            .kind
            .field_index(key)
            .ok_or_else(|| CoreError::Validation {
                field: key.into(),
                reason: format!("{} has no such field", self.kind.singular()),
            })?;
        self.set(index, value);
        Ok(())
    }

    /// Check every value against its field type.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.fields().try_for_each(|(spec, value)| spec.validate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_uses_template() {
        let form = EditForm::for_add(EntityKind::Did);
        assert!(form.is_draft());
        assert_eq!(form.values, ["", "0", "VNO", "Available"]);
        assert_eq!(form.title(), "Add DID");
    }

    #[test]
    fn edit_form_targets_row_id() {
        let row = RecordView {
            id: RecordId(2_000_000),
            values: vec!["Acme".into(), "ops@acme.test".into(), String::new()],
        };
        let mut form = EditForm::for_edit(EntityKind::Customer, &row);
        assert_eq!(form.target, FormTarget::Persisted(RecordId(2_000_000)));

        form.set_by_key("phone", "555-0100").ok();
        assert_eq!(form.values[2], "555-0100");
        assert!(form.set_by_key("fax", "x").is_err());
    }

    #[test]
    fn validate_reports_bad_number() {
        let mut form = EditForm::for_add(EntityKind::TrunkMapping);
        assert!(form.validate().is_ok());
        form.set(2, "lots");
        assert!(matches!(form.validate(), Err(CoreError::Validation { .. })));
    }
}
