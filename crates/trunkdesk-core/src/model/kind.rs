// ── Entity kinds and field tables ──
//
// One table per kind drives the REST path, table columns, edit forms, and
// form-value parsing. Adding a field means adding one `FieldSpec` row and
// the matching struct field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, VariantNames};

use super::entities::{
    CustomerFields, DidFields, DidStatus, EntityFields, NsoTrunkFields, TrunkMappingFields,
    TrunkStatus, TrunkType, VnoTrunkFields,
};
use crate::error::CoreError;

// ── FieldSpec ───────────────────────────────────────────────────────

/// Input type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative integer.
    Number,
    /// One of a fixed set of wire values.
    Choice(&'static [&'static str]),
}

/// Descriptor of one entity field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// camelCase wire name.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// An empty value is sent as `null`.
    pub optional: bool,
}

impl FieldSpec {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            optional: false,
        }
    }

    const fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number,
            optional: false,
        }
    }

    const fn choice(key: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Choice(options),
            optional: false,
        }
    }

    const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Check a raw form value against this field's type.
    pub fn validate(&self, raw: &str) -> Result<(), CoreError> {
        let value = raw.trim();
        if value.is_empty() && self.optional {
            return Ok(());
        }
        match self.kind {
            FieldKind::Text => Ok(()),
            FieldKind::Number => value.parse::<u64>().map(drop).map_err(|_| CoreError::Validation {
                field: self.label.into(),
                reason: format!("{value:?} is not a non-negative integer"),
            }),
            FieldKind::Choice(options) => {
                if options.contains(&value) {
                    Ok(())
                } else {
                    Err(CoreError::Validation {
                        field: self.label.into(),
                        reason: format!("expected one of {}", options.join(", ")),
                    })
                }
            }
        }
    }
}

const NSO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("serviceId", "Service ID"),
    FieldSpec::text("pilotNumber", "Pilot Number"),
    FieldSpec::number("channels", "Channels"),
    FieldSpec::text("areaCode", "Area Code"),
    FieldSpec::choice("status", "Status", TrunkStatus::VARIANTS),
];

const VNO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("serviceId", "Service ID"),
    FieldSpec::text("pilotNumber", "Pilot Number"),
    FieldSpec::number("channels", "Channels"),
    FieldSpec::text("areaCode", "Area Code"),
    FieldSpec::number("customerId", "Customer ID").optional(),
    FieldSpec::choice("status", "Status", TrunkStatus::VARIANTS),
];

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Name"),
    FieldSpec::text("email", "Email"),
    FieldSpec::text("phone", "Phone").optional(),
];

const MAPPING_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("nsoTrunkId", "NSO Trunk ID"),
    FieldSpec::number("vnoTrunkId", "VNO Trunk ID"),
    FieldSpec::number("allocatedChannels", "Allocated Channels"),
];

const DID_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("didNumber", "DID Number"),
    FieldSpec::number("trunkId", "Trunk ID"),
    FieldSpec::choice("trunkType", "Trunk Type", TrunkType::VARIANTS),
    FieldSpec::choice("status", "Status", DidStatus::VARIANTS),
];

// ── EntityKind ──────────────────────────────────────────────────────

/// The five inventory entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    NsoTrunk,
    VnoTrunk,
    Customer,
    TrunkMapping,
    Did,
}

impl EntityKind {
    /// REST collection path under `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::NsoTrunk => "nso-trunks",
            Self::VnoTrunk => "vno-trunks",
            Self::Customer => "customers",
            Self::TrunkMapping => "trunk-mappings",
            Self::Did => "dids",
        }
    }

    /// Plural heading, as shown on tabs and table titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::NsoTrunk => "NSO Trunks",
            Self::VnoTrunk => "VNO Trunks",
            Self::Customer => "Customers",
            Self::TrunkMapping => "Trunk Mapping",
            Self::Did => "DIDs",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::NsoTrunk => "NSO trunk",
            Self::VnoTrunk => "VNO trunk",
            Self::Customer => "customer",
            Self::TrunkMapping => "trunk mapping",
            Self::Did => "DID",
        }
    }

    /// Ordered field table for this kind.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::NsoTrunk => NSO_FIELDS,
            Self::VnoTrunk => VNO_FIELDS,
            Self::Customer => CUSTOMER_FIELDS,
            Self::TrunkMapping => MAPPING_FIELDS,
            Self::Did => DID_FIELDS,
        }
    }

    /// Form values of the blank record offered by "add".
    pub fn template_values(self) -> Vec<String> {
        match self {
            Self::NsoTrunk => NsoTrunkFields::template().values(),
            Self::VnoTrunk => VnoTrunkFields::template().values(),
            Self::Customer => CustomerFields::template().values(),
            Self::TrunkMapping => TrunkMappingFields::template().values(),
            Self::Did => DidFields::template().values(),
        }
    }

    /// Position of a field by wire key.
    pub fn field_index(self, key: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.key == key)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

// ── Form parsing ────────────────────────────────────────────────────

/// Typed access to a row of raw form values laid out per a field table.
pub(crate) struct FormReader<'a> {
    kind: EntityKind,
    values: &'a [String],
}

impl<'a> FormReader<'a> {
    pub(crate) fn new(kind: EntityKind, values: &'a [String]) -> Result<Self, CoreError> {
        let specs = kind.fields();
        if values.len() != specs.len() {
            return Err(CoreError::Validation {
                field: kind.singular().into(),
                reason: format!("expected {} values, got {}", specs.len(), values.len()),
            });
        }
        for (spec, raw) in specs.iter().zip(values) {
            spec.validate(raw)?;
        }
        Ok(Self { kind, values })
    }

    fn raw(&self, key: &str) -> &'a str {
        self.kind
            .field_index(key)
            .and_then(|i| self.values.get(i))
            .map_or("", |v| v.trim())
    }

    pub(crate) fn text(&self, key: &str) -> String {
        self.raw(key).to_owned()
    }

    pub(crate) fn optional_text(&self, key: &str) -> Option<String> {
        Some(self.raw(key)).filter(|v| !v.is_empty()).map(str::to_owned)
    }

    pub(crate) fn number<T: FromStr>(&self, key: &str) -> Result<T, CoreError> {
        self.raw(key).parse().map_err(|_| CoreError::Validation {
            field: key.into(),
            reason: "not a non-negative integer in range".into(),
        })
    }

    pub(crate) fn optional_number<T: FromStr>(&self, key: &str) -> Result<Option<T>, CoreError> {
        if self.raw(key).is_empty() {
            Ok(None)
        } else {
            self.number(key).map(Some)
        }
    }

    pub(crate) fn choice<T: FromStr>(&self, key: &str) -> Result<T, CoreError> {
        self.raw(key).parse().map_err(|_| CoreError::Validation {
            field: key.into(),
            reason: "unknown option".into(),
        })
    }
}
