// ── Inventory entities ──
//
// Field structs for the five record kinds. Each implements `EntityFields`
// so the CRUD façade and the edit form can treat them uniformly.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, VariantNames};

use super::kind::{EntityKind, FormReader};
use super::record::RecordId;
use crate::error::CoreError;

// ── Enumerations ────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum TrunkStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum TrunkType {
    #[serde(rename = "NSO")]
    #[strum(serialize = "NSO")]
    Nso,
    #[default]
    #[serde(rename = "VNO")]
    #[strum(serialize = "VNO")]
    Vno,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum DidStatus {
    #[default]
    Available,
    Assigned,
}

// ── EntityFields ────────────────────────────────────────────────────

/// Kind-specific payload of a record.
///
/// `values()` and `from_values()` use the order of `KIND.fields()`.
pub trait EntityFields: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Blank record offered by "add".
    fn template() -> Self;

    /// Display/form strings, one per field.
    fn values(&self) -> Vec<String>;

    /// Parse and validate a full row of form values.
    fn from_values(values: &[String]) -> Result<Self, CoreError>;
}

/// Read a status column that may be null or hold a value this client does
/// not know. Either reads as the enum's default instead of failing the row.
fn lenient_status<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

fn opt_id(id: Option<RecordId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

// ── NSO trunk ───────────────────────────────────────────────────────

/// Owned SIP trunk from the network service operator. Its `channels` are
/// the capacity counted on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NsoTrunkFields {
    pub service_id: String,
    pub pilot_number: String,
    pub channels: i64,
    pub area_code: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TrunkStatus,
}

impl EntityFields for NsoTrunkFields {
    const KIND: EntityKind = EntityKind::NsoTrunk;

    fn template() -> Self {
        Self {
            service_id: String::new(),
            pilot_number: String::new(),
            channels: 0,
            area_code: String::new(),
            status: TrunkStatus::Active,
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.service_id.clone(),
            self.pilot_number.clone(),
            self.channels.to_string(),
            self.area_code.clone(),
            self.status.to_string(),
        ]
    }

    fn from_values(values: &[String]) -> Result<Self, CoreError> {
        let form = FormReader::new(Self::KIND, values)?;
        Ok(Self {
            service_id: form.text("serviceId"),
            pilot_number: form.text("pilotNumber"),
            channels: form.number("channels")?,
            area_code: form.text("areaCode"),
            status: form.choice("status")?,
        })
    }
}

// ── VNO trunk ───────────────────────────────────────────────────────

/// Virtual trunk leased to a customer, carved out of NSO capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnoTrunkFields {
    pub service_id: String,
    pub pilot_number: String,
    pub channels: i64,
    pub area_code: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TrunkStatus,
    #[serde(default)]
    pub customer_id: Option<RecordId>,
}

impl EntityFields for VnoTrunkFields {
    const KIND: EntityKind = EntityKind::VnoTrunk;

    fn template() -> Self {
        Self {
            service_id: String::new(),
            pilot_number: String::new(),
            channels: 0,
            area_code: String::new(),
            status: TrunkStatus::Active,
            customer_id: Some(RecordId(0)),
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.service_id.clone(),
            self.pilot_number.clone(),
            self.channels.to_string(),
            self.area_code.clone(),
            opt_id(self.customer_id),
            self.status.to_string(),
        ]
    }

    fn from_values(values: &[String]) -> Result<Self, CoreError> {
        let form = FormReader::new(Self::KIND, values)?;
        Ok(Self {
            service_id: form.text("serviceId"),
            pilot_number: form.text("pilotNumber"),
            channels: form.number("channels")?,
            area_code: form.text("areaCode"),
            status: form.choice("status")?,
            customer_id: form.optional_number("customerId")?.map(RecordId),
        })
    }
}

// ── Customer ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl EntityFields for CustomerFields {
    const KIND: EntityKind = EntityKind::Customer;

    fn template() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
        ]
    }

    fn from_values(values: &[String]) -> Result<Self, CoreError> {
        let form = FormReader::new(Self::KIND, values)?;
        Ok(Self {
            name: form.text("name"),
            email: form.text("email"),
            phone: form.optional_text("phone"),
        })
    }
}

// ── Trunk mapping ───────────────────────────────────────────────────

/// Allocation of NSO channels to a VNO trunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrunkMappingFields {
    pub nso_trunk_id: RecordId,
    pub vno_trunk_id: RecordId,
    pub allocated_channels: i64,
}

impl EntityFields for TrunkMappingFields {
    const KIND: EntityKind = EntityKind::TrunkMapping;

    fn template() -> Self {
        Self {
            nso_trunk_id: RecordId(0),
            vno_trunk_id: RecordId(0),
            allocated_channels: 0,
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.nso_trunk_id.to_string(),
            self.vno_trunk_id.to_string(),
            self.allocated_channels.to_string(),
        ]
    }

    fn from_values(values: &[String]) -> Result<Self, CoreError> {
        let form = FormReader::new(Self::KIND, values)?;
        Ok(Self {
            nso_trunk_id: RecordId(form.number("nsoTrunkId")?),
            vno_trunk_id: RecordId(form.number("vnoTrunkId")?),
            allocated_channels: form.number("allocatedChannels")?,
        })
    }
}

// ── DID ─────────────────────────────────────────────────────────────

/// Direct inward dialing number routed over a trunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidFields {
    pub did_number: String,
    pub trunk_id: RecordId,
    #[serde(default)]
    pub trunk_type: TrunkType,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: DidStatus,
}

impl EntityFields for DidFields {
    const KIND: EntityKind = EntityKind::Did;

    fn template() -> Self {
        Self {
            did_number: String::new(),
            trunk_id: RecordId(0),
            trunk_type: TrunkType::Vno,
            status: DidStatus::Available,
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.did_number.clone(),
            self.trunk_id.to_string(),
            self.trunk_type.to_string(),
            self.status.to_string(),
        ]
    }

    fn from_values(values: &[String]) -> Result<Self, CoreError> {
        let form = FormReader::new(Self::KIND, values)?;
        Ok(Self {
            did_number: form.text("didNumber"),
            trunk_id: RecordId(form.number("trunkId")?),
            trunk_type: form.choice("trunkType")?,
            status: form.choice("status")?,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn vno_template_matches_add_defaults() {
        let body = serde_json::to_value(VnoTrunkFields::template()).unwrap();
        assert_eq!(
            body,
            json!({
                "serviceId": "",
                "pilotNumber": "",
                "channels": 0,
                "areaCode": "",
                "status": "Active",
                "customerId": 0
            })
        );
    }

    #[test]
    fn did_wire_names_use_upper_case_trunk_type() {
        let did: DidFields = serde_json::from_value(json!({
            "didNumber": "2125550100",
            "trunkId": 3,
            "trunkType": "NSO",
            "status": "Assigned"
        }))
        .unwrap();
        assert_eq!(did.trunk_type, TrunkType::Nso);
        assert_eq!(did.values(), strings(&["2125550100", "3", "NSO", "Assigned"]));
    }

    #[test]
    fn vno_null_customer_reads_as_blank() {
        let vno: VnoTrunkFields = serde_json::from_value(json!({
            "serviceId": "VNO-1",
            "pilotNumber": "6465550000",
            "channels": 10,
            "areaCode": "646",
            "status": "Inactive",
            "customerId": null
        }))
        .unwrap();
        assert_eq!(vno.customer_id, None);
        assert_eq!(vno.values()[4], "");
    }

    #[test]
    fn odd_rows_from_the_server_still_read() {
        let nso: NsoTrunkFields = serde_json::from_value(json!({
            "serviceId": "NSO-9",
            "pilotNumber": "2125550000",
            "channels": 23,
            "areaCode": "212",
            "status": null
        }))
        .unwrap();
        assert_eq!(nso.status, TrunkStatus::Active);

        let vno: VnoTrunkFields = serde_json::from_value(json!({
            "serviceId": "VNO-9",
            "pilotNumber": "6465550000",
            "channels": -5,
            "areaCode": "646",
            "status": "Suspended",
            "customerId": 1
        }))
        .unwrap();
        assert_eq!(vno.channels, -5);
        assert_eq!(vno.status, TrunkStatus::Active);
        assert_eq!(vno.values()[2], "-5");

        let did: DidFields = serde_json::from_value(json!({
            "didNumber": "2125550100",
            "trunkId": 3,
            "trunkType": "VNO"
        }))
        .unwrap();
        assert_eq!(did.status, DidStatus::Available);
    }

    #[test]
    fn form_values_parse_into_fields() {
        let mapping =
            TrunkMappingFields::from_values(&strings(&["1", " 4 ", "10"])).unwrap();
        assert_eq!(
            mapping,
            TrunkMappingFields {
                nso_trunk_id: RecordId(1),
                vno_trunk_id: RecordId(4),
                allocated_channels: 10,
            }
        );

        let customer = CustomerFields::from_values(&strings(&["Acme", "ops@acme.test", ""])).unwrap();
        assert_eq!(customer.phone, None);
    }

    #[test]
    fn form_rejects_bad_number_and_choice() {
        let bad_channels = NsoTrunkFields::from_values(&strings(&["S1", "P1", "many", "212", "Active"]));
        assert!(matches!(bad_channels, Err(CoreError::Validation { .. })));

        let bad_status = NsoTrunkFields::from_values(&strings(&["S1", "P1", "23", "212", "Paused"]));
        assert!(matches!(bad_status, Err(CoreError::Validation { .. })));

        let short = NsoTrunkFields::from_values(&strings(&["S1"]));
        assert!(matches!(short, Err(CoreError::Validation { .. })));
    }
}
