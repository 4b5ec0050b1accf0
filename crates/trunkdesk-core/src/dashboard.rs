// ── Dashboard aggregation ──
//
// Channel utilization per area code. Capacity is the sum of NSO trunk
// channels; allocation is the sum of mapping allocations attributed to the
// mapped NSO trunk's area code. VNO trunks and DIDs only contribute counts.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use trunkdesk_api::models::{AreaCodeStatsWire, DashboardResponse};

use crate::model::{Did, NsoTrunk, RecordId, TrunkMapping, VnoTrunk};

/// Channel figures for one area code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCodeStats {
    pub total_channels: u64,
    pub allocated_channels: u64,
    /// Never negative; over-allocation floors at zero.
    pub remaining_channels: u64,
    /// Whole percent, rounded half up. Above 100 when over-allocated.
    pub utilization: u64,
}

impl AreaCodeStats {
    pub fn from_totals(total_channels: u64, allocated_channels: u64) -> Self {
        Self {
            total_channels,
            allocated_channels,
            remaining_channels: total_channels.saturating_sub(allocated_channels),
            utilization: utilization_percent(total_channels, allocated_channels),
        }
    }

    /// Remaining and utilization are recomputed from the channel totals.
    fn from_wire(wire: &AreaCodeStatsWire) -> Self {
        Self::from_totals(
            u64::try_from(wire.total_channels).unwrap_or(0),
            u64::try_from(wire.allocated_channels).unwrap_or(0),
        )
    }
}

/// Aggregated dashboard, ordered by area code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(rename = "statsByAreaCode")]
    pub by_area_code: BTreeMap<String, AreaCodeStats>,
    #[serde(rename = "totalNSOTrunks")]
    pub total_nso_trunks: u64,
    #[serde(rename = "totalVNOTrunks")]
    pub total_vno_trunks: u64,
    #[serde(rename = "totalDIDs")]
    pub total_dids: u64,
}

impl DashboardStats {
    /// Normalize the server's precomputed stats.
    pub fn from_wire(wire: &DashboardResponse) -> Self {
        Self {
            by_area_code: wire
                .stats_by_area_code
                .iter()
                .map(|(code, stats)| (code.clone(), AreaCodeStats::from_wire(stats)))
                .collect(),
            total_nso_trunks: wire.total_nso_trunks,
            total_vno_trunks: wire.total_vno_trunks,
            total_dids: wire.total_dids,
        }
    }
}

/// Recompute the dashboard from raw record lists.
pub fn aggregate(
    nso: &[NsoTrunk],
    vno: &[VnoTrunk],
    mappings: &[TrunkMapping],
    dids: &[Did],
) -> DashboardStats {
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut area_of: HashMap<RecordId, &str> = HashMap::with_capacity(nso.len());

    for trunk in nso {
        totals.entry(trunk.fields.area_code.clone()).or_default().0 +=
            non_negative(trunk.fields.channels);
        area_of.insert(trunk.id, trunk.fields.area_code.as_str());
    }

    for mapping in mappings {
        // Dangling mappings have no area code to charge.
        let Some(area) = area_of.get(&mapping.fields.nso_trunk_id) else {
            continue;
        };
        if let Some(entry) = totals.get_mut(*area) {
            entry.1 += non_negative(mapping.fields.allocated_channels);
        }
    }

    DashboardStats {
        by_area_code: totals
            .into_iter()
            .map(|(code, (total, allocated))| (code, AreaCodeStats::from_totals(total, allocated)))
            .collect(),
        total_nso_trunks: count(nso.len()),
        total_vno_trunks: count(vno.len()),
        total_dids: count(dids.len()),
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// `round(100 * allocated / total)` in integers; 0 when there is no capacity.
fn utilization_percent(total: u64, allocated: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let total = u128::from(total);
    let scaled = (200 * u128::from(allocated) + total) / (2 * total);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Negative channel counts hold no capacity.
fn non_negative(channels: i64) -> u64 {
    u64::try_from(channels).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{
        DidFields, DidStatus, NsoTrunkFields, Record, TrunkMappingFields, TrunkStatus, TrunkType,
        VnoTrunkFields,
    };

    fn nso(id: u64, area: &str, channels: i64) -> NsoTrunk {
        Record::new(
            RecordId(id),
            NsoTrunkFields {
                service_id: format!("NSO-{id}"),
                pilot_number: String::new(),
                channels,
                area_code: area.into(),
                status: TrunkStatus::Active,
            },
        )
    }

    fn vno(id: u64, area: &str, channels: i64) -> VnoTrunk {
        Record::new(
            RecordId(id),
            VnoTrunkFields {
                service_id: format!("VNO-{id}"),
                pilot_number: String::new(),
                channels,
                area_code: area.into(),
                status: TrunkStatus::Active,
                customer_id: None,
            },
        )
    }

    fn mapping(id: u64, nso_id: u64, allocated: i64) -> TrunkMapping {
        Record::new(
            RecordId(id),
            TrunkMappingFields {
                nso_trunk_id: RecordId(nso_id),
                vno_trunk_id: RecordId(100),
                allocated_channels: allocated,
            },
        )
    }

    fn did(id: u64) -> Did {
        Record::new(
            RecordId(id),
            DidFields {
                did_number: format!("212555{id:04}"),
                trunk_id: RecordId(1),
                trunk_type: TrunkType::Vno,
                status: DidStatus::Available,
            },
        )
    }

    #[test]
    fn example_area_code_212() {
        let stats = aggregate(
            &[nso(1, "212", 100)],
            &[vno(10, "212", 30)],
            &[mapping(1, 1, 30)],
            &[did(1), did(2)],
        );

        assert_eq!(
            stats.by_area_code["212"],
            AreaCodeStats {
                total_channels: 100,
                allocated_channels: 30,
                remaining_channels: 70,
                utilization: 30,
            }
        );
        assert_eq!(stats.total_nso_trunks, 1);
        assert_eq!(stats.total_vno_trunks, 1);
        assert_eq!(stats.total_dids, 2);
    }

    #[test]
    fn vno_channels_do_not_add_capacity() {
        let stats = aggregate(&[nso(1, "646", 20)], &[vno(2, "646", 500)], &[], &[]);
        assert_eq!(stats.by_area_code["646"].total_channels, 20);
        assert_eq!(stats.by_area_code.len(), 1);
    }

    #[test]
    fn over_allocation_floors_remaining_but_not_utilization() {
        let stats = aggregate(
            &[nso(1, "718", 10)],
            &[],
            &[mapping(1, 1, 8), mapping(2, 1, 7)],
            &[],
        );
        let area = stats.by_area_code["718"];
        assert_eq!(area.allocated_channels, 15);
        assert_eq!(area.remaining_channels, 0);
        assert_eq!(area.utilization, 150);
    }

    #[test]
    fn dangling_mappings_are_ignored() {
        let stats = aggregate(&[nso(1, "212", 50)], &[], &[mapping(1, 99, 40)], &[]);
        assert_eq!(stats.by_area_code["212"].allocated_channels, 0);
    }

    #[test]
    fn zero_capacity_has_zero_utilization() {
        let stats = aggregate(&[nso(1, "305", 0)], &[], &[mapping(1, 1, 4)], &[]);
        let area = stats.by_area_code["305"];
        assert_eq!(area.utilization, 0);
        assert_eq!(area.remaining_channels, 0);
    }

    #[test]
    fn utilization_rounds_half_up() {
        assert_eq!(utilization_percent(3, 1), 33);
        assert_eq!(utilization_percent(3, 2), 67);
        assert_eq!(utilization_percent(8, 1), 13);
        assert_eq!(utilization_percent(200, 1), 1);
        assert_eq!(utilization_percent(400, 1), 0);
    }

    #[test]
    fn areas_are_ordered_and_summed() {
        let stats = aggregate(
            &[nso(1, "646", 10), nso(2, "212", 5), nso(3, "646", 15)],
            &[],
            &[mapping(1, 3, 5)],
            &[],
        );
        let codes: Vec<_> = stats.by_area_code.keys().cloned().collect();
        assert_eq!(codes, ["212", "646"]);
        assert_eq!(stats.by_area_code["646"], AreaCodeStats::from_totals(25, 5));
        assert_eq!(stats.by_area_code["646"].utilization, 20);
    }

    #[test]
    fn wire_stats_are_normalized() {
        let wire = DashboardResponse {
            stats_by_area_code: BTreeMap::from([(
                "212".to_string(),
                AreaCodeStatsWire {
                    total_channels: 10,
                    allocated_channels: 12,
                    remaining_channels: -2,
                    utilization: 120.0,
                },
            )]),
            total_nso_trunks: 1,
            total_vno_trunks: 0,
            total_dids: 0,
        };

        let stats = DashboardStats::from_wire(&wire);
        assert_eq!(stats.by_area_code["212"].remaining_channels, 0);
        assert_eq!(stats.by_area_code["212"].utilization, 120);
    }

    #[test]
    fn wire_utilization_ignores_server_rounding() {
        let wire = AreaCodeStatsWire {
            total_channels: 10_000,
            allocated_channels: 4449,
            remaining_channels: 5551,
            utilization: 44.5,
        };
        let stats = AreaCodeStats::from_wire(&wire);
        assert_eq!(stats.utilization, 44);
        assert_eq!(stats.remaining_channels, 5551);
        assert_eq!(stats, AreaCodeStats::from_totals(10_000, 4449));
    }

    #[test]
    fn negative_channels_add_no_capacity() {
        let stats = aggregate(
            &[nso(1, "212", 40), nso(2, "212", -5)],
            &[],
            &[mapping(1, 2, -3)],
            &[],
        );
        let area = stats.by_area_code["212"];
        assert_eq!(area.total_channels, 40);
        assert_eq!(area.allocated_channels, 0);
    }
}
