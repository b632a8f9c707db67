//! Enumeration types for the evacuation planner.
//!
//! Disaster classification, place categories reported by the geo provider,
//! travel modes, and plan provenance.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Disaster classification
// ---------------------------------------------------------------------------

/// The kind of hazard an evacuation is planned against.
///
/// Drives which shelter categories are searched, the search radius, the
/// hard exclusion set, and hazard-specific route penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DisasterType {
    /// Riverine, coastal, or flash flooding.
    Flood,
    /// Wildfire or large urban fire.
    Fire,
    /// Seismic event.
    Earthquake,
    /// Tornado.
    Tornado,
    /// Hurricane, cyclone, or typhoon.
    Hurricane,
    /// Tsunami.
    Tsunami,
    /// Unclassified emergency.
    General,
}

impl DisasterType {
    /// All disaster types, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Flood,
        Self::Fire,
        Self::Earthquake,
        Self::Tornado,
        Self::Hurricane,
        Self::Tsunami,
        Self::General,
    ];

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Fire => "fire",
            Self::Earthquake => "earthquake",
            Self::Tornado => "tornado",
            Self::Hurricane => "hurricane",
            Self::Tsunami => "tsunami",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for DisasterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisasterType {
    type Err = ValidationError;

    /// Parse a disaster type, accepting common aliases case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "flood" | "flooding" | "flash_flood" => Ok(Self::Flood),
            "fire" | "wildfire" | "bushfire" => Ok(Self::Fire),
            "earthquake" | "quake" | "seismic" => Ok(Self::Earthquake),
            "tornado" | "twister" => Ok(Self::Tornado),
            "hurricane" | "cyclone" | "typhoon" => Ok(Self::Hurricane),
            "tsunami" => Ok(Self::Tsunami),
            "general" | "other" => Ok(Self::General),
            _ => Err(ValidationError::UnknownDisasterType(s.to_owned())),
        }
    }
}

/// How severe the hazard is reported to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Extreme severity.
    Extreme,
}

impl Severity {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }

    /// Whether people should leave without waiting for further guidance.
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::High | Self::Extreme)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "extreme" | "critical" => Ok(Self::Extreme),
            _ => Err(ValidationError::UnknownSeverity(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Place categories
// ---------------------------------------------------------------------------

/// Category of a place returned by the geo provider.
///
/// The first nine variants are shelter categories the planner searches for.
/// The remaining named variants exist so that structurally unsafe places
/// can be recognised and excluded; anything else maps to [`Self::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PlaceCategory {
    /// Hospital or emergency medical facility.
    Hospital,
    /// Police station.
    Police,
    /// Fire station.
    FireStation,
    /// School.
    School,
    /// Stadium or arena.
    Stadium,
    /// Community center.
    CommunityCenter,
    /// Government office.
    GovernmentOffice,
    /// University campus.
    University,
    /// Park or open ground.
    Park,
    /// Subway or underground transit station.
    SubwayStation,
    /// Parking structure, often below ground.
    Parking,
    /// Basement-level location.
    Basement,
    /// Fuel station.
    GasStation,
    /// Chemical or hazardous material storage.
    ChemicalStorage,
    /// Anything the planner has no rule for.
    Other,
}

impl PlaceCategory {
    /// Map a provider place-type string onto a category.
    ///
    /// Unrecognised types yield [`Self::Other`].
    pub fn from_provider_type(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "hospital" => Self::Hospital,
            "police" => Self::Police,
            "fire_station" => Self::FireStation,
            "school" | "primary_school" | "secondary_school" => Self::School,
            "stadium" => Self::Stadium,
            "community_center" => Self::CommunityCenter,
            "government_office" | "local_government_office" | "city_hall" => {
                Self::GovernmentOffice
            }
            "university" => Self::University,
            "park" => Self::Park,
            "subway_station" | "transit_station" => Self::SubwayStation,
            "parking" | "underground_parking" => Self::Parking,
            "basement" => Self::Basement,
            "gas_station" | "fuel" => Self::GasStation,
            "chemical_storage" | "hazardous_materials" => Self::ChemicalStorage,
            _ => Self::Other,
        }
    }

    /// The type string sent to the geo provider when searching this category.
    pub const fn as_provider_type(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Police => "police",
            Self::FireStation => "fire_station",
            Self::School => "school",
            Self::Stadium => "stadium",
            Self::CommunityCenter => "community_center",
            Self::GovernmentOffice => "local_government_office",
            Self::University => "university",
            Self::Park => "park",
            Self::SubwayStation => "subway_station",
            Self::Parking => "parking",
            Self::Basement => "basement",
            Self::GasStation => "gas_station",
            Self::ChemicalStorage => "chemical_storage",
            Self::Other => "point_of_interest",
        }
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_provider_type())
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Travel mode requested from the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TravelMode {
    /// Motor vehicle.
    Driving,
    /// On foot.
    Walking,
}

impl TravelMode {
    /// Lowercase wire name, as used in provider query strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
        }
    }
}

/// Which planning path produced an [`EvacuationPlan`](crate::EvacuationPlan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum PlanSource {
    /// The advisory service produced the plan.
    Advisory,
    /// The deterministic geo-based fallback produced the plan.
    GeoFallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disaster_type_accepts_aliases() {
        assert_eq!("Wildfire".parse::<DisasterType>(), Ok(DisasterType::Fire));
        assert_eq!("flash-flood".parse::<DisasterType>(), Ok(DisasterType::Flood));
        assert_eq!(" Typhoon ".parse::<DisasterType>(), Ok(DisasterType::Hurricane));
        assert_eq!("other".parse::<DisasterType>(), Ok(DisasterType::General));
    }

    #[test]
    fn disaster_type_rejects_unknown() {
        let result = "meteor".parse::<DisasterType>();
        assert_eq!(
            result,
            Err(ValidationError::UnknownDisasterType("meteor".to_owned()))
        );
    }

    #[test]
    fn disaster_type_round_trips_through_display() {
        for disaster in DisasterType::ALL {
            assert_eq!(disaster.to_string().parse::<DisasterType>(), Ok(disaster));
        }
    }

    #[test]
    fn severity_parsing() {
        assert_eq!("EXTREME".parse::<Severity>(), Ok(Severity::Extreme));
        assert_eq!("moderate".parse::<Severity>(), Ok(Severity::Medium));
        assert!("catastrophic".parse::<Severity>().is_err());
        assert!(Severity::High.is_urgent());
        assert!(!Severity::Low.is_urgent());
    }

    #[test]
    fn provider_type_mapping() {
        assert_eq!(
            PlaceCategory::from_provider_type("local_government_office"),
            PlaceCategory::GovernmentOffice
        );
        assert_eq!(
            PlaceCategory::from_provider_type("Gas_Station"),
            PlaceCategory::GasStation
        );
        assert_eq!(
            PlaceCategory::from_provider_type("bakery"),
            PlaceCategory::Other
        );
        assert_eq!(
            PlaceCategory::from_provider_type(PlaceCategory::FireStation.as_provider_type()),
            PlaceCategory::FireStation
        );
    }

    #[test]
    fn plan_source_wire_names() {
        let json = serde_json::to_string(&PlanSource::GeoFallback).unwrap_or_default();
        assert_eq!(json, "\"geo-fallback\"");
        let json = serde_json::to_string(&PlanSource::Advisory).unwrap_or_default();
        assert_eq!(json, "\"advisory\"");
    }
}
