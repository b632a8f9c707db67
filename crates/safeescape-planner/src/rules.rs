//! Disaster-type rule tables.
//!
//! One immutable [`DisasterProfile`] per [`DisasterType`]. Each profile
//! encodes which shelter categories are structurally appropriate for the
//! hazard, how far to search, which place categories must never be offered,
//! which destinations earn a bonus, and which route features are dangerous.
//!
//! | Type | Radius | +3 shelter | +2 shelter |
//! |------|--------|------------|------------|
//! | flood | 15 km | stadium | school |
//! | fire | 8 km | fire station | hospital |
//! | earthquake | 10 km | park | stadium |
//! | tornado | 20 km | community center | school |
//! | hurricane | 20 km | community center | school |
//! | tsunami | 10 km | stadium | school |
//! | general | 10 km | hospital | police |

use safeescape_types::{DisasterType, PlaceCategory, TravelMode};

/// Suitability every surviving candidate starts from.
pub const BASE_SUITABILITY: f64 = 3.0;

/// Suitability bonus for the category most associated with the hazard.
pub const PRIMARY_SHELTER_BONUS: f64 = 3.0;

/// Suitability bonus for the runner-up category.
pub const SECONDARY_SHELTER_BONUS: f64 = 2.0;

/// Route-instruction keywords that indicate a hazard-specific danger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardKeywordRule {
    /// Lowercase substrings searched for in step instructions.
    pub keywords: &'static [&'static str],
    /// Score penalty applied once if any keyword matches.
    pub penalty: f64,
}

/// Static planning rules for one disaster type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisasterProfile {
    /// Shelter categories queried, in priority order.
    pub categories: &'static [PlaceCategory],
    /// Unclamped search radius.
    pub radius_meters: u32,
    /// Categories that are never offered as a safe zone.
    pub excluded: &'static [PlaceCategory],
    /// Category most associated with the hazard (+3 suitability).
    pub primary_shelter: PlaceCategory,
    /// Runner-up category (+2 suitability).
    pub secondary_shelter: PlaceCategory,
    /// Mode used when routing to candidates.
    pub travel_mode: TravelMode,
    /// Dangerous route features, if any.
    pub hazard_keywords: Option<HazardKeywordRule>,
    /// Route score bonuses by destination category.
    pub destination_bonuses: &'static [(PlaceCategory, f64)],
}

impl DisasterProfile {
    /// Whether `category` is in the hard exclusion set.
    pub fn excludes(&self, category: PlaceCategory) -> bool {
        self.excluded.contains(&category)
    }

    /// Suitability score for a candidate of `category`.
    pub fn suitability(&self, category: PlaceCategory) -> f64 {
        if category == self.primary_shelter {
            BASE_SUITABILITY + PRIMARY_SHELTER_BONUS
        } else if category == self.secondary_shelter {
            BASE_SUITABILITY + SECONDARY_SHELTER_BONUS
        } else {
            BASE_SUITABILITY
        }
    }

    /// Route score bonus for reaching a destination of `category`.
    pub fn destination_bonus(&self, category: PlaceCategory) -> f64 {
        self.destination_bonuses
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0.0, |&(_, bonus)| bonus)
    }

    /// Penalty for a route whose instructions mention a hazard keyword.
    ///
    /// Matching is case-insensitive; the penalty is applied at most once
    /// regardless of how many steps match.
    pub fn hazard_penalty<S: AsRef<str>>(&self, step_instructions: &[S]) -> f64 {
        let Some(rule) = self.hazard_keywords else {
            return 0.0;
        };
        let hit = step_instructions.iter().any(|step| {
            let lowered = step.as_ref().to_lowercase();
            rule.keywords.iter().any(|k| lowered.contains(k))
        });
        if hit { rule.penalty } else { 0.0 }
    }
}

const FLOOD: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::School,
        PlaceCategory::Stadium,
        PlaceCategory::GovernmentOffice,
        PlaceCategory::University,
    ],
    radius_meters: 15_000,
    excluded: &[
        PlaceCategory::SubwayStation,
        PlaceCategory::Parking,
        PlaceCategory::Basement,
    ],
    primary_shelter: PlaceCategory::Stadium,
    secondary_shelter: PlaceCategory::School,
    // Driving through flood water is unsafe.
    travel_mode: TravelMode::Walking,
    hazard_keywords: Some(HazardKeywordRule {
        keywords: &["tunnel", "underpass"],
        penalty: 40.0,
    }),
    destination_bonuses: &[(PlaceCategory::Stadium, 15.0), (PlaceCategory::School, 10.0)],
};

const FIRE: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::Hospital,
        PlaceCategory::Police,
        PlaceCategory::FireStation,
        PlaceCategory::School,
    ],
    radius_meters: 8_000,
    excluded: &[PlaceCategory::GasStation, PlaceCategory::ChemicalStorage],
    primary_shelter: PlaceCategory::FireStation,
    secondary_shelter: PlaceCategory::Hospital,
    travel_mode: TravelMode::Driving,
    hazard_keywords: None,
    destination_bonuses: &[
        (PlaceCategory::FireStation, 20.0),
        (PlaceCategory::Hospital, 15.0),
    ],
};

const EARTHQUAKE: DisasterProfile = DisasterProfile {
    categories: &[PlaceCategory::Park, PlaceCategory::Stadium, PlaceCategory::School],
    radius_meters: 10_000,
    excluded: &[PlaceCategory::SubwayStation, PlaceCategory::Basement],
    primary_shelter: PlaceCategory::Park,
    secondary_shelter: PlaceCategory::Stadium,
    travel_mode: TravelMode::Driving,
    hazard_keywords: Some(HazardKeywordRule {
        keywords: &["bridge"],
        penalty: 30.0,
    }),
    destination_bonuses: &[(PlaceCategory::Park, 15.0), (PlaceCategory::Stadium, 10.0)],
};

const TORNADO: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::CommunityCenter,
        PlaceCategory::School,
        PlaceCategory::Stadium,
    ],
    radius_meters: 20_000,
    excluded: &[PlaceCategory::GasStation, PlaceCategory::Parking],
    primary_shelter: PlaceCategory::CommunityCenter,
    secondary_shelter: PlaceCategory::School,
    travel_mode: TravelMode::Driving,
    hazard_keywords: None,
    destination_bonuses: &[],
};

const HURRICANE: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::CommunityCenter,
        PlaceCategory::School,
        PlaceCategory::Stadium,
    ],
    radius_meters: 20_000,
    excluded: &[
        PlaceCategory::GasStation,
        PlaceCategory::SubwayStation,
        PlaceCategory::Basement,
    ],
    primary_shelter: PlaceCategory::CommunityCenter,
    secondary_shelter: PlaceCategory::School,
    travel_mode: TravelMode::Driving,
    hazard_keywords: None,
    destination_bonuses: &[],
};

const TSUNAMI: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::School,
        PlaceCategory::Stadium,
        PlaceCategory::GovernmentOffice,
    ],
    radius_meters: 10_000,
    excluded: &[
        PlaceCategory::SubwayStation,
        PlaceCategory::Parking,
        PlaceCategory::Basement,
    ],
    primary_shelter: PlaceCategory::Stadium,
    secondary_shelter: PlaceCategory::School,
    travel_mode: TravelMode::Driving,
    hazard_keywords: None,
    destination_bonuses: &[],
};

const GENERAL: DisasterProfile = DisasterProfile {
    categories: &[
        PlaceCategory::Hospital,
        PlaceCategory::Police,
        PlaceCategory::FireStation,
        PlaceCategory::School,
    ],
    radius_meters: 10_000,
    excluded: &[PlaceCategory::GasStation, PlaceCategory::ChemicalStorage],
    primary_shelter: PlaceCategory::Hospital,
    secondary_shelter: PlaceCategory::Police,
    travel_mode: TravelMode::Driving,
    hazard_keywords: None,
    destination_bonuses: &[],
};

/// Look up the rule table for a disaster type.
pub const fn profile(disaster_type: DisasterType) -> &'static DisasterProfile {
    match disaster_type {
        DisasterType::Flood => &FLOOD,
        DisasterType::Fire => &FIRE,
        DisasterType::Earthquake => &EARTHQUAKE,
        DisasterType::Tornado => &TORNADO,
        DisasterType::Hurricane => &HURRICANE,
        DisasterType::Tsunami => &TSUNAMI,
        DisasterType::General => &GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < f64::EPSILON
    }

    #[test]
    fn category_tables() {
        assert_eq!(
            profile(DisasterType::Flood).categories,
            &[
                PlaceCategory::School,
                PlaceCategory::Stadium,
                PlaceCategory::GovernmentOffice,
                PlaceCategory::University,
            ]
        );
        assert_eq!(
            profile(DisasterType::Earthquake).categories,
            &[PlaceCategory::Park, PlaceCategory::Stadium, PlaceCategory::School]
        );
        assert_eq!(
            profile(DisasterType::Tornado).categories,
            profile(DisasterType::Hurricane).categories
        );
        assert_eq!(
            profile(DisasterType::Fire).categories,
            profile(DisasterType::General).categories
        );
    }

    #[test]
    fn radius_table() {
        assert_eq!(profile(DisasterType::Flood).radius_meters, 15_000);
        assert_eq!(profile(DisasterType::Fire).radius_meters, 8_000);
        assert_eq!(profile(DisasterType::Tornado).radius_meters, 20_000);
        assert_eq!(profile(DisasterType::Hurricane).radius_meters, 20_000);
        assert_eq!(profile(DisasterType::Earthquake).radius_meters, 10_000);
        assert_eq!(profile(DisasterType::General).radius_meters, 10_000);
    }

    #[test]
    fn only_flood_walks() {
        for disaster in DisasterType::ALL {
            let expected = if disaster == DisasterType::Flood {
                TravelMode::Walking
            } else {
                TravelMode::Driving
            };
            assert_eq!(profile(disaster).travel_mode, expected, "{disaster}");
        }
    }

    #[test]
    fn queried_categories_are_never_excluded() {
        for disaster in DisasterType::ALL {
            let p = profile(disaster);
            for category in p.categories {
                assert!(!p.excludes(*category), "{disaster} queries excluded {category}");
            }
        }
    }

    #[test]
    fn suitability_bonuses() {
        let fire = profile(DisasterType::Fire);
        assert!(close(fire.suitability(PlaceCategory::FireStation), 6.0));
        assert!(close(fire.suitability(PlaceCategory::Hospital), 5.0));
        assert!(close(fire.suitability(PlaceCategory::School), 3.0));

        let quake = profile(DisasterType::Earthquake);
        assert!(close(quake.suitability(PlaceCategory::Park), 6.0));
    }

    #[test]
    fn destination_bonuses() {
        let flood = profile(DisasterType::Flood);
        assert!(close(flood.destination_bonus(PlaceCategory::Stadium), 15.0));
        assert!(close(flood.destination_bonus(PlaceCategory::School), 10.0));
        assert!(close(flood.destination_bonus(PlaceCategory::Park), 0.0));

        let fire = profile(DisasterType::Fire);
        assert!(close(fire.destination_bonus(PlaceCategory::FireStation), 20.0));
        assert!(close(fire.destination_bonus(PlaceCategory::Hospital), 15.0));

        let quake = profile(DisasterType::Earthquake);
        assert!(close(quake.destination_bonus(PlaceCategory::Park), 15.0));
        assert!(close(quake.destination_bonus(PlaceCategory::Stadium), 10.0));

        assert!(close(
            profile(DisasterType::Tsunami).destination_bonus(PlaceCategory::Stadium),
            0.0
        ));
    }

    #[test]
    fn hazard_keywords_match_case_insensitively_once() {
        let flood = profile(DisasterType::Flood);
        let steps = ["Head north", "Take the Underpass", "Continue through the tunnel"];
        assert!(close(flood.hazard_penalty(steps.as_slice()), 40.0));
        assert!(close(flood.hazard_penalty(["Turn left onto Main St"].as_slice()), 0.0));

        let quake = profile(DisasterType::Earthquake);
        assert!(close(quake.hazard_penalty(["Cross the BRIDGE"].as_slice()), 30.0));

        // Fire has no keyword rule even if a bridge appears.
        assert!(close(
            profile(DisasterType::Fire).hazard_penalty(["Cross the bridge"].as_slice()),
            0.0
        ));
    }
}
