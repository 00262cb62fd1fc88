//! Fixed translation table between producer field names and canonical names.

use std::fmt;

/// A per-participant field of the race results schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceField {
    Username,
    FullName,
    RaceTime,
    AverageSpeed,
    BoostsUsed,
    Collisions,
    DistanceCovered,
    Rank,
}

impl RaceField {
    /// All fields in producer order.
    pub const ALL: [RaceField; 8] = [
        Self::Username,
        Self::FullName,
        Self::RaceTime,
        Self::AverageSpeed,
        Self::BoostsUsed,
        Self::Collisions,
        Self::DistanceCovered,
        Self::Rank,
    ];

    /// Name used by the race simulation.
    #[must_use]
    pub const fn raw_name(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FullName => "fullName",
            Self::RaceTime => "raceTime",
            Self::AverageSpeed => "averageSpeed",
            Self::BoostsUsed => "boostsUsed",
            Self::Collisions => "collisions",
            Self::DistanceCovered => "distanceCovered",
            Self::Rank => "rank",
        }
    }

    /// Name of the corresponding `RaceResult` field as serialized.
    #[must_use]
    pub const fn canonical_name(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FullName => "fullName",
            Self::RaceTime => "raceTimeSeconds",
            Self::AverageSpeed => "averageSpeedKmh",
            Self::BoostsUsed => "boostsUsed",
            Self::Collisions => "collisions",
            Self::DistanceCovered => "distanceCoveredKm",
            Self::Rank => "rank",
        }
    }

    /// Whether a race-tier record is rejected without this field.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Username | Self::RaceTime | Self::AverageSpeed | Self::DistanceCovered
        )
    }

    pub fn from_raw_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.raw_name() == name)
    }
}

impl fmt::Display for RaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_table() {
        assert_eq!(RaceField::RaceTime.canonical_name(), "raceTimeSeconds");
        assert_eq!(
            RaceField::from_raw_name("distanceCovered"),
            Some(RaceField::DistanceCovered)
        );
        assert_eq!(RaceField::from_raw_name("Distance Covered (km)"), None);
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = RaceField::ALL
            .into_iter()
            .filter(RaceField::is_required)
            .collect();
        assert_eq!(
            required,
            vec![
                RaceField::Username,
                RaceField::RaceTime,
                RaceField::AverageSpeed,
                RaceField::DistanceCovered,
            ]
        );
    }
}
