use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/**
 * Citizens younger than this are always `Youth`.
 */
const YOUTH_AGE_LIMIT: i32 = 30;

/**
 * Citizens this age or older are always `Senior Citizen`.
 */
const SENIOR_AGE_LIMIT: i32 = 60;

/**
 * Demographic segment derived from a citizen's age and occupation.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "Youth")]
    Youth,
    #[serde(rename = "Senior Citizen")]
    SeniorCitizen,
    #[serde(rename = "Farmer")]
    Farmer,
    #[serde(rename = "MSME Owner")]
    MsmeOwner,
    #[serde(rename = "General")]
    General,
}

impl Segment {
    /**
     * Label stored in the database and returned by the API.
     */
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Youth => "Youth",
            Segment::SeniorCitizen => "Senior Citizen",
            Segment::Farmer => "Farmer",
            Segment::MsmeOwner => "MSME Owner",
            Segment::General => "General",
        }
    }

    /**
     * Determines the segment of a citizen. Rules are evaluated in order and the first match wins.
     *
     * # Arguments
     * `age`: Age of the citizen in years.
     * `occupation`: Free-text occupation, matched case-insensitively.
     *
     * # Returns
     * The derived segment.
     */
    pub fn determine(age: i32, occupation: &str) -> Self {
        let occupation = occupation.to_ascii_lowercase();
        if age < YOUTH_AGE_LIMIT {
            Segment::Youth
        } else if age >= SENIOR_AGE_LIMIT {
            Segment::SeniorCitizen
        } else if occupation.contains("farmer") {
            Segment::Farmer
        } else if occupation.contains("business") {
            Segment::MsmeOwner
        } else {
            Segment::General
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Youth" => Ok(Segment::Youth),
            "Senior Citizen" => Ok(Segment::SeniorCitizen),
            "Farmer" => Ok(Segment::Farmer),
            "MSME Owner" => Ok(Segment::MsmeOwner),
            "General" => Ok(Segment::General),
            other => Err(format!("Unknown segment {other}")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_young_citizens_are_youth_regardless_of_occupation() {
        for age in [0, 18, 25, 29] {
            assert_eq!(Segment::determine(age, "Farmer"), Segment::Youth);
            assert_eq!(Segment::determine(age, "small business"), Segment::Youth);
            assert_eq!(Segment::determine(age, ""), Segment::Youth);
        }
    }

    #[test]
    fn test_seniors_win_over_occupation() {
        for age in [60, 61, 75, 102] {
            assert_eq!(Segment::determine(age, "farmer"), Segment::SeniorCitizen);
            assert_eq!(Segment::determine(age, "Business owner"), Segment::SeniorCitizen);
        }
    }

    #[test]
    fn test_farmer_matches_case_insensitive_substring() {
        assert_eq!(Segment::determine(45, "Farmer Singh"), Segment::Farmer);
        assert_eq!(Segment::determine(30, "dairy FARMER"), Segment::Farmer);
        assert_eq!(Segment::determine(59, "farmers cooperative"), Segment::Farmer);
    }

    #[test]
    fn test_farmer_checked_before_business() {
        assert_eq!(Segment::determine(40, "farmer and business"), Segment::Farmer);
    }

    #[test]
    fn test_business_is_msme_owner() {
        assert_eq!(Segment::determine(35, "Family Business"), Segment::MsmeOwner);
        assert_eq!(Segment::determine(50, "businessman"), Segment::MsmeOwner);
    }

    #[test]
    fn test_other_occupations_are_general() {
        assert_eq!(Segment::determine(30, "Tailor"), Segment::General);
        assert_eq!(Segment::determine(59, ""), Segment::General);
        assert_eq!(Segment::determine(45, "farm hand"), Segment::General);
    }

    #[test]
    fn test_labels_parse_back() {
        for segment in [Segment::Youth, Segment::SeniorCitizen, Segment::Farmer, Segment::MsmeOwner, Segment::General] {
            assert_eq!(segment.as_str().parse::<Segment>(), Ok(segment));
        }
        assert!("Retired".parse::<Segment>().is_err());
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Segment::SeniorCitizen).unwrap(), "\"Senior Citizen\"");
        assert_eq!(serde_json::to_string(&Segment::MsmeOwner).unwrap(), "\"MSME Owner\"");
    }
}
