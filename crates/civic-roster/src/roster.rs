//! Roster loading.
//!
//! The roster file is the legislature's JSON export, either
//! `{ "legislators": [ ... ] }` or a bare array. Entries use the camelCase
//! field names of the export (`formatName`, `serviceStart`, `legislation`).

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use civic_core::error::{CivicError, Result};
use civic_core::types::{district_code, Chamber, Legislator, Party};

/// Ordered list of every sitting legislator.
///
/// Order is significant: when two entries claim the same seat, the earlier
/// one is the one the matcher returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    legislators: Vec<Legislator>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Wrapped { legislators: Vec<RosterEntry> },
    Bare(Vec<RosterEntry>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    house: String,
    district: serde_json::Value,
    #[serde(default)]
    party: String,
    #[serde(default)]
    format_name: String,
    #[serde(default)]
    profession: String,
    #[serde(default)]
    education: String,
    #[serde(default)]
    service_start: String,
    #[serde(default)]
    counties: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    cell: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    legislation: String,
}

impl RosterEntry {
    fn into_legislator(self, index: usize) -> Result<Legislator> {
        let house: Chamber = self.house.parse().map_err(|_| {
            CivicError::Roster(format!("entry {}: unknown house code {:?}", index, self.house))
        })?;
        let district = district_code(&self.district).ok_or_else(|| {
            CivicError::Roster(format!("entry {}: missing district", index))
        })?;

        Ok(Legislator {
            house,
            district,
            party: Party::from_code(&self.party),
            format_name: self.format_name,
            profession: self.profession,
            education: self.education,
            service_start: self.service_start,
            counties: self.counties,
            email: self.email,
            cell: self.cell,
            image: self.image,
            legislation_url: self.legislation,
        })
    }
}

impl Roster {
    pub fn new(legislators: Vec<Legislator>) -> Self {
        Self { legislators }
    }

    /// Parse a roster from its JSON export.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: RosterFile = serde_json::from_str(json)?;
        let entries = match file {
            RosterFile::Wrapped { legislators } => legislators,
            RosterFile::Bare(entries) => entries,
        };

        let legislators = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_legislator(i))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(legislators))
    }

    /// Load a roster file, reporting any seat claimed more than once.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let roster = Self::from_json_str(&content)?;

        for (chamber, district) in roster.duplicate_seats() {
            warn!(
                chamber = %chamber,
                district = %district,
                "Roster lists more than one legislator for a seat; the first entry wins"
            );
        }

        info!(
            legislators = roster.len(),
            "Roster loaded from {}",
            path.display()
        );
        Ok(roster)
    }

    pub fn legislators(&self) -> &[Legislator] {
        &self.legislators
    }

    pub fn iter(&self) -> impl Iterator<Item = &Legislator> {
        self.legislators.iter()
    }

    pub fn len(&self) -> usize {
        self.legislators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legislators.is_empty()
    }

    /// Seats (chamber + district) that appear more than once, in roster order.
    pub fn duplicate_seats(&self) -> Vec<(Chamber, String)> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for legislator in &self.legislators {
            let seat = (legislator.house, legislator.district.clone());
            if !seen.insert(seat.clone()) && reported.insert(seat.clone()) {
                duplicates.push(seat);
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "legislators": [
            {
                "house": "S",
                "district": "7",
                "party": "R",
                "formatName": "Deidre Henderson",
                "profession": "Business owner",
                "education": "BA",
                "serviceStart": "2013",
                "counties": "Utah",
                "email": "dhenderson@le.utah.gov",
                "cell": "801-555-0100",
                "image": "https://le.utah.gov/images/legislator/HENDED.jpg",
                "legislation": "https://le.utah.gov/~2018/bills/HENDED.htm"
            },
            { "house": "H", "district": 28, "party": "D", "formatName": "Brian King" }
        ]
    }"#;

    #[test]
    fn test_parse_wrapped_roster() {
        let roster = Roster::from_json_str(SAMPLE).unwrap();
        assert_eq!(roster.len(), 2);

        let senator = &roster.legislators()[0];
        assert_eq!(senator.house, Chamber::Senate);
        assert_eq!(senator.district, "7");
        assert_eq!(senator.party, Party::Republican);
        assert_eq!(senator.format_name, "Deidre Henderson");
        assert_eq!(senator.service_start, "2013");
        assert_eq!(
            senator.legislation_url,
            "https://le.utah.gov/~2018/bills/HENDED.htm"
        );
    }

    #[test]
    fn test_numeric_district_normalized() {
        let roster = Roster::from_json_str(SAMPLE).unwrap();
        let rep = &roster.legislators()[1];
        assert_eq!(rep.house, Chamber::House);
        assert_eq!(rep.district, "28");
        assert_eq!(rep.party, Party::Democrat);
        assert!(rep.email.is_empty());
    }

    #[test]
    fn test_float_district_normalized() {
        let json = r#"[{ "house": "S", "district": 7.0, "party": "R", "formatName": "A" }]"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(roster.legislators()[0].district, "7");
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[{ "house": "h", "district": "1", "party": "R", "formatName": "X" }]"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.legislators()[0].house, Chamber::House);
    }

    #[test]
    fn test_unknown_house_code_rejected() {
        let json = r#"[{ "house": "X", "district": "1" }]"#;
        let err = Roster::from_json_str(json).unwrap_err();
        assert!(matches!(err, CivicError::Roster(_)));
        assert!(err.to_string().contains("entry 0"));
    }

    #[test]
    fn test_missing_district_rejected() {
        let json = r#"[{ "house": "S", "district": null }]"#;
        assert!(matches!(
            Roster::from_json_str(json),
            Err(CivicError::Roster(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Roster::from_json_str("{ not json"),
            Err(CivicError::Serialization(_))
        ));
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::from_json_str(r#"{ "legislators": [] }"#).unwrap();
        assert!(roster.is_empty());
        assert!(roster.duplicate_seats().is_empty());
    }

    #[test]
    fn test_duplicate_seats_reported_once() {
        let json = r#"[
            { "house": "S", "district": "7", "formatName": "A" },
            { "house": "S", "district": "7", "formatName": "A2" },
            { "house": "S", "district": "7", "formatName": "A3" },
            { "house": "H", "district": "7", "formatName": "B" }
        ]"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(
            roster.duplicate_seats(),
            vec![(Chamber::Senate, "7".to_string())]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Roster::load(Path::new("/does/not/exist/legislators.json"));
        assert!(matches!(result, Err(CivicError::Io(_))));
    }
}
