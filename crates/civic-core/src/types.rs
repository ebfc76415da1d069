//! Shared domain types for the resolution pipeline.
//!
//! Everything that crosses a crate boundary lives here: coordinates, district
//! pairs, legislators, the per-session context record and its partial update.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CivicError, Result};

// =============================================================================
// Identifiers and time
// =============================================================================

/// Identifier of one conversation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Location and districts
// =============================================================================

/// A WGS84 coordinate pair supplied by the location provider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CivicError::InvalidLocation {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The house and senate districts covering one point.
///
/// Both codes are opaque strings and are always present together.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistrictPair {
    pub house_district: String,
    pub senate_district: String,
}

impl DistrictPair {
    pub fn new(house_district: impl Into<String>, senate_district: impl Into<String>) -> Self {
        Self {
            house_district: house_district.into(),
            senate_district: senate_district.into(),
        }
    }

    /// District code for the given chamber.
    pub fn district(&self, chamber: Chamber) -> &str {
        match chamber {
            Chamber::Senate => &self.senate_district,
            Chamber::House => &self.house_district,
        }
    }
}

/// Largest float magnitude still formatted as an integer code (2^53).
const MAX_INTEGRAL_CODE: f64 = 9_007_199_254_740_992.0;

/// Normalize a district code from a JSON value.
///
/// Codes arrive as numbers from the spatial service and as strings from the
/// roster; both become plain strings (`28`, `28.0` and `"28"` are the same
/// district).
/// Null, blank and non-scalar values yield `None`.
pub fn district_code(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            // Attribute tables may store integral codes as doubles (28.0)
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_CODE => {
                    Some((f as i64).to_string())
                }
                _ => Some(n.to_string()),
            }
        }
        _ => None,
    }
}

// =============================================================================
// Chamber and party
// =============================================================================

/// Legislative chamber, also used as the "branch" a user asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chamber {
    Senate,
    House,
}

impl Chamber {
    /// Title of the seat holder, as a user would say it.
    pub fn title(&self) -> &'static str {
        match self {
            Chamber::Senate => "senator",
            Chamber::House => "representative",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chamber::Senate => write!(f, "senate"),
            Chamber::House => write!(f, "house"),
        }
    }
}

impl FromStr for Chamber {
    type Err = CivicError;

    /// Accepts roster codes (`S`, `H`) and branch words in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "s" | "senate" | "senator" | "upper" => Ok(Chamber::Senate),
            "h" | "house" | "representative" | "rep" | "lower" => Ok(Chamber::House),
            _ => Err(CivicError::UnknownChamber(s.to_string())),
        }
    }
}

/// Party affiliation from the roster's one-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Democrat,
    Republican,
    Other(String),
}

impl Party {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            c if c.eq_ignore_ascii_case("d") => Party::Democrat,
            c if c.eq_ignore_ascii_case("r") => Party::Republican,
            c => Party::Other(c.to_string()),
        }
    }

    /// Spoken form of the party; unknown codes pass through unchanged.
    pub fn name(&self) -> &str {
        match self {
            Party::Democrat => "democrat",
            Party::Republican => "republican",
            Party::Other(code) => code,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Legislators
// =============================================================================

/// One member of the legislature. Reference data, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    pub house: Chamber,
    pub district: String,
    pub party: Party,
    pub format_name: String,
    pub profession: String,
    pub education: String,
    pub service_start: String,
    pub counties: String,
    pub email: String,
    pub cell: String,
    pub image: String,
    pub legislation_url: String,
}

/// The legislators matched for a session's district pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialsSelection {
    pub senator: Option<Legislator>,
    pub representative: Option<Legislator>,
    /// Set when the selection was produced for a single-official request.
    pub requested_branch: Option<Chamber>,
}

impl OfficialsSelection {
    /// The seat holder for a chamber, if the seat is filled.
    pub fn get(&self, chamber: Chamber) -> Option<&Legislator> {
        match chamber {
            Chamber::Senate => self.senator.as_ref(),
            Chamber::House => self.representative.as_ref(),
        }
    }

    pub fn with_branch(mut self, branch: Option<Chamber>) -> Self {
        self.requested_branch = branch;
        self
    }
}

// =============================================================================
// Session context
// =============================================================================

/// What the user last asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "Who represents me?"
    Mine,
    /// "Tell me about my senator / representative."
    Details,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Mine => write!(f, "mine"),
            Intent::Details => write!(f, "details"),
        }
    }
}

/// Facts remembered for one conversation.
///
/// Fields fill in monotonically; nothing here is cleared mid-conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub location: Option<Location>,
    pub district_pair: Option<DistrictPair>,
    pub officials: Option<OfficialsSelection>,
    pub last_intent: Option<Intent>,
    pub last_requested_branch: Option<Chamber>,
}

impl SessionContext {
    /// Merge a partial update, last write wins per field.
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(pair) = update.district_pair {
            self.district_pair = Some(pair);
        }
        if let Some(officials) = update.officials {
            self.officials = Some(officials);
        }
        if let Some(intent) = update.last_intent {
            self.last_intent = Some(intent);
        }
        if let Some(branch) = update.last_requested_branch {
            self.last_requested_branch = Some(branch);
        }
    }
}

/// A partial write to a [`SessionContext`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub location: Option<Location>,
    pub district_pair: Option<DistrictPair>,
    pub officials: Option<OfficialsSelection>,
    pub last_intent: Option<Intent>,
    pub last_requested_branch: Option<Chamber>,
}

impl ContextUpdate {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.district_pair.is_none()
            && self.officials.is_none()
            && self.last_intent.is_none()
            && self.last_requested_branch.is_none()
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_districts(mut self, pair: DistrictPair) -> Self {
        self.district_pair = Some(pair);
        self
    }

    pub fn with_officials(mut self, officials: OfficialsSelection) -> Self {
        self.officials = Some(officials);
        self
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.last_intent = Some(intent);
        self
    }

    pub fn with_branch(mut self, branch: Option<Chamber>) -> Self {
        self.last_requested_branch = branch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legislator(house: Chamber, district: &str, name: &str) -> Legislator {
        Legislator {
            house,
            district: district.to_string(),
            party: Party::Republican,
            format_name: name.to_string(),
            profession: String::new(),
            education: String::new(),
            service_start: String::new(),
            counties: String::new(),
            email: String::new(),
            cell: String::new(),
            image: String::new(),
            legislation_url: String::new(),
        }
    }

    #[test]
    fn test_location_valid() {
        let loc = Location::new(40.7608, -111.891).unwrap();
        assert_eq!(loc.latitude, 40.7608);
        assert_eq!(loc.longitude, -111.891);
    }

    #[test]
    fn test_location_boundaries_accepted() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_location_out_of_range_rejected() {
        assert!(matches!(
            Location::new(90.5, 0.0),
            Err(CivicError::InvalidLocation { .. })
        ));
        assert!(Location::new(0.0, -180.1).is_err());
    }

    #[test]
    fn test_location_non_finite_rejected() {
        assert!(Location::new(f64::NAN, 0.0).is_err());
        assert!(Location::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_district_pair_by_chamber() {
        let pair = DistrictPair::new("28", "7");
        assert_eq!(pair.district(Chamber::House), "28");
        assert_eq!(pair.district(Chamber::Senate), "7");
    }

    #[test]
    fn test_district_code_normalization() {
        use serde_json::json;
        assert_eq!(district_code(&json!(28)), Some("28".to_string()));
        assert_eq!(district_code(&json!("7")), Some("7".to_string()));
        assert_eq!(district_code(&json!(" 12 ")), Some("12".to_string()));
        assert_eq!(district_code(&json!("")), None);
        assert_eq!(district_code(&json!(null)), None);
        assert_eq!(district_code(&json!([1])), None);
    }

    #[test]
    fn test_district_code_integral_float() {
        use serde_json::json;
        assert_eq!(district_code(&json!(28.0)), Some("28".to_string()));
        assert_eq!(district_code(&json!(7.0)), Some("7".to_string()));
        assert_eq!(district_code(&json!(28.5)), Some("28.5".to_string()));
        assert_eq!(district_code(&json!(u64::MAX)), Some(u64::MAX.to_string()));
    }

    #[test]
    fn test_chamber_from_roster_codes() {
        assert_eq!("S".parse::<Chamber>().unwrap(), Chamber::Senate);
        assert_eq!("h".parse::<Chamber>().unwrap(), Chamber::House);
    }

    #[test]
    fn test_chamber_from_branch_words() {
        assert_eq!("Senator".parse::<Chamber>().unwrap(), Chamber::Senate);
        assert_eq!(" representative ".parse::<Chamber>().unwrap(), Chamber::House);
        assert_eq!("HOUSE".parse::<Chamber>().unwrap(), Chamber::House);
    }

    #[test]
    fn test_chamber_unknown() {
        let err = "governor".parse::<Chamber>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown chamber: governor");
    }

    #[test]
    fn test_chamber_display_and_title() {
        assert_eq!(Chamber::Senate.to_string(), "senate");
        assert_eq!(Chamber::House.title(), "representative");
    }

    #[test]
    fn test_party_from_code() {
        assert_eq!(Party::from_code("D"), Party::Democrat);
        assert_eq!(Party::from_code("r"), Party::Republican);
        assert_eq!(Party::from_code("L"), Party::Other("L".to_string()));
    }

    #[test]
    fn test_party_name() {
        assert_eq!(Party::Democrat.name(), "democrat");
        assert_eq!(Party::Republican.to_string(), "republican");
        assert_eq!(Party::Other("I".to_string()).name(), "I");
    }

    #[test]
    fn test_selection_get_by_chamber() {
        let selection = OfficialsSelection {
            senator: Some(legislator(Chamber::Senate, "7", "A")),
            representative: None,
            requested_branch: None,
        };
        assert_eq!(selection.get(Chamber::Senate).unwrap().format_name, "A");
        assert!(selection.get(Chamber::House).is_none());
    }

    #[test]
    fn test_context_apply_merges_fields() {
        let mut ctx = SessionContext::default();
        ctx.apply(ContextUpdate::default().with_intent(Intent::Mine));
        ctx.apply(ContextUpdate::default().with_districts(DistrictPair::new("28", "7")));

        assert_eq!(ctx.last_intent, Some(Intent::Mine));
        assert_eq!(ctx.district_pair, Some(DistrictPair::new("28", "7")));
        assert!(ctx.location.is_none());
    }

    #[test]
    fn test_context_apply_never_clears() {
        let mut ctx = SessionContext::default();
        ctx.apply(ContextUpdate::default().with_branch(Some(Chamber::House)));
        ctx.apply(ContextUpdate::default().with_branch(None));
        assert_eq!(ctx.last_requested_branch, Some(Chamber::House));
    }

    #[test]
    fn test_context_apply_last_write_wins() {
        let mut ctx = SessionContext::default();
        ctx.apply(ContextUpdate::default().with_intent(Intent::Mine));
        ctx.apply(ContextUpdate::default().with_intent(Intent::Details));
        assert_eq!(ctx.last_intent, Some(Intent::Details));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ContextUpdate::default().is_empty());
        assert!(ContextUpdate::default().with_branch(None).is_empty());
        assert!(!ContextUpdate::default().with_intent(Intent::Mine).is_empty());
    }

    #[test]
    fn test_session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let ts = Timestamp::now();
        assert_eq!(ts.to_datetime().timestamp(), ts.0);
    }
}
