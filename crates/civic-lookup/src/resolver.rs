//! District resolver.
//!
//! Issues one spatial query per call and validates the reply into a
//! [`DistrictPair`]. Nothing is cached here; the session layer decides when a
//! lookup is needed at all.

use std::sync::Arc;

use serde_json::Value;

use civic_core::config::LookupConfig;
use civic_core::types::{district_code, DistrictPair, Location};

use crate::client::{SpatialLookup, SpatialQuery};
use crate::error::ResolutionError;

/// Resolves coordinates to the covering house and senate districts.
#[derive(Clone)]
pub struct DistrictResolver {
    lookup: Arc<dyn SpatialLookup>,
    table: String,
    house_field: String,
    senate_field: String,
    spatial_reference: u32,
}

impl DistrictResolver {
    pub fn new(lookup: Arc<dyn SpatialLookup>, config: &LookupConfig) -> Self {
        Self {
            lookup,
            table: config.table.clone(),
            house_field: config.house_field.clone(),
            senate_field: config.senate_field.clone(),
            spatial_reference: config.spatial_reference,
        }
    }

    pub async fn resolve_districts(
        &self,
        location: Location,
    ) -> Result<DistrictPair, ResolutionError> {
        let query = SpatialQuery {
            table: self.table.clone(),
            fields: vec![self.house_field.clone(), self.senate_field.clone()],
            location,
            spatial_reference: self.spatial_reference,
        };

        let reply = self.lookup.search(&query).await?;
        let pair = parse_districts(&reply, &self.house_field, &self.senate_field)?;

        tracing::debug!(
            house = %pair.house_district,
            senate = %pair.senate_district,
            "Resolved districts"
        );
        Ok(pair)
    }
}

/// Validate a search reply into a district pair.
///
/// Expected shape:
/// `{"status": 200, "result": [{"attributes": {"repdist": 28, "sendist": 7}}]}`.
/// An empty result set, or a first row whose two attributes are both null,
/// means no district covers the point. Anything else that is not a complete
/// pair is a service error; a half-filled pair is never returned.
pub fn parse_districts(
    reply: &Value,
    house_field: &str,
    senate_field: &str,
) -> Result<DistrictPair, ResolutionError> {
    let status = reply.get("status").and_then(Value::as_u64);
    if status != Some(200) {
        let status = status.and_then(|s| u16::try_from(s).ok());
        let message = reply
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| match status {
                Some(code) => format!("service replied with status {}", code),
                None => "reply has no status".to_string(),
            });
        return Err(ResolutionError::service(status, message));
    }

    let rows = reply
        .get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| ResolutionError::service(Some(200), "reply has no result array"))?;

    let Some(row) = rows.first() else {
        return Err(ResolutionError::NoCoverage);
    };

    let attributes = row
        .get("attributes")
        .and_then(Value::as_object)
        .ok_or_else(|| ResolutionError::service(Some(200), "result row has no attributes"))?;

    let house = attributes.get(house_field);
    let senate = attributes.get(senate_field);

    match (house.and_then(district_code), senate.and_then(district_code)) {
        (Some(house), Some(senate)) => Ok(DistrictPair::new(house, senate)),
        (None, None) if house.is_some_and(Value::is_null) && senate.is_some_and(Value::is_null) => {
            Err(ResolutionError::NoCoverage)
        }
        _ => Err(ResolutionError::service(
            Some(200),
            format!(
                "result row lacks a complete {}/{} pair",
                house_field, senate_field
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CannedLookup {
        reply: Result<Value, ResolutionError>,
        calls: AtomicUsize,
        last_query: Mutex<Option<SpatialQuery>>,
    }

    impl CannedLookup {
        fn new(reply: Result<Value, ResolutionError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SpatialLookup for CannedLookup {
        async fn search(&self, query: &SpatialQuery) -> Result<Value, ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            self.reply.clone()
        }
    }

    fn ok_reply(house: Value, senate: Value) -> Value {
        json!({"status": 200, "result": [{"attributes": {"repdist": house, "sendist": senate}}]})
    }

    fn location() -> Location {
        Location::new(40.2338, -111.6585).unwrap()
    }

    #[test]
    fn test_parse_numeric_codes() {
        let pair = parse_districts(&ok_reply(json!(28), json!(7)), "repdist", "sendist").unwrap();
        assert_eq!(pair, DistrictPair::new("28", "7"));
    }

    #[test]
    fn test_parse_string_codes() {
        let pair =
            parse_districts(&ok_reply(json!("28"), json!("7")), "repdist", "sendist").unwrap();
        assert_eq!(pair, DistrictPair::new("28", "7"));
    }

    #[test]
    fn test_parse_float_codes() {
        let pair =
            parse_districts(&ok_reply(json!(28.0), json!(7.0)), "repdist", "sendist").unwrap();
        assert_eq!(pair, DistrictPair::new("28", "7"));
    }

    #[test]
    fn test_empty_result_is_no_coverage() {
        let reply = json!({"status": 200, "result": []});
        assert_eq!(
            parse_districts(&reply, "repdist", "sendist"),
            Err(ResolutionError::NoCoverage)
        );
    }

    #[test]
    fn test_null_attributes_are_no_coverage() {
        let reply = ok_reply(Value::Null, Value::Null);
        assert_eq!(
            parse_districts(&reply, "repdist", "sendist"),
            Err(ResolutionError::NoCoverage)
        );
    }

    #[test]
    fn test_partial_pair_is_service_error() {
        let reply = ok_reply(json!(28), Value::Null);
        let err = parse_districts(&reply, "repdist", "sendist").unwrap_err();
        assert!(matches!(err, ResolutionError::ServiceError { status: Some(200), .. }));
    }

    #[test]
    fn test_missing_attribute_key_is_service_error() {
        let reply = json!({"status": 200, "result": [{"attributes": {"repdist": 28}}]});
        let err = parse_districts(&reply, "repdist", "sendist").unwrap_err();
        assert!(matches!(err, ResolutionError::ServiceError { .. }));
    }

    #[test]
    fn test_missing_result_is_service_error() {
        let reply = json!({"status": 200});
        let err = parse_districts(&reply, "repdist", "sendist").unwrap_err();
        assert!(err.to_string().contains("no result array"));
    }

    #[test]
    fn test_row_without_attributes_is_service_error() {
        let reply = json!({"status": 200, "result": [{"geometry": {}}]});
        assert!(matches!(
            parse_districts(&reply, "repdist", "sendist"),
            Err(ResolutionError::ServiceError { .. })
        ));
    }

    #[test]
    fn test_status_400_carries_message() {
        let reply = json!({"status": 400, "message": "Geometry is invalid."});
        assert_eq!(
            parse_districts(&reply, "repdist", "sendist"),
            Err(ResolutionError::service(Some(400), "Geometry is invalid."))
        );
    }

    #[test]
    fn test_status_500_without_message() {
        let reply = json!({"status": 500});
        let err = parse_districts(&reply, "repdist", "sendist").unwrap_err();
        assert_eq!(err.to_string(), "Spatial service error: service replied with status 500");
    }

    #[test]
    fn test_missing_status_is_service_error() {
        let reply = json!({"result": []});
        let err = parse_districts(&reply, "repdist", "sendist").unwrap_err();
        assert!(matches!(err, ResolutionError::ServiceError { status: None, .. }));
    }

    #[tokio::test]
    async fn test_resolver_issues_one_query() {
        let lookup = CannedLookup::new(Ok(ok_reply(json!(28), json!(7))));
        let resolver = DistrictResolver::new(lookup.clone(), &LookupConfig::default());

        let pair = resolver.resolve_districts(location()).await.unwrap();
        assert_eq!(pair, DistrictPair::new("28", "7"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);

        let query = lookup.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.table, "sgid10.political.officialslookup");
        assert_eq!(query.fields, vec!["repdist", "sendist"]);
        assert_eq!(query.spatial_reference, 4326);
        assert_eq!(query.location, location());
    }

    #[tokio::test]
    async fn test_resolver_passes_transport_error_through() {
        let lookup = CannedLookup::new(Err(ResolutionError::service(None, "timed out")));
        let resolver = DistrictResolver::new(lookup.clone(), &LookupConfig::default());

        let err = resolver.resolve_districts(location()).await.unwrap_err();
        assert_eq!(err, ResolutionError::service(None, "timed out"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolver_uses_configured_fields() {
        let config = LookupConfig {
            house_field: "house".to_string(),
            senate_field: "senate".to_string(),
            ..LookupConfig::default()
        };
        let reply = json!({"status": 200, "result": [{"attributes": {"house": "3", "senate": "2"}}]});
        let lookup = CannedLookup::new(Ok(reply));
        let resolver = DistrictResolver::new(lookup, &config);

        let pair = resolver.resolve_districts(location()).await.unwrap();
        assert_eq!(pair, DistrictPair::new("3", "2"));
    }
}
