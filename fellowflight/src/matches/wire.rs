//! Match service payload as received on the wire

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Response body of `GET /api/v1/matches`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMatchPayload {
    /// Travellers booked on the same flight
    #[serde(default, deserialize_with = "lenient_profiles")]
    pub same_flight: Option<Vec<RawProfile>>,
    /// Travellers whose airport time overlaps
    #[serde(default, deserialize_with = "lenient_profiles")]
    pub time_overlap: Option<Vec<RawProfile>>,
}

impl RawMatchPayload {
    /// Payload carrying no matches
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn same_flight(&self) -> &[RawProfile] {
        self.same_flight.as_deref().unwrap_or_default()
    }

    pub fn time_overlap(&self) -> &[RawProfile] {
        self.time_overlap.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.same_flight().is_empty() && self.time_overlap().is_empty()
    }
}

/// Single matched traveller
///
/// Fields of an unexpected JSON type decode as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawProfile {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin_url: Option<String>,
    /// Minutes the two travellers spend at the airport together
    #[serde(default, deserialize_with = "lenient_number")]
    pub overlap_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slack_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subtitle: Option<String>,
}

impl RawProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_overlap(mut self, minutes: f64) -> Self {
        self.overlap_minutes = Some(minutes);
        self
    }

    pub fn with_linkedin(mut self, url: impl Into<String>) -> Self {
        self.linkedin_url = Some(url.into());
        self
    }
}

/// Accepts any JSON value, keeping it only when it is a number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// Accepts any JSON value, keeping it only when it is a string
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).map(str::to_owned))
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Decodes a profile group record by record, dropping entries which are not profiles
fn lenient_profiles<'de, D>(deserializer: D) -> Result<Option<Vec<RawProfile>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(value = %other, "Match group is not a list, ignoring");
            return Ok(None);
        }
    };

    let profiles: Vec<RawProfile> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!(idx, %err, "Skipping malformed match profile");
                None
            }
        })
        .collect();
    Ok(Some(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn decodes_full_payload() {
        let payload: RawMatchPayload = from_value(json!({
            "same_flight": [
                {
                    "name": "John Smith",
                    "linkedin_url": "https://linkedin.com/in/johnsmith",
                    "slack_id": "U98765ZYX"
                }
            ],
            "time_overlap": [
                {
                    "name": "Emily White",
                    "linkedin_url": null,
                    "slack_id": "U54321BCA",
                    "overlap_minutes": 45
                }
            ]
        }))
        .unwrap();

        assert_eq!(payload.same_flight().len(), 1);
        assert_eq!(payload.same_flight()[0].slack_id.as_deref(), Some("U98765ZYX"));
        assert_eq!(payload.time_overlap()[0].linkedin_url, None);
        assert_eq!(payload.time_overlap()[0].overlap_minutes, Some(45.0));
    }

    #[test]
    fn absent_and_null_groups_are_empty() {
        let payload: RawMatchPayload = from_value(json!({})).unwrap();
        assert!(payload.is_empty());

        let payload: RawMatchPayload =
            from_value(json!({ "same_flight": null, "time_overlap": [] })).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn non_numeric_overlap_is_absent() {
        let payload: RawMatchPayload = from_value(json!({
            "time_overlap": [
                { "name": "A", "overlap_minutes": "soon" },
                { "name": "B", "overlap_minutes": null },
                { "name": "C" },
                { "name": "D", "overlap_minutes": 12.5 }
            ]
        }))
        .unwrap();

        let minutes: Vec<_> = payload
            .time_overlap()
            .iter()
            .map(|p| p.overlap_minutes)
            .collect();
        assert_eq!(minutes, vec![None, None, None, Some(12.5)]);
    }

    #[test]
    fn malformed_profile_keeps_its_neighbours() {
        let payload: RawMatchPayload = from_value(json!({
            "same_flight": [
                { "name": "Good", "slack_id": "U1" },
                { "name": null },
                { "name": "Odd", "slack_id": 12345, "linkedin_url": false, "subtitle": [] },
                42
            ],
            "time_overlap": [
                { "name": "Also Good", "overlap_minutes": 15 }
            ]
        }))
        .unwrap();

        let names: Vec<_> = payload.same_flight().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Good", "", "Odd"]);
        assert_eq!(payload.same_flight()[0].slack_id.as_deref(), Some("U1"));
        assert_eq!(payload.same_flight()[2], RawProfile::new("Odd"));
        assert_eq!(payload.time_overlap()[0].name, "Also Good");
    }

    #[test]
    fn non_list_group_is_empty() {
        let payload: RawMatchPayload = from_value(json!({
            "same_flight": "nobody",
            "time_overlap": [{ "name": "B" }]
        }))
        .unwrap();
        assert!(payload.same_flight().is_empty());
        assert_eq!(payload.time_overlap().len(), 1);
    }

    #[test]
    fn missing_name_degrades_to_empty() {
        let payload: RawMatchPayload =
            from_value(json!({ "same_flight": [{ "linkedin_url": "x" }] })).unwrap();
        assert_eq!(payload.same_flight()[0].name, "");
    }
}
