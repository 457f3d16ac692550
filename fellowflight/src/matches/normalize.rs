//! Normalization of match payloads into display records

use derivative::Derivative;
use serde::Serialize;

use super::avatar::{AvatarSource, InitialsAvatar};
use super::wire::{RawMatchPayload, RawProfile};

/// Link used when the traveller did not share a LinkedIn profile
pub const LINKEDIN_PLACEHOLDER: &str = "#";

/// Overlap label used when the service did not report the overlap duration
pub const UNKNOWN_OVERLAP: &str = "Unknown overlap time";

/// How two travellers were matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchKind {
    SameFlight,
    AirportOverlap,
}

impl MatchKind {
    /// Human readable label shown on the match card
    pub fn label(self) -> &'static str {
        match self {
            Self::SameFlight => "Same Flight",
            Self::AirportOverlap => "Airport Overlap",
        }
    }
}

/// Display-ready match
///
/// `overlap_label` is present exactly for `MatchKind::AirportOverlap` matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMatch {
    pub person_name: String,
    pub subtitle: String,
    pub avatar_ref: String,
    pub linkedin_url: String,
    pub match_kind: MatchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
}

/// Formats the overlap label of an airport overlap match
pub fn overlap_label(minutes: Option<f64>) -> String {
    match minutes {
        Some(minutes) if minutes.is_finite() => format!("{minutes}-minute overlap"),
        _ => UNKNOWN_OVERLAP.to_owned(),
    }
}

/// Turns match payloads into `NormalizedMatch` lists
///
/// Output holds every `same_flight` profile followed by every `time_overlap` profile, each group
/// in payload order. Given a deterministic `AvatarSource` the output depends on the payload only.
#[derive(Debug, Clone, Derivative)]
#[derivative(Default(bound = "A: Default"))]
pub struct Normalizer<A = InitialsAvatar> {
    avatars: A,
}

impl<A: AvatarSource> Normalizer<A> {
    pub fn new(avatars: A) -> Self {
        Self { avatars }
    }

    pub fn normalize(&self, payload: &RawMatchPayload) -> Vec<NormalizedMatch> {
        let same_flight = payload
            .same_flight()
            .iter()
            .map(|profile| self.record(profile, MatchKind::SameFlight));
        let time_overlap = payload
            .time_overlap()
            .iter()
            .map(|profile| self.record(profile, MatchKind::AirportOverlap));

        same_flight.chain(time_overlap).collect()
    }

    fn record(&self, profile: &RawProfile, kind: MatchKind) -> NormalizedMatch {
        let overlap_label = match kind {
            MatchKind::SameFlight => None,
            MatchKind::AirportOverlap => Some(overlap_label(profile.overlap_minutes)),
        };

        let subtitle = profile
            .subtitle
            .as_deref()
            .map(str::trim)
            .filter(|subtitle| !subtitle.is_empty())
            .unwrap_or(kind.label());

        let linkedin_url = profile
            .linkedin_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(LINKEDIN_PLACEHOLDER);

        NormalizedMatch {
            person_name: profile.name.clone(),
            subtitle: subtitle.to_owned(),
            avatar_ref: self.avatars.avatar_for(profile, kind),
            linkedin_url: linkedin_url.to_owned(),
            match_kind: kind,
            overlap_label,
            slack_id: profile.slack_id.clone(),
        }
    }
}

/// Normalizes a payload with initials as avatars
pub fn normalize(payload: &RawMatchPayload) -> Vec<NormalizedMatch> {
    Normalizer::<InitialsAvatar>::default().normalize(payload)
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::{from_value, json, to_value};

    use super::*;
    use crate::matches::avatar::RandomPortrait;

    fn payload() -> RawMatchPayload {
        RawMatchPayload {
            same_flight: Some(vec![
                RawProfile::new("Jane Smith")
                    .with_linkedin("https://www.linkedin.com/in/janesmith"),
                RawProfile::new("Ann Lee"),
            ]),
            time_overlap: Some(vec![
                RawProfile::new("Michael Chen").with_overlap(60.0),
                RawProfile::new("Sarah Miller"),
                RawProfile::new("Bo").with_overlap(45.0),
            ]),
        }
    }

    #[test]
    fn end_to_end_wire_payload() {
        let payload: RawMatchPayload = from_value(json!({
            "same_flight": [{ "name": "A" }],
            "time_overlap": [{ "name": "B", "overlap_minutes": 30 }]
        }))
        .unwrap();

        let matches = normalize(&payload);
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].person_name, "A");
        assert_eq!(matches[0].match_kind, MatchKind::SameFlight);
        assert_eq!(matches[0].overlap_label, None);

        assert_eq!(matches[1].person_name, "B");
        assert_eq!(matches[1].match_kind, MatchKind::AirportOverlap);
        assert_eq!(matches[1].overlap_label.as_deref(), Some("30-minute overlap"));
    }

    #[test]
    fn same_flight_precedes_overlap_in_order() {
        let names: Vec<_> = normalize(&payload())
            .into_iter()
            .map(|m| (m.person_name, m.match_kind))
            .collect();

        assert_eq!(
            names,
            vec![
                ("Jane Smith".to_owned(), MatchKind::SameFlight),
                ("Ann Lee".to_owned(), MatchKind::SameFlight),
                ("Michael Chen".to_owned(), MatchKind::AirportOverlap),
                ("Sarah Miller".to_owned(), MatchKind::AirportOverlap),
                ("Bo".to_owned(), MatchKind::AirportOverlap),
            ]
        );
    }

    #[test]
    fn overlap_label_iff_airport_overlap() {
        for m in normalize(&payload()) {
            assert_eq!(
                m.overlap_label.is_some(),
                m.match_kind == MatchKind::AirportOverlap
            );
        }
    }

    #[test]
    fn overlap_labels() {
        let labels: Vec<_> = normalize(&payload())
            .into_iter()
            .filter_map(|m| m.overlap_label)
            .collect();
        assert_eq!(
            labels,
            vec!["60-minute overlap", UNKNOWN_OVERLAP, "45-minute overlap"]
        );

        assert_eq!(overlap_label(Some(12.5)), "12.5-minute overlap");
        assert_eq!(overlap_label(None), UNKNOWN_OVERLAP);
    }

    #[test]
    fn linkedin_placeholder() {
        let matches = normalize(&payload());
        assert_eq!(matches[0].linkedin_url, "https://www.linkedin.com/in/janesmith");
        assert_eq!(matches[1].linkedin_url, LINKEDIN_PLACEHOLDER);

        let blank = RawMatchPayload {
            same_flight: Some(vec![RawProfile::new("X").with_linkedin("  ")]),
            time_overlap: None,
        };
        assert_eq!(normalize(&blank)[0].linkedin_url, LINKEDIN_PLACEHOLDER);
    }

    #[test]
    fn subtitle_defaults_to_kind_label() {
        let mut payload = payload();
        payload.same_flight.as_mut().unwrap()[1].subtitle = Some("MLT Class of 2026".to_owned());

        let subtitles: Vec<_> = normalize(&payload)
            .into_iter()
            .map(|m| m.subtitle)
            .collect();
        assert_eq!(
            subtitles,
            vec![
                "Same Flight",
                "MLT Class of 2026",
                "Airport Overlap",
                "Airport Overlap",
                "Airport Overlap"
            ]
        );
    }

    #[test]
    fn deterministic_and_repeatable() {
        let payload = payload();
        assert_eq!(normalize(&payload), normalize(&payload));

        let seeded = |seed| Normalizer::new(RandomPortrait::seeded(seed)).normalize(&payload);
        assert_eq!(seeded(3), seeded(3));
    }

    #[test]
    fn empty_payload_normalizes_to_nothing() {
        assert!(normalize(&RawMatchPayload::empty()).is_empty());
    }

    #[test]
    fn render_shape() {
        let payload = RawMatchPayload {
            same_flight: Some(vec![RawProfile {
                slack_id: Some("U1".to_owned()),
                ..RawProfile::new("Jane Smith")
            }]),
            time_overlap: Some(vec![RawProfile::new("Bo").with_overlap(25.0)]),
        };

        assert_json_eq!(
            to_value(normalize(&payload)).unwrap(),
            json!([
                {
                    "personName": "Jane Smith",
                    "subtitle": "Same Flight",
                    "avatarRef": "JS",
                    "linkedinUrl": "#",
                    "matchKind": "SameFlight",
                    "slackId": "U1"
                },
                {
                    "personName": "Bo",
                    "subtitle": "Airport Overlap",
                    "avatarRef": "B",
                    "linkedinUrl": "#",
                    "matchKind": "AirportOverlap",
                    "overlapLabel": "25-minute overlap"
                }
            ])
        );
    }
}
