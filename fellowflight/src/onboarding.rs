//! Onboarding submission
//!
//! The form widget itself is rendered elsewhere; this is the data it submits.

use thiserror::Error;

const LINKEDIN_PROFILE_URL: &str = "https://www.linkedin.com/in";
const MAX_FLIGHT_NUMBER_LEN: usize = 10;
const MAX_HOURS_EARLY: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Missing departure airport")]
    MissingAirport,
    #[error("Missing flight number")]
    MissingFlightNumber,
    #[error("Flight number longer than 10 characters")]
    FlightNumberTooLong,
    #[error("Missing departure time")]
    MissingDepartureTime,
    #[error("Hours early must be within (0, 12], got {0}")]
    HoursEarlyOutOfRange(f64),
    #[error("Missing LinkedIn profile")]
    MissingLinkedIn,
}

/// Answers collected by the onboarding form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingForm {
    /// Departure airport, usually an IATA code picked from autocomplete
    pub airport: String,
    pub flight_number: String,
    /// Departure date-time as entered in the form
    pub date_time_flight: String,
    /// Check-in buffer in hours
    pub hours_early: f64,
    /// LinkedIn profile id or URL
    pub linkedin_tag: String,
}

impl OnboardingForm {
    /// Checks the answers, trimming text fields
    pub fn validate(self) -> Result<ValidatedForm, Error> {
        let airport = self.airport.trim().to_owned();
        if airport.is_empty() {
            return Err(Error::MissingAirport);
        }

        let flight_number: String = self
            .flight_number
            .split_whitespace()
            .collect::<String>()
            .to_uppercase();
        if flight_number.is_empty() {
            return Err(Error::MissingFlightNumber);
        }
        if flight_number.chars().count() > MAX_FLIGHT_NUMBER_LEN {
            return Err(Error::FlightNumberTooLong);
        }

        let date_time_flight = self.date_time_flight.trim().to_owned();
        if date_time_flight.is_empty() {
            return Err(Error::MissingDepartureTime);
        }

        // NaN fails both comparisons
        if !(self.hours_early > 0.0 && self.hours_early <= MAX_HOURS_EARLY) {
            return Err(Error::HoursEarlyOutOfRange(self.hours_early));
        }

        let linkedin_tag = linkedin_tag(&self.linkedin_tag).ok_or(Error::MissingLinkedIn)?;

        Ok(ValidatedForm(OnboardingForm {
            airport,
            flight_number,
            date_time_flight,
            hours_early: self.hours_early,
            linkedin_tag,
        }))
    }
}

/// Extracts the profile id from a tag or a pasted profile URL
fn linkedin_tag(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let tag = match raw.find("linkedin.com/in/") {
        Some(at) => &raw[at + "linkedin.com/in/".len()..],
        None => raw,
    };
    let tag = tag
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('@');

    (!tag.is_empty()).then(|| tag.to_owned())
}

/// Onboarding answers which passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm(OnboardingForm);

impl ValidatedForm {
    pub fn form(&self) -> &OnboardingForm {
        &self.0
    }

    pub fn flight_number(&self) -> &str {
        &self.0.flight_number
    }

    pub fn linkedin_url(&self) -> String {
        format!("{LINKEDIN_PROFILE_URL}/{}", self.0.linkedin_tag)
    }

    /// Wire fields as posted by the form
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let form = &self.0;
        vec![
            ("airport", form.airport.clone()),
            ("flightNumber", form.flight_number.clone()),
            ("dateTimeFlight", form.date_time_flight.clone()),
            ("hoursEarly", form.hours_early.to_string()),
            ("linkedInTag", form.linkedin_tag.clone()),
        ]
    }
}
