//! Airport reference rows

use serde::{Deserialize, Serialize};

use super::Error;

/// Airport known to the reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportRecord {
    pub name: String,
    pub iata: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

impl AirportRecord {
    pub fn new(
        name: impl Into<String>,
        iata: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            iata: iata.into(),
            city: city.into(),
            region: region.into(),
            country: country.into(),
        }
    }

    /// Reason the record cannot be indexed, if any
    pub(super) fn defect(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("missing name")
        } else if [&self.city, &self.iata, &self.region]
            .iter()
            .all(|field| field.trim().is_empty())
        {
            Some("no searchable field")
        } else {
            None
        }
    }

    /// Suggestion label, e.g. `San Francisco International Airport - San Francisco, US (SFO, CA)`
    pub fn label(&self) -> String {
        format!(
            "{} - {}, {} ({}, {})",
            self.name, self.city, self.country, self.iata, self.region
        )
    }
}

/// Raw CSV row; every column may be missing or empty
#[derive(Debug, Default, Deserialize)]
pub(super) struct AirportRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    iata: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

fn cell(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

impl AirportRow {
    /// Validates the row, `line` is only used for error reporting
    pub(super) fn into_record(self, line: u64) -> Result<AirportRecord, Error> {
        let record = AirportRecord {
            name: cell(self.name),
            iata: cell(self.iata),
            city: cell(self.city),
            region: cell(self.region),
            country: cell(self.country),
        };

        match record.defect() {
            Some(reason) => Err(Error::MalformedRow {
                line,
                reason: reason.to_owned(),
            }),
            None => Ok(record),
        }
    }
}
