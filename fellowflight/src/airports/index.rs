//! Fuzzy-searchable airport index

use std::io::Read;
use std::path::Path;

use tracing::{info, instrument, warn};

use super::Error;
use super::record::{AirportRecord, AirportRow};
use super::score::Scorer;

/// Columns the reference table must provide
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "iata", "city", "region", "country"];

/// Default fuzziness, `0` accepts only perfect matches and `1` accepts anything
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Outcome of building an index from a reference table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rows which made it into the index
    pub indexed: usize,
    /// Malformed rows left out
    pub skipped: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    record: AirportRecord,
    /// Lowercased `city`, `iata`, `region`
    keys: [String; 3],
}

/// Immutable in-memory index of airports
#[derive(Debug, Clone)]
pub struct AirportIndex {
    entries: Vec<Entry>,
    threshold: f64,
}

impl AirportIndex {
    /// Builds the index, leaving out records without a name or without any searchable field
    pub fn build(rows: impl IntoIterator<Item = AirportRecord>) -> Self {
        let entries = rows
            .into_iter()
            .filter(|record| match record.defect() {
                Some(reason) => {
                    warn!(name = %record.name, reason, "Skipping airport record");
                    false
                }
                None => true,
            })
            .map(|record| Entry {
                keys: [
                    record.city.trim().to_lowercase(),
                    record.iata.trim().to_lowercase(),
                    record.region.trim().to_lowercase(),
                ],
                record,
            })
            .collect();

        Self {
            entries,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Overrides the fuzziness threshold, clamped to `[0, 1]`
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builds the index from a CSV table with a header row
    ///
    /// Missing required columns fail the build. Malformed rows are logged and skipped.
    pub fn from_csv(reader: impl Read) -> Result<(Self, BuildReport), Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if let Some(column) = REQUIRED_COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|header| header == *column))
        {
            return Err(Error::MissingColumn(column));
        }

        let mut records = Vec::new();
        let mut skipped = 0;
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    let line = err.position().map_or(0, |pos| pos.line());
                    warn!(line, %err, "Skipping unreadable airport row");
                    skipped += 1;
                    continue;
                }
            };

            let line = row.position().map_or(0, |pos| pos.line());
            let record = row
                .deserialize::<AirportRow>(Some(&headers))
                .map_err(|err| Error::MalformedRow {
                    line,
                    reason: err.to_string(),
                })
                .and_then(|row| row.into_record(line));

            match record {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(%err, "Skipping airport row");
                    skipped += 1;
                }
            }
        }

        let index = Self::build(records);
        let report = BuildReport {
            indexed: index.len(),
            skipped,
        };
        Ok((index, report))
    }

    /// Reads and indexes the reference table at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<(Self, BuildReport), Error> {
        let data = tokio::fs::read(path.as_ref()).await?;
        let (index, report) = Self::from_csv(data.as_slice())?;
        info!(indexed = report.indexed, skipped = report.skipped, "Airport index built");
        Ok((index, report))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed records in table order
    pub fn records(&self) -> impl Iterator<Item = &AirportRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Finds up to `limit` airports matching `query`, best first
    ///
    /// Matches on `city`, `iata` and `region`. Records whose best field similarity is below
    /// `1 - threshold` are excluded; ties keep table order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<AirportRecord> {
        if limit == 0 {
            return Vec::new();
        }
        let Some(mut scorer) = Scorer::new(query) else {
            return Vec::new();
        };
        let min_similarity = 1.0 - self.threshold;

        let mut hits: Vec<(f64, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                entry
                    .keys
                    .iter()
                    .filter_map(|key| scorer.score(key))
                    .filter(|field| field.similarity >= min_similarity)
                    .map(|field| field.rank())
                    .max_by(f64::total_cmp)
                    .map(|rank| (rank, idx))
            })
            .collect();

        // Stable sort keeps table order among equal ranks
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));
        hits.into_iter()
            .take(limit)
            .map(|(_, idx)| self.entries[idx].record.clone())
            .collect()
    }
}
