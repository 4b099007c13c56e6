//! Load pipeline: Source → Fetch → Parse → People.
//!
//! Synchronous; the app shell runs it on a background thread and receives
//! the result over a channel.

use crate::config::AppConfig;
use crate::data::csv::parse_csv;
use crate::data::{rows_to_people, Person};
use crate::net::fetch::{fetch_csv, fetch_sheet_values};

/// Error during people loading, tagged with the pipeline phase.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub message: String,
    pub phase: &'static str,
}

impl LoadError {
    fn new(phase: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

/// Where the people records come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    PublishedCsv {
        url: String,
    },
    SheetsApi {
        sheet_id: String,
        sheet_name: String,
        range: String,
        access_token: String,
    },
}

impl DataSource {
    /// Pick a source from config, preferring the published CSV when both
    /// are set. `stored_token` backs up the env token for the API path.
    pub fn from_config(
        config: &AppConfig,
        stored_token: Option<&str>,
    ) -> Result<Self, LoadError> {
        if let Some(url) = &config.published_csv_url {
            return Ok(DataSource::PublishedCsv { url: url.clone() });
        }
        let sheet_id = config
            .sheet_id
            .as_ref()
            .ok_or_else(|| LoadError::new("config", "No CSV URL or sheet id configured"))?;
        let token = config
            .access_token
            .as_deref()
            .or(stored_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LoadError::new("config", "Missing access token. Sign in to load from the Sheets API")
            })?;
        Ok(DataSource::SheetsApi {
            sheet_id: sheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            range: config.sheet_range.clone(),
            access_token: token.to_string(),
        })
    }
}

/// Load the ordered people list from a source.
pub fn load_people(source: &DataSource) -> Result<Vec<Person>, LoadError> {
    match source {
        DataSource::PublishedCsv { url } => {
            log::info!("loading people from published CSV");
            let text = fetch_csv(url).map_err(|e| LoadError::new("fetch", e.to_string()))?;
            people_from_csv(&text)
        }
        DataSource::SheetsApi {
            sheet_id,
            sheet_name,
            range,
            access_token,
        } => {
            log::info!("loading people from values API ({}!{})", sheet_name, range);
            let values = fetch_sheet_values(sheet_id, sheet_name, range, access_token)
                .map_err(|e| LoadError::new("fetch", e.to_string()))?;
            people_from_rows(values)
        }
    }
}

/// Decode CSV text into people (header row first). Split out for testing.
pub fn people_from_csv(text: &str) -> Result<Vec<Person>, LoadError> {
    people_from_rows(parse_csv(text))
}

fn people_from_rows(mut rows: Vec<Vec<String>>) -> Result<Vec<Person>, LoadError> {
    if rows.is_empty() {
        return Err(LoadError::new("parse", "Source returned no rows"));
    }
    let header = rows.remove(0);
    let people = rows_to_people(&header, &rows);
    if people.is_empty() {
        return Err(LoadError::new(
            "empty",
            "No data found. Check your sheet has data and the range is correct",
        ));
    }
    log::info!("loaded {} people", people.len());
    Ok(people)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name,Photo,Age,Country,Interest,Net Worth
Ada,https://x/a.jpg,36,UK,Math,\"$250,000\"
Lin,https://x/l.jpg,29,SG,Chess,$80
";

    #[test]
    fn csv_pipeline_produces_people() {
        let people = people_from_csv(SAMPLE).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "Ada");
        assert_eq!(people[0].net_worth, 250000.0);
        assert_eq!(people[1].net_worth, 80.0);
    }

    #[test]
    fn header_only_is_an_empty_error() {
        let err = people_from_csv("Name,Photo\n").unwrap_err();
        assert_eq!(err.phase, "empty");
    }

    #[test]
    fn no_rows_is_a_parse_error() {
        let err = people_from_csv("").unwrap_err();
        assert_eq!(err.phase, "parse");
    }

    #[test]
    fn source_prefers_published_csv() {
        let cfg = AppConfig {
            published_csv_url: Some("https://x/pub.csv".into()),
            sheet_id: Some("abc".into()),
            sheet_name: "Sheet1".into(),
            sheet_range: "A1:G999".into(),
            access_token: Some("t".into()),
        };
        assert!(matches!(
            DataSource::from_config(&cfg, None).unwrap(),
            DataSource::PublishedCsv { .. }
        ));
    }

    #[test]
    fn api_source_needs_a_token() {
        let cfg = AppConfig {
            published_csv_url: None,
            sheet_id: Some("abc".into()),
            sheet_name: "Sheet1".into(),
            sheet_range: "A1:G999".into(),
            access_token: None,
        };
        let err = DataSource::from_config(&cfg, None).unwrap_err();
        assert_eq!(err.phase, "config");

        // A stored token unblocks it.
        let src = DataSource::from_config(&cfg, Some("ya29.x")).unwrap();
        assert!(matches!(src, DataSource::SheetsApi { .. }));
    }

    #[test]
    fn unconfigured_source_is_a_config_error() {
        let cfg = AppConfig {
            sheet_name: "Sheet1".into(),
            sheet_range: "A1:G999".into(),
            ..Default::default()
        };
        assert_eq!(DataSource::from_config(&cfg, None).unwrap_err().phase, "config");
    }
}
