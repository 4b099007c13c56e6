//! Blocking HTTP fetchers for the two spreadsheet sources.
//!
//! Either a published CSV export (no auth) or the Sheets values API with a
//! bearer token. Both run on a background thread spawned by the app shell,
//! never on the UI thread.

use serde::Deserialize;
use url::Url;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Error during fetch.
#[derive(Debug, Clone)]
pub struct FetchError {
    pub message: String,
    /// HTTP status when the server answered at all.
    pub status: Option<u16>,
}

impl FetchError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

fn client() -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("datagrid/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError::new(format!("Client error: {}", e)))
}

/// Fetch a published-CSV export and return the raw text.
pub fn fetch_csv(url: &str) -> Result<String, FetchError> {
    let parsed =
        Url::parse(url).map_err(|e| FetchError::new(format!("Invalid CSV URL: {}", e)))?;

    let response = client()?
        .get(parsed.as_str())
        .header("Accept", "text/csv,text/plain;q=0.9,*/*;q=0.8")
        .send()
        .map_err(|e| FetchError::new(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError {
            message: format!("Failed to fetch published CSV from {}", parsed),
            status: Some(status.as_u16()),
        });
    }

    response
        .text()
        .map_err(|e| FetchError::new(format!("Failed to read body: {}", e)))
}

/// Build the values-API URL for one sheet range.
///
/// The tab name and range go into a single `Tab!A1:G999` path segment, which
/// the url crate percent-encodes for us.
pub fn sheet_values_url(
    sheet_id: &str,
    sheet_name: &str,
    range: &str,
) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(SHEETS_API_BASE).map_err(|e| FetchError::new(format!("Bad API base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::new("Bad API base URL"))?
        .push(sheet_id)
        .push("values")
        .push(&format!("{}!{}", sheet_name, range));
    url.query_pairs_mut().append_pair("majorDimension", "ROWS");
    Ok(url)
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Fetch a sheet range through the values API as rows of strings.
pub fn fetch_sheet_values(
    sheet_id: &str,
    sheet_name: &str,
    range: &str,
    access_token: &str,
) -> Result<Vec<Vec<String>>, FetchError> {
    let url = sheet_values_url(sheet_id, sheet_name, range)?;

    let response = client()?
        .get(url.as_str())
        .bearer_auth(access_token)
        .send()
        .map_err(|e| FetchError::new(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(FetchError {
            message: format!("Sheets API error: {}", truncate(&body, 200)),
            status: Some(status.as_u16()),
        });
    }

    let value_range: ValueRange = response
        .json()
        .map_err(|e| FetchError::new(format!("Bad API response: {}", e)))?;

    Ok(value_range
        .values
        .iter()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// The values API may hand back numbers or booleans for unformatted cells.
fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
