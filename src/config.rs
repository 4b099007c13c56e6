//! Environment-driven configuration.
//!
//! One of the two source settings must be present: a published-CSV URL
//! (preferred, no auth) or a sheet id for the values API (needs an access
//! token, either from the environment or the token store).

/// App configuration, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Published CSV export URL (`DATAGRID_CSV_URL`). Takes precedence.
    pub published_csv_url: Option<String>,
    /// Spreadsheet id for the values API (`DATAGRID_SHEET_ID`).
    pub sheet_id: Option<String>,
    /// Tab name (`DATAGRID_SHEET_NAME`, default `Sheet1`).
    pub sheet_name: String,
    /// Cell range (`DATAGRID_SHEET_RANGE`, default `A1:G999`).
    pub sheet_range: String,
    /// Bearer token override (`DATAGRID_ACCESS_TOKEN`).
    pub access_token: Option<String>,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            published_csv_url: env_nonempty("DATAGRID_CSV_URL"),
            sheet_id: env_nonempty("DATAGRID_SHEET_ID"),
            sheet_name: env_nonempty("DATAGRID_SHEET_NAME")
                .unwrap_or_else(|| "Sheet1".to_string()),
            sheet_range: env_nonempty("DATAGRID_SHEET_RANGE")
                .unwrap_or_else(|| "A1:G999".to_string()),
            access_token: env_nonempty("DATAGRID_ACCESS_TOKEN"),
        }
    }

    /// A config is usable when at least one source is set.
    pub fn is_configured(&self) -> bool {
        self.published_csv_url.is_some() || self.sheet_id.is_some()
    }
}
