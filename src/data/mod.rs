//! Person records and spreadsheet row decoding.
//!
//! Rows arrive as `Vec<Vec<String>>` from either the CSV fetcher or the
//! values API; the first row is the header. Header keys are matched
//! case-insensitively with collapsed whitespace, so "Net Worth " and
//! "net worth" resolve to the same column.

pub mod csv;

/// One person entry, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub photo: String,
    pub age: String,
    pub country: String,
    pub interest: String,
    /// Original display string, e.g. "$120,500".
    pub net_worth_raw: String,
    /// Parsed numeric value; parse failures coerce to 0.
    pub net_worth: f64,
}

/// Parse a money-ish display string into a number.
///
/// Strips everything but digits, dots and minus signs, then parses; anything
/// non-finite (including empty input) coerces to 0.
pub fn parse_money(value: &str) -> f64 {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Normalize a header cell for lookup: trim, lowercase, collapse whitespace.
pub fn normalize_header_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode data rows into people using a header row for column lookup.
///
/// Rows with no non-blank cell are skipped. A column missing from the header
/// logs a warning once per row and yields an empty field.
pub fn rows_to_people(header: &[String], rows: &[Vec<String>]) -> Vec<Person> {
    let index: std::collections::HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header_key(h), i))
        .collect();

    let get = |row: &[String], key: &str| -> String {
        match index.get(key) {
            Some(&i) => row.get(i).cloned().unwrap_or_default(),
            None => {
                log::warn!("column \"{}\" not found in header {:?}", key, header);
                String::new()
            }
        }
    };

    rows.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let net_worth_raw = get(row, "net worth");
            Person {
                name: get(row, "name"),
                photo: get(row, "photo"),
                age: get(row, "age"),
                country: get(row, "country"),
                interest: get(row, "interest"),
                net_worth: parse_money(&net_worth_raw),
                net_worth_raw,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_parsing_strips_formatting() {
        assert_eq!(parse_money("$120,500"), 120500.0);
        assert_eq!(parse_money("  €1.5 "), 1.5);
        assert_eq!(parse_money("-300"), -300.0);
        assert_eq!(parse_money("n/a"), 0.0);
        assert_eq!(parse_money(""), 0.0);
    }

    #[test]
    fn header_keys_normalize() {
        assert_eq!(normalize_header_key("  Net   Worth "), "net worth");
        assert_eq!(normalize_header_key("NAME"), "name");
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rows_decode_by_header_position() {
        let header = row(&["Name", "Photo", "Age", "Country", "Interest", "Net Worth"]);
        let rows = vec![
            row(&["Ada", "https://x/a.jpg", "36", "UK", "Math", "$250,000"]),
            row(&["", "", "", "", "", ""]), // skipped
            row(&["Lin", "https://x/l.jpg", "29", "SG", "Chess", "oops"]),
        ];

        let people = rows_to_people(&header, &rows);
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "Ada");
        assert_eq!(people[0].net_worth, 250000.0);
        assert_eq!(people[0].net_worth_raw, "$250,000");
        assert_eq!(people[1].net_worth, 0.0);
    }

    #[test]
    fn missing_column_yields_empty_field() {
        let header = row(&["Name"]);
        let rows = vec![row(&["Solo"])];
        let people = rows_to_people(&header, &rows);
        assert_eq!(people[0].name, "Solo");
        assert_eq!(people[0].photo, "");
        assert_eq!(people[0].net_worth, 0.0);
    }

    #[test]
    fn short_rows_do_not_panic() {
        let header = row(&["Name", "Photo", "Age", "Country", "Interest", "Net Worth"]);
        let rows = vec![row(&["OnlyName"])];
        let people = rows_to_people(&header, &rows);
        assert_eq!(people[0].name, "OnlyName");
        assert_eq!(people[0].country, "");
    }
}
