//! Minimal quote-aware CSV parser for published spreadsheet exports.
//!
//! Handles quoted cells, doubled-quote escapes and CRLF line endings. Lines
//! that are a single empty cell are dropped, so trailing newlines do not
//! produce ghost rows.

/// Parse CSV text into rows of cells.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    row.push(cell);
    push_row(&mut rows, row);
    rows
}

/// Keep a row unless it is effectively blank (single empty/whitespace cell).
fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.len() > 1 || row.iter().any(|c| !c.trim().is_empty()) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_rows() {
        let rows = parse_csv("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let rows = parse_csv("name,bio\n\"Doe, Jane\",\"line one\nline two\"\n");
        assert_eq!(rows[1][0], "Doe, Jane");
        assert_eq!(rows[1][1], "line one\nline two");
    }

    #[test]
    fn doubled_quotes_escape() {
        let rows = parse_csv("\"say \"\"hi\"\"\"\n");
        assert_eq!(rows[0][0], "say \"hi\"");
    }

    #[test]
    fn crlf_and_trailing_newline() {
        let rows = parse_csv("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let rows = parse_csv("a,b\n\n  \nc,d");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn empty_cells_survive_in_multi_cell_rows() {
        let rows = parse_csv(",\n");
        assert_eq!(rows, vec![vec!["", ""]]);
    }
}
