//! Minimal delimited-table codec
//!
//! Covers the subset of RFC 4180 the exported helpdesk tables actually use:
//! comma-separated fields, double-quote quoting with `""` escapes, quoted
//! fields may contain commas and newlines. Both `\n` and `\r\n` row endings
//! are accepted on read; writes use `\n`.

use crate::error::PipelineError;

/// Parse delimited text into rows of fields
///
/// Empty trailing lines are dropped. An unterminated quoted field is the
/// one structural fault this format can have.
pub fn parse(input: &str) -> Result<Vec<Vec<String>>, PipelineError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {
                // Only meaningful as part of \r\n
                if chars.peek() == Some(&'\n') {
                    continue;
                }
                field.push(c);
            }
            '\n' => {
                line += 1;
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(PipelineError::MalformedRecord {
            line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(rows)
}

/// Render rows back to delimited text
pub fn render(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_escaped(&mut out, field);
        }
        out.push('\n');
    }
    out
}

fn push_escaped(out: &mut String, field: &str) {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rows() {
        let rows = parse("a,b,c\nd,e,f\n").unwrap();
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_missing_final_newline() {
        let rows = parse("a,b\nc,d").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c", "d"]);
    }

    #[test]
    fn test_crlf_endings() {
        let rows = parse("a,b\r\nc,d\r\n").unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_quoted_comma_and_newline() {
        let rows = parse("subject,body\n\"hi, there\",\"line one\nline two\"\n").unwrap();
        assert_eq!(rows[1][0], "hi, there");
        assert_eq!(rows[1][1], "line one\nline two");
    }

    #[test]
    fn test_escaped_quote() {
        let rows = parse("\"she said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(rows[0][0], "she said \"hi\"");
    }

    #[test]
    fn test_empty_fields_preserved() {
        let rows = parse("a,,c\n").unwrap();
        assert_eq!(rows[0], vec!["a", "", "c"]);
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let err = parse("a,\"broken\n").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_render_escapes_where_needed() {
        let rows = vec![vec![
            "plain".to_string(),
            "with, comma".to_string(),
            "with \"quote\"".to_string(),
        ]];
        let text = render(&rows);
        assert_eq!(text, "plain,\"with, comma\",\"with \"\"quote\"\"\"\n");
    }

    #[test]
    fn test_render_parse_round_trip() {
        let rows = vec![
            vec!["email".to_string(), "subject".to_string()],
            vec!["a@b.com".to_string(), "re: order, urgent\nsee below".to_string()],
        ];
        assert_eq!(parse(&render(&rows)).unwrap(), rows);
    }
}
