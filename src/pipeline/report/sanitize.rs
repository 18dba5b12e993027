/// Clean report text before extraction.
/// Strips control characters and blank lines, trims each line, and keeps the
/// punctuation lab reports rely on (units, ranges, table separators).
pub fn sanitize_report_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '&'
                        | '\''
                        | '"'
                        | '<'
                        | '>'
                        | '*'
                        | '_'
                        | '^'
                        | '|'
                        | '~'
                        | '°'
                        | '±'
                        | '≤'
                        | '≥'
                        | '\u{2013}' // En-dash, common in printed ranges
                )
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
