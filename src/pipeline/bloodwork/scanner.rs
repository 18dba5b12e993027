use super::catalog::AnalyteDefinition;

/// Synonyms this short and made only of letters and digits are abbreviations
/// and must stand as whole words ("bun" is not found in "bundle").
const ABBREVIATION_MAX_CHARS: usize = 4;

/// First line of a report that mentions an analyte.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'a> {
    /// Zero-based line number in the report.
    pub line_index: usize,
    /// The line as it appears in the report.
    pub line: &'a str,
    /// Lowercased line; the value extractor works on this.
    pub lowered: String,
    /// First synonym, in declared order, found on the line.
    pub synonym: &'static str,
    /// Byte offset of `synonym` within `lowered`.
    pub offset: usize,
}

impl LineMatch<'_> {
    /// Characters between the start of the (left-trimmed) line and the synonym.
    pub fn synonym_column(&self) -> usize {
        let leading = self.lowered.len() - self.lowered.trim_start().len();
        self.lowered[leading.min(self.offset)..self.offset].chars().count()
    }

    /// Text following the synonym on the line.
    pub fn tail(&self) -> &str {
        &self.lowered[self.offset + self.synonym.len()..]
    }
}

/// Find the first line (document order) that contains any synonym of
/// `analyte`. Earlier lines win over later, possibly more complete, mentions.
pub fn scan<'a>(text: &'a str, analyte: &AnalyteDefinition) -> Option<LineMatch<'a>> {
    text.lines().enumerate().find_map(|(line_index, line)| {
        let lowered = line.to_lowercase();
        analyte.synonyms.iter().find_map(|&synonym| {
            find_synonym(&lowered, synonym).map(|offset| LineMatch {
                line_index,
                line,
                lowered: lowered.clone(),
                synonym,
                offset,
            })
        })
    })
}

/// Byte offset of the first occurrence of `synonym` that starts a word.
/// Abbreviations must also end one.
fn find_synonym(lowered: &str, synonym: &str) -> Option<usize> {
    let whole_word = synonym.chars().count() <= ABBREVIATION_MAX_CHARS
        && synonym.chars().all(char::is_alphanumeric);
    lowered
        .match_indices(synonym)
        .map(|(offset, _)| offset)
        .find(|&offset| {
            let starts_word = !lowered[..offset]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
            let ends_word = !lowered[offset + synonym.len()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric);
            starts_word && (ends_word || !whole_word)
        })
}
