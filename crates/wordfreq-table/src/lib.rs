//! Parse `word,count` frequency wordlists into an immutable in-memory table.
//!
//! Input is delimited text whose first line is a header naming a `word` and a
//! `count` column. Columns are located by name, so reordered or extra columns
//! are tolerated. The parser is deliberately forgiving at the row level: a
//! count that is empty or non-numeric degrades to 0, and a row without a word
//! is skipped (frequency dumps routinely end in a trailing newline that would
//! otherwise manufacture an empty record). Only structural failures surface
//! as [`ParseError`]: input the CSV reader cannot split into records, or a
//! header missing one of the two columns.
//!
//! Repeated words are kept as separate records; a [`WordTable`] preserves
//! source order and is never mutated after parsing.
//!
//! # Example
//! ```
//! use wordfreq_table::WordTable;
//!
//! let table = WordTable::parse("word,count\nthe,100\nthen,50\n").unwrap();
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.records()[0].word, "the");
//! assert_eq!(table.records()[0].count, 100);
//! ```

use thiserror::Error;

/// One row of a frequency wordlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    /// The word as it appeared in the source, surrounding whitespace trimmed.
    pub word: String,
    /// Occurrence count; 0 when the source field was absent or unparsable.
    pub count: u64,
}

/// An ordered, immutable sequence of [`WordRecord`]s in source order.
#[derive(Debug, Clone, Default)]
pub struct WordTable {
    records: Vec<WordRecord>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read wordlist: {0}")]
    Malformed(#[from] csv::Error),
    #[error("wordlist header is missing a `{0}` column")]
    MissingColumn(&'static str),
}

impl WordTable {
    /// Parse raw delimited text into a table.
    ///
    /// The header row is schema only and never becomes data.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(raw.as_bytes());

        let headers = reader.headers()?;
        let word_col = column(headers, "word")?;
        let count_col = column(headers, "count")?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let Some(word) = row.get(word_col).map(str::trim).filter(|w| !w.is_empty()) else {
                continue;
            };
            let count = row
                .get(count_col)
                .and_then(|c| c.trim().parse::<u64>().ok())
                .unwrap_or(0);
            records.push(WordRecord {
                word: word.to_string(),
                count,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or(ParseError::MissingColumn(name))
}
