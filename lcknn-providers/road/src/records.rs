//! Line splitting shared by every reader.

use std::{io::BufRead, str::FromStr};

use crate::errors::RoadFormatError;

/// A non-blank, non-comment input line and its 1-based number.
pub(crate) struct Record {
    pub(crate) line: usize,
    pub(crate) text: String,
}

impl Record {
    pub(crate) fn fields(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Splits the line into exactly `N` fields.
    pub(crate) fn exact<const N: usize>(&self) -> Result<[&str; N], RoadFormatError> {
        let fields: Vec<&str> = self.fields().collect();
        let found = fields.len();
        fields.try_into().map_err(|_| RoadFormatError::FieldCount {
            line: self.line,
            expected: N,
            found,
        })
    }

    pub(crate) fn parse<T: FromStr>(&self, token: &str, what: &'static str) -> Result<T, RoadFormatError> {
        token.parse().map_err(|_| RoadFormatError::InvalidToken {
            line: self.line,
            token: token.to_owned(),
            what,
        })
    }
}

/// Yields the meaningful lines of `reader`, skipping blank lines and lines
/// whose first non-space character is `#`.
pub(crate) fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Record, RoadFormatError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) => {
                let trimmed = text.trim_start();
                (!trimmed.is_empty() && !trimmed.starts_with('#')).then(|| {
                    Ok(Record {
                        line: index + 1,
                        text,
                    })
                })
            }
            Err(err) => Some(Err(err.into())),
        })
}
