use crate::error::FileError;
use model::execution::item::{CsvRow, InputItem};
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A questionnaire export: the first record holds the questions, every
/// following record holds one respondent's answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub path: PathBuf,
    pub questions: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvDocument {
    pub fn load(path: &Path) -> Result<Self, FileError> {
        if !path.is_file() {
            return Err(FileError::NotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(path, file)
    }

    /// Parses CSV from `reader`; `path` is only recorded on the items.
    pub fn from_reader<R: Read>(path: &Path, reader: R) -> Result<Self, FileError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            records.push(CsvRow::new(idx + 1, record.iter().map(String::from).collect()));
        }

        if records.len() < 2 {
            return Err(FileError::InvalidFormat(
                "the file must contain at least two rows: questions and answers".into(),
            ));
        }

        let mut records = records.into_iter();
        let questions = records.next().map(|r| r.fields).unwrap_or_default();
        let rows: Vec<CsvRow> = records.collect();
        debug!(path = %path.display(), questions = questions.len(), rows = rows.len(), "Loaded CSV document");

        Ok(CsvDocument {
            path: path.to_path_buf(),
            questions,
            rows,
        })
    }

    /// Splits the document into the shared question header and one item per
    /// answer row.
    pub fn into_items(self) -> (Vec<String>, Vec<InputItem>) {
        let path = self.path;
        let items = self
            .rows
            .into_iter()
            .map(|row| InputItem::row(path.clone(), row))
            .collect();
        (self.questions, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<CsvDocument, FileError> {
        CsvDocument::from_reader(Path::new("/in/answers.csv"), content.as_bytes())
    }

    #[test]
    fn first_record_is_the_question_header() {
        let doc = parse("Timestamp,Email,Q1,Q2\nt1,a@b.com,a1,a2\nt2,,b1,b2\n").unwrap();

        assert_eq!(doc.questions, vec!["Timestamp", "Email", "Q1", "Q2"]);
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[0].record, 2);
        assert_eq!(doc.rows[1].fields, vec!["t2", "", "b1", "b2"]);
    }

    #[test]
    fn ragged_rows_are_preserved() {
        let doc = parse("Timestamp,Email,Q1\nonly-one\nt,e,a,extra\n").unwrap();
        assert_eq!(doc.rows[0].fields, vec!["only-one"]);
        assert_eq!(doc.rows[1].fields.len(), 4);
    }

    #[test]
    fn quoted_fields_keep_commas_and_newlines() {
        let doc = parse("Timestamp,Email,Q1\nt,e,\"first, second\nthird\"\n").unwrap();
        assert_eq!(doc.rows[0].fields[2], "first, second\nthird");
    }

    #[test]
    fn header_only_file_is_rejected() {
        assert!(matches!(
            parse("Timestamp,Email,Q1\n"),
            Err(FileError::InvalidFormat(_))
        ));
        assert!(matches!(parse(""), Err(FileError::InvalidFormat(_))));
    }

    #[test]
    fn items_reference_the_source_file() {
        let (questions, items) = parse("T,E,Q\nt,e,a\n").unwrap().into_items();
        assert_eq!(questions.len(), 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, PathBuf::from("/in/answers.csv"));
        assert_eq!(items[0].as_row().map(|r| r.record), Some(2));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvDocument::load(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }
}
