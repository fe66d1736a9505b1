use crate::file::names::OutputNames;
use async_trait::async_trait;
use engine_core::{error::TransformError, transform::ItemTransform};
use model::{
    core::{identifiers::placeholder_identifier, utils::sanitize_identifier},
    execution::item::InputItem,
};
use std::path::PathBuf;
use tracing::{debug, info};

pub const QUESTION_LABEL: &str = "Вопрос";
pub const ANSWER_LABEL: &str = "Ответ";

/// Leading columns that are not questions: timestamp and respondent id.
const META_COLUMNS: usize = 2;
const IDENTIFIER_COLUMN: usize = 1;

#[derive(Debug, Clone)]
pub struct CsvExportParams {
    pub output_dir: PathBuf,
    /// Header record of the document, metadata columns included.
    pub questions: Vec<String>,
}

/// Writes one `<identifier>_answers.txt` file per CSV answer row.
#[derive(Debug, Default)]
pub struct RowExport {
    names: OutputNames,
}

#[async_trait]
impl ItemTransform for RowExport {
    type Params = CsvExportParams;

    fn name(&self) -> &'static str {
        "csv-to-text"
    }

    fn skip_reason(&self, item: &InputItem, _params: &CsvExportParams) -> Option<String> {
        match item.as_row() {
            None => Some("not a CSV row".into()),
            Some(row) if row.fields.len() < META_COLUMNS => Some(format!(
                "row {} has fewer than {META_COLUMNS} columns",
                row.record
            )),
            Some(_) => None,
        }
    }

    fn describe(&self, item: &InputItem) -> String {
        format!("Exporting: {}", item.label())
    }

    async fn apply(
        &self,
        item: &InputItem,
        params: &CsvExportParams,
    ) -> Result<PathBuf, TransformError> {
        let row = item
            .as_row()
            .ok_or_else(|| TransformError::Skipped("not a CSV row".into()))?;

        let identifier = resolve_identifier(row.field(IDENTIFIER_COLUMN).unwrap_or_default());
        let output = self
            .names
            .reserve(params.output_dir.join(format!("{identifier}_answers.txt")));
        let content = render_answers(&params.questions, &row.fields);

        tokio::fs::write(&output, content.as_bytes()).await?;
        debug!(record = row.record, bytes = content.len(), "Row exported");
        info!(identifier = %identifier, path = %output.display(), "Answers saved");

        Ok(output)
    }
}

/// File-name identifier for a row: the sanitized respondent field, or a
/// generated placeholder when that field is blank or sanitizes to nothing.
pub fn resolve_identifier(raw: &str) -> String {
    let sanitized = sanitize_identifier(raw);
    if sanitized.is_empty() {
        placeholder_identifier()
    } else {
        sanitized
    }
}

/// Renders the question/answer pairs of one row, skipping the metadata
/// columns. Extra answers without a question (and vice versa) are dropped.
pub fn render_answers(questions: &[String], fields: &[String]) -> String {
    let mut out = String::new();
    for (question, answer) in questions
        .iter()
        .skip(META_COLUMNS)
        .zip(fields.iter().skip(META_COLUMNS))
    {
        out.push_str(&format!("{QUESTION_LABEL}: {question}\n"));
        out.push_str(&format!("{ANSWER_LABEL}: {answer}\n\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::identifiers::is_placeholder_identifier,
        execution::item::CsvRow,
    };

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renders_pairs_after_metadata_columns() {
        let text = render_answers(
            &strings(&["Timestamp", "Email", "Q1", "Q2"]),
            &strings(&["t1", "", "a1", "a2"]),
        );
        assert_eq!(text, "Вопрос: Q1\nОтвет: a1\n\nВопрос: Q2\nОтвет: a2\n\n");
    }

    #[test]
    fn uneven_rows_render_the_shorter_side() {
        let text = render_answers(&strings(&["T", "E", "Q1", "Q2"]), &strings(&["t", "e", "a1"]));
        assert_eq!(text, "Вопрос: Q1\nОтвет: a1\n\n");
    }

    #[test]
    fn identifiers_are_sanitized_or_generated() {
        assert_eq!(resolve_identifier("a@b.com"), "a_at_b_dot_com");
        assert!(is_placeholder_identifier(&resolve_identifier("")));
        assert!(is_placeholder_identifier(&resolve_identifier("   ")));
    }

    #[test]
    fn short_rows_are_skipped() {
        let params = CsvExportParams {
            output_dir: PathBuf::from("/out"),
            questions: Vec::new(),
        };
        let short = InputItem::row("/in/a.csv", CsvRow::new(4, strings(&["only"])));
        let file = InputItem::file("/in/a.csv");

        assert_eq!(
            RowExport::default().skip_reason(&short, &params).as_deref(),
            Some("row 4 has fewer than 2 columns")
        );
        assert!(RowExport::default().skip_reason(&file, &params).is_some());
    }

    #[tokio::test]
    async fn writes_one_file_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let params = CsvExportParams {
            output_dir: dir.path().to_path_buf(),
            questions: strings(&["Timestamp", "Email", "Q1"]),
        };
        let item = InputItem::row("/in/a.csv", CsvRow::new(2, strings(&["t", "x@y.org", "yes"])));

        let output = RowExport::default().apply(&item, &params).await.unwrap();

        assert_eq!(output, dir.path().join("x_at_y_dot_org_answers.txt"));
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "Вопрос: Q1\nОтвет: yes\n\n"
        );
    }

    #[tokio::test]
    async fn colliding_identifiers_get_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let params = CsvExportParams {
            output_dir: dir.path().to_path_buf(),
            questions: strings(&["Timestamp", "Email", "Q1"]),
        };
        let transform = RowExport::default();
        let mut outputs = Vec::new();
        for (record, (email, answer)) in
            [("a@b.com", "first"), ("a@b.com", "second"), ("a_at_b.com", "third")]
                .into_iter()
                .enumerate()
        {
            let item = InputItem::row("/in/a.csv", CsvRow::new(record + 2, strings(&["t", email, answer])));
            outputs.push(transform.apply(&item, &params).await.unwrap());
        }

        assert_eq!(
            outputs,
            vec![
                dir.path().join("a_at_b_dot_com_answers.txt"),
                dir.path().join("a_at_b_dot_com_answers_2.txt"),
                dir.path().join("a_at_b_dot_com_answers_3.txt"),
            ]
        );
        for (path, answer) in outputs.iter().zip(["first", "second", "third"]) {
            assert_eq!(
                std::fs::read_to_string(path).unwrap(),
                format!("Вопрос: Q1\nОтвет: {answer}\n\n")
            );
        }
    }
}
