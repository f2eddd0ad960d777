use std::path::{Path, PathBuf};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::AppResult,
    models::{OutputFormat, ReportOutput},
};

const XML_ROW: &str = "row";

pub fn render(output: &ReportOutput, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => render_json(output),
        OutputFormat::Xml => render_xml(output),
    }
}

/// Writes `<dir>/<report name>.<ext>`, creating `dir` when missing.
pub async fn write_report(
    dir: &Path,
    output: &ReportOutput,
    format: OutputFormat,
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}.{}", output.kind.name(), format.extension()));
    tokio::fs::write(&path, render(output, format)?).await?;

    debug!(report = %output.kind, path = %path.display(), "report written");
    Ok(path)
}

fn render_json(output: &ReportOutput) -> AppResult<String> {
    let mut objects = Vec::with_capacity(output.rows.len());
    for row in &output.rows {
        let mut object = Map::new();
        for (column, cell) in output.columns.iter().zip(row) {
            object.insert(column.to_string(), serde_json::to_value(cell)?);
        }
        objects.push(Value::Object(object));
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    objects.serialize(&mut ser)?;

    Ok(String::from_utf8(buf)?)
}

fn render_xml(output: &ReportOutput) -> AppResult<String> {
    let root = output.kind.name();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    if output.rows.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(root)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(root)))?;
        for row in &output.rows {
            writer.write_event(Event::Start(BytesStart::new(XML_ROW)))?;
            for (column, cell) in output.columns.iter().zip(row) {
                writer.write_event(Event::Start(BytesStart::new(*column)))?;
                writer.write_event(Event::Text(BytesText::new(&cell.to_string())))?;
                writer.write_event(Event::End(BytesEnd::new(*column)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(XML_ROW)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(root)))?;
    }

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, ReportKind};

    fn film_count_output() -> ReportOutput {
        ReportOutput {
            kind: ReportKind::FilmsPerCategory,
            columns: &["category", "film_count"],
            rows: vec![vec![Cell::Text("Sci-Fi".into()), Cell::Integer(61)]],
        }
    }

    #[test]
    fn json_keeps_column_order_and_numeric_counts() {
        let json = render(&film_count_output(), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!([{ "category": "Sci-Fi", "film_count": 61 }]));

        let category_at = json.find("\"category\"").unwrap();
        let count_at = json.find("\"film_count\"").unwrap();
        assert!(category_at < count_at);
        assert!(json.contains("\n        \"category\""));
    }

    #[test]
    fn json_preserves_non_ascii_text() {
        let output = ReportOutput {
            kind: ReportKind::FilmsWithoutInventory,
            columns: &["title"],
            rows: vec![vec![Cell::Text("Amélie".into())]],
        };
        let json = render(&output, OutputFormat::Json).unwrap();
        assert!(json.contains("Amélie"));
    }

    #[test]
    fn empty_report_renders_empty_array() {
        let output =
            ReportOutput { kind: ReportKind::TopGrossingCategory, columns: &["category"], rows: vec![] };
        assert_eq!(render(&output, OutputFormat::Json).unwrap(), "[]");
        assert!(
            render(&output, OutputFormat::Xml).unwrap().ends_with("<top_grossing_category/>\n")
        );
    }

    #[test]
    fn xml_nests_rows_under_report_root() {
        let xml = render(&film_count_output(), OutputFormat::Xml).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        let root = xml.find("<films_per_category>").unwrap();
        let row = xml.find("<row>").unwrap();
        let category = xml.find("<category>Sci-Fi</category>").unwrap();
        let count = xml.find("<film_count>61</film_count>").unwrap();
        let row_end = xml.find("</row>").unwrap();
        assert!(root < row && row < category && category < count && count < row_end);
        assert!(xml.ends_with("</films_per_category>\n"));
    }

    #[test]
    fn xml_text_is_escaped() {
        let output = ReportOutput {
            kind: ReportKind::FilmsWithoutInventory,
            columns: &["title"],
            rows: vec![vec![Cell::Text("Tom & Jerry <3".into())]],
        };
        let xml = render(&output, OutputFormat::Xml).unwrap();
        assert!(xml.contains("<title>Tom &amp; Jerry &lt;3</title>"));
    }

    #[tokio::test]
    async fn write_report_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/reports");

        let path = write_report(&dir, &film_count_output(), OutputFormat::Xml).await.unwrap();

        assert_eq!(path, dir.join("films_per_category.xml"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("<category>Sci-Fi</category>"));
    }
}
