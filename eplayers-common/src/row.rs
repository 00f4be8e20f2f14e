//! Semicolon-delimited row codec
//!
//! Files have no header row and no quoting: every `;` separates fields and
//! every line break ends a row. Values that would break this layout are
//! rejected on encode instead of being escaped.

use crate::models::Record;
use crate::{Error, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

/// Field delimiter
pub const DELIMITER: u8 = b';';

/// One decoded row with its 1-based line number
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: u64,
    pub fields: StringRecord,
}

impl RawRow {
    /// First field, used as the row key for update/delete
    pub fn key(&self) -> Option<&str> {
        self.fields.get(0)
    }
}

/// Decode file content into rows, skipping blank lines
pub fn decode(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let fields = result?;
        let line = fields.position().map(|p| p.line()).unwrap_or(0);
        rows.push(RawRow { line, fields });
    }
    Ok(rows)
}

/// Reject a value containing the delimiter or a line break
pub fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if value.contains(|c: char| c == ';' || c == '\n' || c == '\r') {
        return Err(Error::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Encode already-validated rows, one `\n`-terminated line each
pub fn encode<'a, I>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a StringRecord>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// Validate named field values and build a record from them
pub fn build_record(names: &[&'static str], values: &[String]) -> Result<StringRecord> {
    for (name, value) in names.iter().zip(values) {
        validate_field(*name, value)?;
    }
    Ok(StringRecord::from(values.to_vec()))
}

/// Check that every field of `record` can be stored
pub fn validate_record<R: Record>(record: &R) -> Result<()> {
    build_record(R::FIELDS, &record.to_fields()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_splits_on_semicolon() {
        let rows = decode(b"1;FLA;fla.png\n2;COR;cor.png\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields.iter().collect::<Vec<_>>(), vec!["1", "FLA", "fla.png"]);
        assert_eq!(rows[1].key(), Some("2"));
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn test_decode_keeps_quotes_literal() {
        let rows = decode(b"1;\"Os Brabos\";x.png\n").unwrap();
        assert_eq!(&rows[0].fields[1], "\"Os Brabos\"");
    }

    #[test]
    fn test_decode_skips_blank_lines_and_crlf() {
        let rows = decode(b"1;A;a.png\r\n\r\n2;B;b.png").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0].fields[2], "a.png");
        assert_eq!(&rows[1].fields[2], "b.png");
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_decode_flexible_field_counts() {
        let rows = decode(b"1;A\n2;B;b.png;extra\n").unwrap();
        assert_eq!(rows[0].fields.len(), 2);
        assert_eq!(rows[1].fields.len(), 4);
    }

    #[test]
    fn test_encode_uses_newline_terminator() {
        let a = StringRecord::from(vec!["1", "FLA", "fla.png"]);
        let b = StringRecord::from(vec!["2", "COR"]);

        let bytes = encode([&a, &b]).unwrap();
        assert_eq!(bytes, b"1;FLA;fla.png\n2;COR\n");
    }

    #[test]
    fn test_validate_field_rejects_delimiter_and_breaks() {
        assert!(validate_field("name", "Time; B").is_err());
        assert!(validate_field("name", "line\nbreak").is_err());
        assert!(validate_field("name", "carriage\rreturn").is_err());
        assert!(validate_field("name", "Flamengo").is_ok());
    }

    #[test]
    fn test_build_record_reports_field_name() {
        let names = ["id", "name"];
        let values = vec!["1".to_string(), "a;b".to_string()];

        match build_record(&names, &values) {
            Err(Error::InvalidField { field, value }) => {
                assert_eq!(field, "name");
                assert_eq!(value, "a;b");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_record() {
        use crate::models::Team;

        assert!(validate_record(&Team::new(1, "FLA", "fla.png")).is_ok());
        assert!(matches!(
            validate_record(&Team::new(1, "FLA", "a;b.png")),
            Err(Error::InvalidField { field: "image", .. })
        ));
    }
}
