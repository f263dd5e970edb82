//! Line tokenizing and rendering for delimited text.

use crate::error::{IngestError, Result};

/// Splits one line into trimmed fields, honoring double-quote quoting.
///
/// A doubled quote inside a quoted section is a literal `"`. An unterminated
/// quote runs to the end of the line. An empty line yields one empty field.
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Renders fields as one line, quoting only where needed.
///
/// The output re-tokenizes to the same fields for any input without line
/// breaks.
pub fn render_line<S: AsRef<str>>(fields: &[S], delimiter: char) -> Result<String> {
    let delimiter = delimiter_byte(delimiter)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|field| field.as_ref().as_bytes()))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| IngestError::Io(err.into_error()))?;
    let mut line = String::from_utf8_lossy(&bytes).into_owned();
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Checks that a delimiter can separate fields.
pub fn validate_delimiter(delimiter: char) -> Result<()> {
    match delimiter {
        '"' => Err(IngestError::InvalidDelimiter {
            delimiter,
            reason: "the quote character cannot separate fields",
        }),
        '\n' | '\r' => Err(IngestError::InvalidDelimiter {
            delimiter,
            reason: "line breaks cannot separate fields",
        }),
        _ => Ok(()),
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    validate_delimiter(delimiter)?;
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::InvalidDelimiter {
            delimiter,
            reason: "rendering requires an ASCII delimiter",
        })
}
