//! Minimal comma-separated line codec.
//!
//! Fields containing a comma or a double quote are wrapped in quotes with
//! inner quotes doubled. Rows are single lines: fields with line breaks are
//! refused by the writer and cannot be read.

use std::borrow::Cow;

/// Quote a field if it needs it.
#[must_use]
pub fn encode_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Whether a field would split its row across lines.
#[must_use]
pub fn has_line_break(field: &str) -> bool {
    field.contains(['\n', '\r'])
}

/// Join fields into one line, without the terminator.
#[must_use]
pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| encode_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one line into fields.
///
/// # Errors
///
/// Returns a description if a quote is unterminated or followed by
/// anything other than a separator.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;
    let mut just_closed = false;

    while let Some(c) = chars.next() {
        if quoted {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    quoted = false;
                    just_closed = true;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                just_closed = false;
            }
            '"' if field.is_empty() && !just_closed => quoted = true,
            _ if just_closed => {
                return Err(format!("unexpected '{c}' after closing quote"));
            }
            _ => field.push(c),
        }
    }

    if quoted {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}
