mod attachments;
mod mesh;
mod skeleton;

pub use attachments::{load_attachments, parse_attachments};
pub use mesh::{load_mesh, parse_mesh, write_mesh};
pub use skeleton::{load_skeleton, parse_skeleton};

use std::{path::Path, str::FromStr};

use crate::{OsteonError, OsteonResult};

/// Read a whole text asset into memory, naming it after its path for error messages
fn read_asset(path: &Path) -> OsteonResult<(String, String)> {
    let text = std::fs::read_to_string(path)?;
    Ok((path.display().to_string(), text))
}

/// Non-blank lines of `text`, split on whitespace and paired with their 1-based line number
fn records<'a>(text: &'a str) -> impl Iterator<Item = (usize, Vec<&'a str>)> + 'a {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, fields)| !fields.is_empty())
}

fn expect_fields(
    source_name: &str,
    line: usize,
    fields: &[&str],
    expected: usize,
) -> OsteonResult<()> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(OsteonError::WrongFieldCount {
            source_name: source_name.to_string(),
            line,
            expected,
            found: fields.len(),
        })
    }
}

fn parse_number<T: FromStr>(source_name: &str, line: usize, value: &str) -> OsteonResult<T> {
    value.parse().map_err(|_| OsteonError::InvalidNumber {
        source_name: source_name.to_string(),
        line,
        value: value.to_string(),
    })
}

/// Like [`parse_number`], but `NaN` and infinities are rejected too
fn parse_float(source_name: &str, line: usize, value: &str) -> OsteonResult<f32> {
    let number: f32 = parse_number(source_name, line, value)?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(OsteonError::InvalidNumber {
            source_name: source_name.to_string(),
            line,
            value: value.to_string(),
        })
    }
}
