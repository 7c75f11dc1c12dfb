use std::path::Path;

use log::debug;

use super::{parse_float, read_asset, records};
use crate::OsteonResult;

/// Load an attachment weights file from disk. See [`parse_attachments`] for the format.
pub fn load_attachments(path: impl AsRef<Path>) -> OsteonResult<Vec<Vec<f32>>> {
    let (source_name, text) = read_asset(path.as_ref())?;
    parse_attachments(&source_name, &text)
}

/// Parse attachment weights.
///
/// There is one line per mesh vertex, holding one weight for every joint except the root, in
/// joint load order. Rows are returned exactly as written; matching them up against a mesh and
/// skeleton happens in [`crate::SkeletalModel::new`].
pub fn parse_attachments(source_name: &str, text: &str) -> OsteonResult<Vec<Vec<f32>>> {
    let rows = records(text)
        .map(|(line, fields)| {
            fields
                .into_iter()
                .map(|value| parse_float(source_name, line, value))
                .collect::<OsteonResult<Vec<f32>>>()
        })
        .collect::<OsteonResult<Vec<_>>>()?;

    debug!("Loaded weights for {} vertices from {source_name}", rows.len());
    Ok(rows)
}
