use std::path::Path;

use glam::Vec3;
use log::debug;

use super::{expect_fields, parse_float, parse_number, read_asset, records};
use crate::{components::Skeleton, OsteonError, OsteonResult};

/// Load a skeleton file from disk. See [`parse_skeleton`] for the format.
pub fn load_skeleton(path: impl AsRef<Path>) -> OsteonResult<Skeleton> {
    let (source_name, text) = read_asset(path.as_ref())?;
    parse_skeleton(&source_name, &text)
}

/// Parse a skeleton.
///
/// Each line is `x y z parent`: the joint's translation relative to its parent, and the 0-based
/// index of that parent in load order. The root's parent is `-1`, and there must be exactly one
/// root. Parents have to be declared before their children.
pub fn parse_skeleton(source_name: &str, text: &str) -> OsteonResult<Skeleton> {
    let mut skeleton = Skeleton::new();

    for (line, fields) in records(text) {
        expect_fields(source_name, line, &fields, 4)?;
        let x = parse_float(source_name, line, fields[0])?;
        let y = parse_float(source_name, line, fields[1])?;
        let z = parse_float(source_name, line, fields[2])?;
        let parent = parse_number::<i64>(source_name, line, fields[3])?;

        let joint = skeleton.len();
        let parent = match parent {
            -1 => None,
            p if p >= 0 && (p as usize) < joint => Some(p as usize),
            _ => {
                return Err(OsteonError::InvalidParent {
                    source_name: source_name.to_string(),
                    line,
                    joint,
                    parent,
                })
            }
        };

        skeleton.add_joint(Vec3::new(x, y, z), parent)?;
    }

    if skeleton.root().is_none() {
        return Err(OsteonError::MissingRoot);
    }

    debug!("Loaded {} joints from {source_name}", skeleton.len());
    Ok(skeleton)
}
