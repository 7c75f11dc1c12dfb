use std::{io::Write, path::Path};

use glam::Vec3;
use log::debug;

use super::{expect_fields, parse_float, parse_number, read_asset, records};
use crate::{
    components::{Face, Mesh},
    OsteonError, OsteonResult,
};

/// Load a mesh file from disk. See [`parse_mesh`] for the format.
pub fn load_mesh(path: impl AsRef<Path>) -> OsteonResult<Mesh> {
    let (source_name, text) = read_asset(path.as_ref())?;
    parse_mesh(&source_name, &text)
}

/// Parse a mesh.
///
/// Each line is either a vertex, `v x y z`, or a triangle, `f i j k`, where the indices are
/// 1-based and refer to vertices in the order they appear in the file. Faces may come before the
/// vertices they use.
pub fn parse_mesh(source_name: &str, text: &str) -> OsteonResult<Mesh> {
    let mut vertices = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line, fields) in records(text) {
        match fields[0] {
            "v" => {
                expect_fields(source_name, line, &fields, 4)?;
                let x = parse_float(source_name, line, fields[1])?;
                let y = parse_float(source_name, line, fields[2])?;
                let z = parse_float(source_name, line, fields[3])?;
                vertices.push(Vec3::new(x, y, z));
            }
            "f" => {
                expect_fields(source_name, line, &fields, 4)?;
                let i = parse_number(source_name, line, fields[1])?;
                let j = parse_number(source_name, line, fields[2])?;
                let k = parse_number(source_name, line, fields[3])?;
                faces.push([i, j, k]);
            }
            header => {
                return Err(OsteonError::UnrecognisedLineHeader {
                    source_name: source_name.to_string(),
                    line,
                    header: header.to_string(),
                })
            }
        }
    }

    debug!(
        "Loaded {} vertices and {} faces from {source_name}",
        vertices.len(),
        faces.len()
    );
    Mesh::new(vertices, faces)
}

/// Write the mesh in its current pose, in the same format [`parse_mesh`] reads
pub fn write_mesh(mesh: &Mesh, mut writer: impl Write) -> OsteonResult<()> {
    for v in &mesh.current_vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [i, j, k] in &mesh.faces {
        writeln!(writer, "f {i} {j} {k}")?;
    }
    writer.flush()?;
    Ok(())
}
