use glam::{Affine3A, Vec3};

use crate::components::{Mesh, Skeleton};

/// Skinning system
/// Deforms the mesh with linear blend skinning: each vertex's current position is the weighted
/// sum, over every non-root joint, of where that joint's bind-to-current motion would take the
/// bind position. Weights are used exactly as stored on the mesh.
///
/// Expects [`super::pose_system`] to have been run since the last rotation change.
///
/// # Panics
///
/// If the mesh doesn't have exactly one attachment row per vertex, or a row doesn't hold exactly
/// one weight per joint.
pub fn skinning_system(skeleton: &Skeleton, mesh: &mut Mesh) {
    let root = skeleton.root();
    let joint_matrices: Vec<(usize, Affine3A)> = skeleton
        .joints()
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != root)
        .map(|(index, joint)| {
            (
                index,
                joint.current_joint_to_world * joint.bind_world_to_joint,
            )
        })
        .collect();

    let Mesh {
        bind_vertices,
        current_vertices,
        attachments,
        ..
    } = mesh;

    assert_eq!(
        attachments.len(),
        bind_vertices.len(),
        "every vertex needs an attachment row"
    );
    for (vertex, weights) in attachments.iter().enumerate() {
        assert_eq!(
            weights.len(),
            skeleton.len(),
            "attachment row for vertex {vertex} needs one weight per joint"
        );
    }

    for ((bind, current), weights) in bind_vertices
        .iter()
        .zip(current_vertices.iter_mut())
        .zip(attachments.iter())
    {
        *current = joint_matrices
            .iter()
            .filter_map(|(joint, matrix)| {
                let weight = weights[*joint];
                (weight != 0.0).then(|| weight * matrix.transform_point3(*bind))
            })
            .sum::<Vec3>();
    }
}
