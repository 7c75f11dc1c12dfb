use glam::{Affine3A, Vec3};

use crate::util::rotation_from_euler;

/// A single joint in a [`super::Skeleton`].
///
/// Joints are stored in an arena and refer to each other by their index, which is also the order
/// they were loaded in.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Transform from this joint's space into its parent's space
    pub local_transform: Affine3A,
    /// Transform from world space (in the bind pose) into this joint's space.
    /// Resolved once by [`crate::systems::bind_pose_system`]
    pub bind_world_to_joint: Affine3A,
    /// Transform from this joint's space into world space, in the current pose.
    /// Refreshed by [`crate::systems::pose_system`]
    pub current_joint_to_world: Affine3A,
    /// Index of the parent joint, `None` for the root
    pub parent: Option<usize>,
    /// Indices of the children of this joint, in load order
    pub children: Vec<usize>,
}

impl Joint {
    /// Create a joint that sits at `translation` relative to its parent, with no rotation
    pub fn new(translation: Vec3, parent: Option<usize>) -> Self {
        Self {
            local_transform: Affine3A::from_translation(translation),
            bind_world_to_joint: Affine3A::IDENTITY,
            current_joint_to_world: Affine3A::IDENTITY,
            parent,
            children: Vec::new(),
        }
    }

    /// Replace the rotation block of the local transform with `Rx(rx) * Ry(ry) * Rz(rz)`.
    /// The translation is left alone.
    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32) {
        self.local_transform.matrix3 = rotation_from_euler(rx, ry, rz);
    }

    /// The translation of this joint relative to its parent
    pub fn translation(&self) -> Vec3 {
        self.local_transform.translation.into()
    }

    /// Is this the root of the skeleton?
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
