use log::debug;

use super::walk_joints;
use crate::{components::Skeleton, transform_stack::TransformStack};

/// Bind pose system
/// Resolves each joint's world-to-joint transform in the rest pose. Only needs to run once, right
/// after the skeleton is loaded and before any rotations are applied.
pub fn bind_pose_system(skeleton: &mut Skeleton, stack: &mut TransformStack) {
    walk_joints(skeleton, stack, |joint, joint_to_world| {
        joint.bind_world_to_joint = joint_to_world.inverse();
    });
    debug!("Resolved bind pose for {} joints", skeleton.len());
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Affine3A, Vec3};

    use super::*;

    #[test]
    pub fn test_bind_pose_system() {
        let mut skeleton = Skeleton::new();
        let root = skeleton
            .add_joint(Vec3::new(1.0, 2.0, 3.0), None)
            .unwrap();
        let child = skeleton.add_joint(Vec3::new(0.0, 1.0, 0.0), Some(root)).unwrap();
        let grandchild = skeleton
            .add_joint(Vec3::new(0.0, 0.0, -4.0), Some(child))
            .unwrap();

        let mut stack = TransformStack::new();
        bind_pose_system(&mut skeleton, &mut stack);

        let expected = [
            Affine3A::from_translation(Vec3::new(-1.0, -2.0, -3.0)),
            Affine3A::from_translation(Vec3::new(-1.0, -3.0, -3.0)),
            Affine3A::from_translation(Vec3::new(-1.0, -3.0, 1.0)),
        ];
        for (index, expected) in [root, child, grandchild].into_iter().zip(expected) {
            assert_relative_eq!(skeleton.joint(index).unwrap().bind_world_to_joint, expected);
        }
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    pub fn test_bind_pose_maps_joint_origin_to_zero() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Vec3::ZERO, None).unwrap();
        skeleton.add_joint(Vec3::X, Some(0)).unwrap();
        skeleton.joint_mut(0).unwrap().set_rotation(0.0, 0.0, 0.7);

        let mut stack = TransformStack::new();
        bind_pose_system(&mut skeleton, &mut stack);

        // The child sits at Rz(0.7) * X in world space
        let child_in_world = glam::Affine3A::from_rotation_z(0.7).transform_point3(Vec3::X);
        let child = skeleton.joint(1).unwrap();
        assert_relative_eq!(
            child.bind_world_to_joint.transform_point3(child_in_world),
            Vec3::ZERO,
            epsilon = 1e-6
        );
    }
}
