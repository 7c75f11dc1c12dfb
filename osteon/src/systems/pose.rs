use super::walk_joints;
use crate::{components::Skeleton, transform_stack::TransformStack};

/// Pose system
/// Walks the hierarchy and refreshes each joint's joint-to-world transform from the current local
/// transforms. Run it after every rotation change, before skinning.
pub fn pose_system(skeleton: &mut Skeleton, stack: &mut TransformStack) {
    walk_joints(skeleton, stack, |joint, joint_to_world| {
        joint.current_joint_to_world = joint_to_world;
    });
}
