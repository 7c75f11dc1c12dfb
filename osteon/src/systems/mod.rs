#![allow(missing_docs)]
pub mod bind_pose;
pub mod pose;
pub mod skinning;

pub use bind_pose::bind_pose_system;
pub use pose::pose_system;
pub use skinning::skinning_system;

use glam::Affine3A;

use crate::{
    components::{Joint, Skeleton},
    transform_stack::TransformStack,
};

enum Visit {
    Enter(usize),
    Exit,
}

/// Walk the skeleton depth first, parents before children and children in load order.
///
/// Each joint's local transform is pushed onto `stack` before `visit` is called with the joint
/// and the accumulated root-to-joint transform, and popped once all of its descendants are done.
/// The walk keeps its own work list, so deep skeletons can't overflow the call stack.
pub(crate) fn walk_joints<F>(skeleton: &mut Skeleton, stack: &mut TransformStack, mut visit: F)
where
    F: FnMut(&mut Joint, Affine3A),
{
    stack.clear();
    let Some(root) = skeleton.root() else {
        return;
    };

    let joints = skeleton.joints_mut();
    let mut work = vec![Visit::Enter(root)];
    while let Some(next) = work.pop() {
        match next {
            Visit::Enter(index) => {
                let joint = &mut joints[index];
                stack.push(joint.local_transform);
                visit(joint, stack.top());

                work.push(Visit::Exit);
                work.extend(joint.children.iter().rev().map(|&c| Visit::Enter(c)));
            }
            Visit::Exit => stack.pop(),
        }
    }

    debug_assert_eq!(stack.depth(), 0);
}
