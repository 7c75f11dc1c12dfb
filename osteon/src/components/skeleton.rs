use std::fmt;

use glam::{Affine3A, Vec3};
use itertools::Itertools;

use super::Joint;
use crate::{util::bone_box_transform, OsteonError, OsteonResult};

/// A tree of [`Joint`]s, stored as an arena in load order.
///
/// Parents always come before their children, so the arena can never contain a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    joints: Vec<Joint>,
    root: Option<usize>,
}

impl Skeleton {
    /// Create an empty skeleton
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a joint at `translation` relative to `parent`, returning its index.
    ///
    /// `parent` must be a joint that was already added. Passing `None` makes the joint the root,
    /// and there can only be one of those.
    pub fn add_joint(&mut self, translation: Vec3, parent: Option<usize>) -> OsteonResult<usize> {
        let index = self.joints.len();
        match parent {
            None => {
                if let Some(first) = self.root {
                    return Err(OsteonError::MultipleRoots {
                        first,
                        second: index,
                    });
                }
                self.root = Some(index);
            }
            Some(parent) => {
                self.joint_mut(parent)?.children.push(index);
            }
        }

        self.joints.push(Joint::new(translation, parent));
        Ok(index)
    }

    /// Index of the root joint
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Number of joints, including the root
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Does the skeleton have no joints at all?
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// All the joints, in load order
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Get a joint by index
    pub fn joint(&self, index: usize) -> OsteonResult<&Joint> {
        self.joints
            .get(index)
            .ok_or(OsteonError::JointIndexOutOfRange {
                index,
                joint_count: self.joints.len(),
            })
    }

    /// Get a joint mutably by index
    pub fn joint_mut(&mut self, index: usize) -> OsteonResult<&mut Joint> {
        let joint_count = self.joints.len();
        self.joints
            .get_mut(index)
            .ok_or(OsteonError::JointIndexOutOfRange { index, joint_count })
    }

    pub(crate) fn joints_mut(&mut self) -> &mut [Joint] {
        &mut self.joints
    }

    /// Positions of every joint in world space, in the current pose
    pub fn joint_positions(&self) -> Vec<Vec3> {
        self.joints
            .iter()
            .map(|j| j.current_joint_to_world.translation.into())
            .collect()
    }

    /// One transform per bone (parent to child link), mapping a unit cube centred on the origin
    /// onto a box of the given `thickness` joining the two joints in the current pose.
    pub fn bone_transforms(&self, thickness: f32) -> Vec<Affine3A> {
        self.joints
            .iter()
            .filter_map(|child| {
                let parent = &self.joints[child.parent?];
                let bone = bone_box_transform(child.translation(), thickness)?;
                Some(parent.current_joint_to_world * bone)
            })
            .collect()
    }
}

/// One line per joint, children indented under their parent
impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };

        let mut pending = vec![(root, 0)];
        while let Some((index, depth)) = pending.pop() {
            let joint = &self.joints[index];
            let t = joint.translation();
            writeln!(
                f,
                "{:indent$}{index}: ({}, {}, {}) -> [{}]",
                "",
                t.x,
                t.y,
                t.z,
                joint.children.iter().join(", "),
                indent = depth * 2
            )?;
            pending.extend(joint.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        Ok(())
    }
}
