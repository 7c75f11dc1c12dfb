use serde::{Deserialize, Serialize};

/// Euler rotation for a single joint, in radians. See [`crate::util::rotation_from_euler`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct JointRotation {
    /// Index of the joint, in skeleton load order
    pub joint: usize,
    /// Rotation about X
    #[serde(default)]
    pub rx: f32,
    /// Rotation about Y
    #[serde(default)]
    pub ry: f32,
    /// Rotation about Z
    #[serde(default)]
    pub rz: f32,
}

/// A batch of joint rotations, applied all at once by [`crate::SkeletalModel::apply_pose`].
/// Joints that aren't mentioned keep whatever rotation they already had.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Pose {
    /// The rotations to apply, in order. Later entries for the same joint win.
    pub rotations: Vec<JointRotation>,
}

impl Pose {
    /// Create an empty pose
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a rotation for `joint`
    pub fn with_rotation(mut self, joint: usize, rx: f32, ry: f32, rz: f32) -> Self {
        self.rotations.push(JointRotation { joint, rx, ry, rz });
        self
    }
}
