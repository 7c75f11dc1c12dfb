use std::path::Path;

use log::{debug, info, warn};

use crate::{
    asset_importer::{
        load_attachments, load_mesh, load_skeleton, parse_attachments, parse_mesh, parse_skeleton,
    },
    components::{Mesh, Skeleton},
    pose::Pose,
    systems::{bind_pose_system, pose_system, skinning_system},
    transform_stack::TransformStack,
    OsteonError, OsteonResult,
};

/// What to do with attachment weights that don't add up to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightPolicy {
    /// Reject any vertex whose weights are further than `tolerance` from 1
    Validate {
        /// How far from 1 a vertex's weights may sum
        tolerance: f32,
    },
    /// Rescale every vertex's weights so they sum to 1
    Normalize,
    /// Use the weights exactly as loaded
    Trust,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy::Validate { tolerance: 1e-3 }
    }
}

/// Configures how a [`SkeletalModel`] is assembled
#[derive(Debug, Clone, Default)]
pub struct SkeletalModelBuilder {
    weight_policy: WeightPolicy,
}

impl SkeletalModelBuilder {
    /// Create a `SkeletalModelBuilder`
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the policy for weights that don't sum to 1
    pub fn weight_policy(&mut self, weight_policy: WeightPolicy) -> &mut Self {
        self.weight_policy = weight_policy;
        self
    }

    /// Build the model from already loaded parts
    pub fn build(
        &self,
        skeleton: Skeleton,
        mesh: Mesh,
        attachments: Vec<Vec<f32>>,
    ) -> OsteonResult<SkeletalModel> {
        SkeletalModel::new(skeleton, mesh, attachments, self.weight_policy)
    }

    /// Load the skeleton, mesh and attachment files and build the model
    pub fn load(
        &self,
        skeleton_path: impl AsRef<Path>,
        mesh_path: impl AsRef<Path>,
        attachments_path: impl AsRef<Path>,
    ) -> OsteonResult<SkeletalModel> {
        let skeleton = load_skeleton(skeleton_path)?;
        let mesh = load_mesh(mesh_path)?;
        let attachments = load_attachments(attachments_path)?;
        self.build(skeleton, mesh, attachments)
    }

    /// Parse the skeleton, mesh and attachments from text and build the model
    pub fn parse(
        &self,
        skeleton: &str,
        mesh: &str,
        attachments: &str,
    ) -> OsteonResult<SkeletalModel> {
        let skeleton = parse_skeleton("skeleton", skeleton)?;
        let mesh = parse_mesh("mesh", mesh)?;
        let attachments = parse_attachments("attachments", attachments)?;
        self.build(skeleton, mesh, attachments)
    }
}

/// A mesh skinned to a skeleton.
///
/// After loading, the model is in its bind pose. To pose it, change joint rotations with
/// [`SkeletalModel::set_joint_rotation`], then call [`SkeletalModel::update_current_transforms`]
/// followed by [`SkeletalModel::update_mesh`]. [`SkeletalModel::apply_pose`] does all three.
#[derive(Debug, Clone)]
pub struct SkeletalModel {
    skeleton: Skeleton,
    mesh: Mesh,
    stack: TransformStack,
}

impl SkeletalModel {
    /// Load a model with the default [`SkeletalModelBuilder`] settings
    pub fn load(
        skeleton_path: impl AsRef<Path>,
        mesh_path: impl AsRef<Path>,
        attachments_path: impl AsRef<Path>,
    ) -> OsteonResult<Self> {
        SkeletalModelBuilder::new().load(skeleton_path, mesh_path, attachments_path)
    }

    /// Attach `mesh` to `skeleton` using one row of `attachments` per vertex, each holding one
    /// weight per non-root joint, then resolve the bind pose.
    ///
    /// A skeleton with only a root has nothing to attach to, so every row is empty. Blank lines
    /// are dropped by [`crate::asset_importer::parse_attachments`], so for such a skeleton an
    /// empty `attachments` is taken to mean one empty row per vertex.
    pub fn new(
        skeleton: Skeleton,
        mut mesh: Mesh,
        mut attachments: Vec<Vec<f32>>,
        weight_policy: WeightPolicy,
    ) -> OsteonResult<Self> {
        let root = skeleton.root().ok_or(OsteonError::MissingRoot)?;
        if skeleton.len() == 1 && attachments.is_empty() {
            attachments = vec![Vec::new(); mesh.vertex_count()];
        }
        if attachments.len() != mesh.vertex_count() {
            return Err(OsteonError::AttachmentCountMismatch {
                expected: mesh.vertex_count(),
                found: attachments.len(),
            });
        }

        let joint_count = skeleton.len();
        mesh.attachments = attachments
            .into_iter()
            .enumerate()
            .map(|(vertex, weights)| {
                if weights.len() != joint_count - 1 {
                    return Err(OsteonError::WeightCountMismatch {
                        vertex,
                        expected: joint_count - 1,
                        found: weights.len(),
                    });
                }
                let weights = apply_weight_policy(vertex, weights, weight_policy)?;

                // Give the root a column of its own so weights line up with joint indices
                let mut row = weights;
                row.insert(root, 0.0);
                Ok(row)
            })
            .collect::<OsteonResult<_>>()?;

        let mut model = Self {
            skeleton,
            mesh,
            stack: TransformStack::new(),
        };
        bind_pose_system(&mut model.skeleton, &mut model.stack);
        model.update_current_transforms();

        info!(
            "Skeletal model ready: {} joints, {} vertices, {} faces",
            model.skeleton.len(),
            model.mesh.vertex_count(),
            model.mesh.faces.len()
        );
        Ok(model)
    }

    /// The skeleton driving the mesh
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// The skinned mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Set the rotation of a joint. Nothing is recomputed until
    /// [`SkeletalModel::update_current_transforms`] and [`SkeletalModel::update_mesh`] are called.
    pub fn set_joint_rotation(
        &mut self,
        joint_index: usize,
        rx: f32,
        ry: f32,
        rz: f32,
    ) -> OsteonResult<()> {
        self.skeleton
            .joint_mut(joint_index)?
            .set_rotation(rx, ry, rz);
        Ok(())
    }

    /// Recompute every joint's joint-to-world transform for the current pose
    pub fn update_current_transforms(&mut self) {
        pose_system(&mut self.skeleton, &mut self.stack);
    }

    /// Deform the mesh to match the current pose
    pub fn update_mesh(&mut self) {
        skinning_system(&self.skeleton, &mut self.mesh);
    }

    /// Apply every rotation in `pose`, then update the skeleton and mesh.
    /// If any rotation names a joint that doesn't exist, nothing is changed.
    pub fn apply_pose(&mut self, pose: &Pose) -> OsteonResult<()> {
        for rotation in &pose.rotations {
            self.skeleton.joint(rotation.joint)?;
        }
        for rotation in &pose.rotations {
            self.set_joint_rotation(rotation.joint, rotation.rx, rotation.ry, rotation.rz)?;
        }

        debug!("Applied {} joint rotations", pose.rotations.len());
        self.update_current_transforms();
        self.update_mesh();
        Ok(())
    }

    /// Clear every joint's rotation, returning the model to its bind pose
    pub fn reset_pose(&mut self) {
        for joint in self.skeleton.joints_mut() {
            joint.set_rotation(0.0, 0.0, 0.0);
        }
        self.update_current_transforms();
        self.update_mesh();
    }
}

fn apply_weight_policy(
    vertex: usize,
    mut weights: Vec<f32>,
    policy: WeightPolicy,
) -> OsteonResult<Vec<f32>> {
    let sum: f32 = weights.iter().sum();
    // Every policy refuses NaN or infinite weights, whatever the sum
    if !sum.is_finite() || weights.iter().any(|w| !w.is_finite()) {
        return Err(OsteonError::WeightsDoNotSumToOne { vertex, sum });
    }

    match policy {
        WeightPolicy::Trust => {}
        WeightPolicy::Validate { tolerance } => {
            if !((sum - 1.0).abs() <= tolerance) {
                return Err(OsteonError::WeightsDoNotSumToOne { vertex, sum });
            }
        }
        WeightPolicy::Normalize => {
            if sum.abs() <= f32::EPSILON {
                return Err(OsteonError::WeightsDoNotSumToOne { vertex, sum });
            }
            if (sum - 1.0).abs() > f32::EPSILON {
                warn!("Normalising weights for vertex {vertex}, which summed to {sum}");
                weights.iter_mut().for_each(|w| *w /= sum);
            }
        }
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;
    use glam::{Affine3A, Mat3A, Vec3};

    use super::*;

    const SKELETON: &str = include_str!("../../test_assets/arm.skel");
    const MESH: &str = include_str!("../../test_assets/arm.obj");
    const ATTACHMENTS: &str = include_str!("../../test_assets/arm.attach");

    fn arm() -> SkeletalModel {
        SkeletalModelBuilder::new()
            .parse(SKELETON, MESH, ATTACHMENTS)
            .unwrap()
    }

    #[test]
    pub fn test_model_starts_in_bind_pose() {
        let mut model = arm();
        for joint in model.skeleton().joints() {
            assert_relative_eq!(
                joint.current_joint_to_world,
                joint.bind_world_to_joint.inverse()
            );
        }

        model.update_mesh();
        for (current, bind) in model.mesh().current_vertices.iter().zip(&model.mesh().bind_vertices) {
            assert_relative_eq!(*current, *bind, epsilon = 1e-6);
        }
    }

    #[test]
    pub fn test_root_rotation_scenario() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Vec3::ZERO, None).unwrap();
        skeleton.add_joint(Vec3::new(0.0, 1.0, 0.0), Some(0)).unwrap();
        let mesh = Mesh::new(vec![Vec3::new(0.0, 1.0, 0.0)], vec![]).unwrap();

        let mut model = SkeletalModelBuilder::new()
            .build(skeleton, mesh, vec![vec![1.0]])
            .unwrap();
        model.set_joint_rotation(0, 0.0, 0.0, FRAC_PI_2).unwrap();
        model.update_current_transforms();
        model.update_mesh();

        assert_relative_eq!(
            model.mesh().current_vertices[0],
            Vec3::new(-1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    pub fn test_update_is_idempotent() {
        let mut model = arm();
        model.set_joint_rotation(2, 0.3, 0.2, 0.9).unwrap();

        model.update_current_transforms();
        model.update_mesh();
        let joints = model.skeleton().clone();
        let vertices = model.mesh().current_vertices.clone();

        model.update_current_transforms();
        model.update_mesh();
        assert_eq!(&joints, model.skeleton());
        assert_eq!(vertices, model.mesh().current_vertices);
    }

    #[test]
    pub fn test_zero_rotation_round_trip() {
        let mut model = arm();
        model
            .apply_pose(&Pose::new().with_rotation(1, 0.5, -0.25, 1.0))
            .unwrap();
        assert_ne!(model.mesh().current_vertices, model.mesh().bind_vertices);

        model.apply_pose(&Pose::new().with_rotation(1, 0.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(
            model.skeleton().joint(1).unwrap().local_transform.matrix3,
            Mat3A::IDENTITY
        );
        for (current, bind) in model.mesh().current_vertices.iter().zip(&model.mesh().bind_vertices) {
            assert_relative_eq!(*current, *bind, epsilon = 1e-5);
        }
    }

    #[test]
    pub fn test_weight_locality() {
        let mut model = arm();
        // The wrist only influences the top four vertices
        model.apply_pose(&Pose::new().with_rotation(3, 0.0, 0.0, PI / 3.0)).unwrap();

        let mesh = model.mesh();
        for i in 0..4 {
            assert_relative_eq!(mesh.current_vertices[i], mesh.bind_vertices[i], epsilon = 1e-6);
        }
        for i in 4..8 {
            assert!(mesh.current_vertices[i].distance(mesh.bind_vertices[i]) > 1e-3);
        }
    }

    #[test]
    pub fn test_elbow_bends_forearm() {
        let mut model = arm();
        model
            .apply_pose(&Pose::new().with_rotation(2, 0.0, 0.0, -FRAC_PI_2))
            .unwrap();

        let positions = model.skeleton().joint_positions();
        assert_relative_eq!(positions[2], Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(positions[3], Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-6);

        // Fully attached to the wrist: (0.1, 3, 0) is (0.1, 1, 0) from the wrist in the bind pose,
        // and the elbow's turn carries it round
        assert_relative_eq!(
            model.mesh().current_vertices[7],
            Vec3::new(2.0, 0.9, 0.0),
            epsilon = 1e-5
        );
        // Half on the shoulder, which stays put, and half on the elbow, which turns (0.1, 1, 0)
        // into (0, 0.9, 0)
        assert_relative_eq!(
            model.mesh().current_vertices[3],
            Vec3::new(0.05, 0.95, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            model.mesh().current_vertices[1],
            model.mesh().bind_vertices[1],
            epsilon = 1e-6
        );
    }

    #[test]
    pub fn test_bad_pose_changes_nothing() {
        let mut model = arm();
        let before = model.skeleton().clone();
        let pose = Pose::new()
            .with_rotation(1, 0.0, 0.0, 1.0)
            .with_rotation(4, 0.0, 0.0, 1.0);

        assert!(matches!(
            model.apply_pose(&pose),
            Err(OsteonError::JointIndexOutOfRange {
                index: 4,
                joint_count: 4
            })
        ));
        assert_eq!(&before, model.skeleton());
        assert!(model.set_joint_rotation(17, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    pub fn test_reset_pose() {
        let mut model = arm();
        model
            .apply_pose(&Pose::new().with_rotation(0, 1.0, 0.0, 0.0).with_rotation(3, 0.0, 1.0, 0.0))
            .unwrap();
        model.reset_pose();
        for joint in model.skeleton().joints() {
            assert_relative_eq!(
                joint.current_joint_to_world * joint.bind_world_to_joint,
                Affine3A::IDENTITY,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    pub fn test_attachment_counts_are_checked() {
        let builder = SkeletalModelBuilder::new();
        assert!(matches!(
            builder.parse(SKELETON, MESH, "1 0 0\n"),
            Err(OsteonError::AttachmentCountMismatch {
                expected: 8,
                found: 1
            })
        ));

        let too_many = ATTACHMENTS.replacen("1 0 0", "1 0 0 0", 1);
        assert!(matches!(
            builder.parse(SKELETON, MESH, &too_many),
            Err(OsteonError::WeightCountMismatch {
                vertex: 0,
                expected: 3,
                found: 4
            })
        ));
    }

    #[test]
    pub fn test_weight_policies() {
        let skewed = ATTACHMENTS.replacen("0.5 0.5 0", "0.5 1.5 0", 1);

        assert!(matches!(
            SkeletalModelBuilder::new().parse(SKELETON, MESH, &skewed),
            Err(OsteonError::WeightsDoNotSumToOne { vertex: 2, .. })
        ));

        let model = SkeletalModelBuilder::new()
            .weight_policy(WeightPolicy::Normalize)
            .parse(SKELETON, MESH, &skewed)
            .unwrap();
        assert_eq!(model.mesh().attachments[2], vec![0.0, 0.25, 0.75, 0.0]);

        let model = SkeletalModelBuilder::new()
            .weight_policy(WeightPolicy::Trust)
            .parse(SKELETON, MESH, &skewed)
            .unwrap();
        assert_eq!(model.mesh().attachments[2], vec![0.0, 0.5, 1.5, 0.0]);

        let zeroed = ATTACHMENTS.replacen("1 0 0", "0 0 0", 1);
        assert!(SkeletalModelBuilder::new()
            .weight_policy(WeightPolicy::Normalize)
            .parse(SKELETON, MESH, &zeroed)
            .is_err());
    }

    #[test]
    pub fn test_non_finite_weights_are_rejected() {
        let skeleton = || parse_skeleton("skeleton", "0 0 0 -1\n0 1 0 0\n").unwrap();
        let mesh = || parse_mesh("mesh", "v 0 1 0\n").unwrap();
        let policies = [
            WeightPolicy::default(),
            WeightPolicy::Validate { tolerance: f32::NAN },
            WeightPolicy::Normalize,
            WeightPolicy::Trust,
        ];

        for policy in policies {
            for weight in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
                assert!(
                    matches!(
                        SkeletalModelBuilder::new().weight_policy(policy).build(
                            skeleton(),
                            mesh(),
                            vec![vec![weight]]
                        ),
                        Err(OsteonError::WeightsDoNotSumToOne { vertex: 0, .. })
                    ),
                    "{policy:?} accepted {weight}"
                );
            }
        }

        // The text formats never get that far
        assert!(matches!(
            SkeletalModelBuilder::new()
                .weight_policy(WeightPolicy::Trust)
                .parse("0 0 0 -1\n0 1 0 0\n", "v 0 1 0\n", "NaN\n"),
            Err(OsteonError::InvalidNumber { .. })
        ));
    }

    #[test]
    pub fn test_nan_tolerance_rejects_everything() {
        assert!(matches!(
            SkeletalModelBuilder::new()
                .weight_policy(WeightPolicy::Validate { tolerance: f32::NAN })
                .parse(SKELETON, MESH, ATTACHMENTS),
            Err(OsteonError::WeightsDoNotSumToOne { vertex: 0, .. })
        ));
    }

    #[test]
    pub fn test_root_only_skeleton() {
        let model = SkeletalModelBuilder::new()
            .weight_policy(WeightPolicy::Trust)
            .parse("0 0 0 -1\n", "v 0 1 0\nv 1 0 0\n", "")
            .unwrap();
        assert_eq!(model.mesh().attachments, vec![vec![0.0], vec![0.0]]);

        // Nothing moves the mesh, so skinning collapses it onto the origin
        let mut model = model;
        model.update_mesh();
        assert_eq!(model.mesh().current_vertices, vec![Vec3::ZERO, Vec3::ZERO]);

        // With no non-root joints the weights sum to 0, which Validate refuses
        assert!(matches!(
            SkeletalModelBuilder::new().parse("0 0 0 -1\n", "v 0 1 0\nv 1 0 0\n", ""),
            Err(OsteonError::WeightsDoNotSumToOne { vertex: 0, .. })
        ));
    }

    #[test]
    pub fn test_elbow_rotation_leaves_upper_arm_alone() {
        let mut model = arm();
        model
            .apply_pose(&Pose::new().with_rotation(2, 0.0, 0.0, PI / 4.0))
            .unwrap();

        // Vertices 0 and 1 hang off the shoulder alone, everything above also follows the elbow
        // or wrist, both of which the elbow carries
        let mesh = model.mesh();
        for i in 0..2 {
            assert_eq!(mesh.current_vertices[i], mesh.bind_vertices[i]);
        }
        for i in 2..8 {
            assert!(mesh.current_vertices[i].distance(mesh.bind_vertices[i]) > 1e-3);
        }
    }

    #[test]
    pub fn test_load_from_disk() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../test_assets");
        let model = SkeletalModel::load(
            assets.join("arm.skel"),
            assets.join("arm.obj"),
            assets.join("arm.attach"),
        )
        .unwrap();
        assert_eq!(model.skeleton().len(), 4);

        assert!(matches!(
            SkeletalModel::load(
                assets.join("missing.skel"),
                assets.join("arm.obj"),
                assets.join("arm.attach"),
            ),
            Err(OsteonError::IO(_))
        ));
    }
}
