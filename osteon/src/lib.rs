#![deny(missing_docs)]

//! Osteon deforms triangle meshes with skeletons.
//!
//! A [`SkeletalModel`] holds a tree of joints (the [`components::Skeleton`]) and a
//! [`components::Mesh`] whose vertices are attached to those joints with per-vertex weights. Rotate
//! some joints, update the pose, and every vertex is moved to the weighted blend of where each
//! joint would carry it. This is skeletal subspace deformation, better known as linear blend
//! skinning.
//!
//! ```no_run
//! use osteon::{Pose, SkeletalModel};
//!
//! # fn main() -> osteon::OsteonResult<()> {
//! let mut model = SkeletalModel::load("arm.skel", "arm.obj", "arm.attach")?;
//! model.apply_pose(&Pose::new().with_rotation(2, 0.0, 0.0, 1.2))?;
//! for vertex in &model.mesh().current_vertices {
//!     println!("{vertex}");
//! }
//! # Ok(())
//! # }
//! ```

pub use anyhow;
pub use glam;
pub use osteon_error::OsteonError;
pub use pose::{JointRotation, Pose};
pub use skeletal_model::{SkeletalModel, SkeletalModelBuilder, WeightPolicy};

/// Loaders for the skeleton, mesh and attachment text formats
pub mod asset_importer;
/// Joints, skeletons and meshes
pub mod components;
mod osteon_error;
mod pose;
mod skeletal_model;
/// Systems are the passes that update a skeleton and its mesh
pub mod systems;
/// The transform stack used to walk joint hierarchies
pub mod transform_stack;
/// Kitchen sink utility functions
pub mod util;

/// Osteon result type
pub type OsteonResult<T> = std::result::Result<T, OsteonError>;
