#![allow(missing_docs)]
use thiserror::Error;

/// Everything that can go wrong while loading or posing a skeletal model
#[derive(Error, Debug)]
pub enum OsteonError {
    #[error("{source_name}:{line}: unrecognised line header `{header}`")]
    UnrecognisedLineHeader {
        source_name: String,
        line: usize,
        header: String,
    },
    #[error("{source_name}:{line}: expected {expected} fields, found {found}")]
    WrongFieldCount {
        source_name: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{source_name}:{line}: `{value}` is not a valid number")]
    InvalidNumber {
        source_name: String,
        line: usize,
        value: String,
    },
    #[error("{source_name}:{line}: joint {joint} has parent {parent}, which has not been loaded yet")]
    InvalidParent {
        source_name: String,
        line: usize,
        joint: usize,
        parent: i64,
    },
    #[error("The skeleton has no root joint")]
    MissingRoot,
    #[error("The skeleton has more than one root joint (joints {first} and {second})")]
    MultipleRoots { first: usize, second: usize },
    #[error("Face {face} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Expected attachment weights for {expected} vertices, found {found}")]
    AttachmentCountMismatch { expected: usize, found: usize },
    #[error("Vertex {vertex} has {found} weights, expected one per non-root joint ({expected})")]
    WeightCountMismatch {
        vertex: usize,
        expected: usize,
        found: usize,
    },
    #[error("Weights for vertex {vertex} sum to {sum}, not 1")]
    WeightsDoNotSumToOne { vertex: usize, sum: f32 },
    #[error("Joint index {index} is out of range, the skeleton has {joint_count} joints")]
    JointIndexOutOfRange { index: usize, joint_count: usize },
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
