mod joint;
mod mesh;
mod skeleton;

pub use joint::Joint;
pub use mesh::{Face, Mesh};
pub use skeleton::Skeleton;
