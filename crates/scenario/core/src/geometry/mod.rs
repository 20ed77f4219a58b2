//! Spatial primitives shared by the scenario store and the sync protocol.
mod transform;
mod vector;

pub use transform::LocalTransformData;
pub use vector::Vector3D;
