//! f32 vectors, quaternions and column-major 4x4 matrices for camera and model transforms.

mod mat4;
mod vec3;
mod vec4;

pub use mat4::{Mat4, SINGULAR_PIVOT_EPSILON};
pub use vec3::Vec3;
pub use vec4::{Quat, Vec4};
