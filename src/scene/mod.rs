// scene/mod.rs
// 场景被动数据：网格与相机
pub mod camera;
pub mod mesh;

pub use camera::Camera;
pub use mesh::{Face, Mesh};
