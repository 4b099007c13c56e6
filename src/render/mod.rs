pub mod camera;
pub mod tiles;
