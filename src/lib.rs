pub mod config;
pub mod data;
pub mod engine;
pub mod net;
pub mod render;
pub mod scene;
pub mod viz;
