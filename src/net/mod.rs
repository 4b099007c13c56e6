pub mod fetch;
pub mod image;
pub mod token;
