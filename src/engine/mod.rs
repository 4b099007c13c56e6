pub mod pipeline;

pub use pipeline::{load_people, DataSource, LoadError};
