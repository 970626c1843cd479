pub mod config;
pub mod corpus;
pub mod entity;
pub mod error;
pub mod traits;
pub mod types;

pub use corpus::{Corpus, LoadReport};
pub use entity::extract_tournament;
pub use error::{Error, Result};
