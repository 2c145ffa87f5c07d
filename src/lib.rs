pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;
pub mod parser;

pub use error::ExtractError;
pub use model::{Comment, Post, Reaction, Stats};
pub use parser::{extract, extract_markup, extract_text};
