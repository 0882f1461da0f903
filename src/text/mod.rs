//! Text preparation for speech

pub mod preprocess;
pub mod sentences;

pub use preprocess::{clean_text, preprocess_text};
pub use sentences::tokenize_sentences;
