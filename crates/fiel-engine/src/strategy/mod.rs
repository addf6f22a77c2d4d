//! Interaction strategies built on the resolver and frame traverser.

pub mod click;
pub mod upload;

pub use click::{ChainClick, TextCandidate, click_by_text, click_with_fallback};
pub use upload::FileUpload;
