//! Helper functions for templates and route building

mod html;
mod url;

pub use html::*;
pub use url::*;
