//! Terminal output helpers

mod boxed;

pub use boxed::{render_box, BoxHeader, DEFAULT_TITLE, MIN_WIDTH};

/// Check if color output is enabled
pub fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
