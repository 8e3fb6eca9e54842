//! What the user sees: the rendered confirmation page and terminal output.

pub mod console;
pub mod view;
