//! Export core utilities shared by CLI and other front-ends.

pub mod pdf_core;
