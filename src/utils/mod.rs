//! Utility modules for the page builder.

pub mod scan;
