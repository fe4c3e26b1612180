//! Endpoint handlers

pub mod datasets;
pub mod plants;
pub mod root;
pub mod status;
