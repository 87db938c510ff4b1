//! Request and response bodies

pub mod jobs;
