//! Vision AI console: admin listings and a human label classifier for the
//! Vision AI pipeline.

pub mod client;
pub mod config;
pub mod console;
pub mod guard;
pub mod models;
pub mod nav;
pub mod render;
pub mod session;
pub mod workflow;
