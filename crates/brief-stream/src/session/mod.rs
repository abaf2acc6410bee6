//! Generation session orchestration.
//!
//! A [`SessionController`] owns the live [`SessionState`](crate::SessionState)
//! and drives one submission at a time through the ingestion pipeline,
//! publishing each committed update through a watch channel.

mod controller;
mod options;


pub use controller::SessionController;
pub use options::PipelineOptions;
