//! Settings submissions: add, delete and edit sidebars.

mod model;
mod pipeline;

pub use model::Submission;
pub use pipeline::apply_submission;
