//! The question-answering pipeline.
//!
//! A [`Planner`] asks a tool-calling model whether the query needs a site
//! search, a [`Synthesizer`] answers with the results as context, and the
//! [`Assistant`] runs the two in order.

pub mod assistant;
pub mod planner;
pub mod synthesizer;

pub use assistant::Assistant;
pub use planner::{Planner, PlannerOutcome};
pub use synthesizer::Synthesizer;
