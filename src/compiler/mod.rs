//! Routine compiler module
//!
//! Drives the statements of an ACS routine and unfolds its nesting into a
//! flat [`DecisionTable`].

mod engine;
mod rule;
mod scope;
mod statement;


pub use engine::*;
pub use rule::*;
pub use scope::*;
pub use statement::*;
