//! Semantic analysis for routing-table configuration requests.
//!
//! Takes a parsed request (action, target and property tokens) and turns it
//! into a typed, position-annotated [`Directive`] that an execution layer can
//! apply against the live routing table under optimistic concurrency.

pub mod addr;
pub mod analyzer;
pub mod change;
pub mod config;
pub mod directive;
pub mod error;
pub mod position;
pub mod syntax;
pub mod target;

pub use analyzer::{analyze, Analyzer};
pub use change::{Anchored, AttrChange};
pub use directive::Directive;
pub use error::ConfError;
pub use position::{HasPosition, Position};
pub use syntax::RequestSyntax;
pub use target::Target;
