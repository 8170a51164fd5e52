//! Row level access to the social tables.
//!
//! Mutating helpers take a connection so callers run them inside the
//! transaction of the workflow step that owns them.

pub mod participation;
pub mod player;
pub mod social;
pub mod waitlist;
