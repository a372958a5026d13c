//! A compressed prefix tree for HTTP routing.
//!
//! Patterns are split on arbitrary bytes, not only on `/`, so shared
//! prefixes are stored once. Three kinds of pieces are understood:
//!
//! - literal bytes, matched exactly;
//! - `:name`, capturing one path segment (up to the next `/`);
//! - `*name`, a trailing catch-all capturing the rest of the path including
//!   the `/` in front of it.
//!
//! Registration rejects duplicate patterns and conflicting wildcards up
//! front. Lookups never allocate besides writing bindings into a reusable
//! [`Params`] buffer. Static branches are probed before wildcards.
//!
//! [`Router`] keeps one tree per HTTP method.

mod config;
mod error;
mod node;
mod params;
mod pattern;
mod router;
mod tree;

pub use config::Config;
pub use error::{InsertError, UnknownMethod};
pub use params::{Param, Params};
pub use router::{Group, Method, Router};
pub use tree::{Lookup, Match, PathTree};
