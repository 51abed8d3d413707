//! tdm constructs: the in-memory graph of a statically analyzed codebase.
//!
//! A serialized project snapshot is a flat document whose entries reference
//! each other by 1-based table indices and `name` + ordinal keys, forward
//! and in cycles. This crate reconstructs it as an arena of typed
//! [`Construct`]s and renders any part of it as deterministic stub text.
//!
//! # Architecture
//!
//! - [`id`]: construct ids, kinds, and serialized tables.
//! - [`handle`]: kind-checked handles over ids.
//! - [`construct`]: the construct model and its sub-construct edges.
//! - [`registry`]: the two-state arena used while loading.
//! - `load`: the allocate, initialize, link protocol.
//! - [`project`]: the loaded graph and its queries.
//! - [`journal`]: the cycle-safe stub writer.
//!
//! # Example
//!
//! ```text
//! let project = Project::from_json_str(text)?;
//! for (id, _) in project.packages() {
//!     println!("{}", project.to_stub(id)?);
//! }
//! ```

pub mod construct;
pub mod error;
pub mod handle;
pub mod id;
pub mod journal;
mod load;
pub mod project;
pub mod registry;
mod stack;

#[cfg(test)]
mod test_fixtures;

pub use construct::{Construct, SubConstructs};
pub use error::{ErrorPath, LoadError, LoadErrorKind, PathSegment};
pub use handle::{Handle, Typed};
pub use id::{ConstructId, Kind, Table};
pub use journal::{CyclePolicy, Journal, Mode, StubError, StubOptions};
pub use project::{Project, ProjectStats};
