//! Located JSON value tree.
//!
//! Reads a JSON document into a tree of tagged values where every node
//! remembers the line and column it started at. Descriptor readers use the
//! positions to point diagnostics at the offending value.

pub mod error;
pub mod reader;
pub mod value;

pub use error::{Result, TreeError};
pub use reader::{read, read_str, MAX_DEPTH};
pub use value::{JsonObject, JsonValue, Position, ValueKind};
