//! Target framework monikers.
//!
//! Parses short framework tokens such as `net45`, `net40-client`,
//! `netstandard1.3` or `portable-net45+win8` into a [`Framework`], and
//! renders the names build tooling needs:
//! - **Short folder name**: two-digit form used for output folders
//! - **Full name**: `.NETFramework,Version=v4.5,Profile=Client`
//!
//! Unknown or malformed tokens parse to an *unsupported* framework rather
//! than failing, so callers decide how loudly to complain.

pub mod error;
pub mod framework;
pub mod identifier;

pub use error::{FrameworkError, Result};
pub use framework::{Framework, FrameworkVersion};
pub use identifier::{known_identifiers, Identifier};
