//! CLI command implementations.

pub mod framework;
pub mod inspect;
pub mod options;
pub mod props;
