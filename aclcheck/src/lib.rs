//! Command-line front end for [`acl_policy`].
//!
//! - [`cli`]: clap definitions.
//! - [`cmd`]: one module per subcommand.
//! - [`settings`]: layered configuration (figment).
//! - [`errors`]: user-facing error and diagnostic rendering.

pub mod cli;
pub mod cmd;
pub mod errors;
pub mod settings;
pub mod style;
pub mod tracing_init;
pub mod version;
