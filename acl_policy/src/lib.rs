//! # ACL Policy
//!
//! Decoder for block-structured ACL policy files:
//!
//! ```text
//! policy {
//!   acl = "read"
//!   node "web" { policy = "write" }
//!   service_prefix "api-" { policy = "read" }
//! }
//! ```
//!
//! The pipeline is file → [`syntax`] tree → [`decode`] against the
//! [`schema`] catalog → [`PolicyDocument`]. Problems are returned as
//! positioned [`Diagnostic`]s rather than aborting, so a document may come
//! back alongside diagnostics when only parts of the file were skipped.
//!
//! ```
//! let parsed = acl_policy::parse_str(
//!     "acl.hcl",
//!     r#"policy {
//!   acl = "read"
//!   nod "web" { policy = "write" }
//! }"#,
//! );
//! assert_eq!(parsed.document.unwrap().default_acl, "read");
//! assert_eq!(
//!     parsed.diagnostics.to_string(),
//!     "acl.hcl:3,3-6: Unsupported block type; Blocks of type \"nod\" are not expected here. Did you mean \"node\"?"
//! );
//! ```

pub mod decode;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod format;
pub mod schema;
pub mod syntax;

pub use decode::{Parsed, parse, parse_str};
pub use diagnostic::{Diagnostic, Diagnostics, Pos, Range, Severity};
pub use document::{NodeRule, PolicyDocument, ServiceRule};
pub use error::PolicyError;
pub use schema::RuleKind;
