//! arcc-util - Core Utilities and Foundation Types
//!
//! Shared building blocks for the Arc toolchain:
//!
//! - [`span`]: source positions and spans, and the [`Spanned`] trait
//! - [`diagnostic`]: the deduplicating [`Diagnostics`] store, severities
//!   and stable error codes
//! - [`index_vec`]: typed-index vectors used for node and type-variable ids
//! - [`cancel`]: the cooperative [`CancellationToken`]

pub mod cancel;
pub mod diagnostic;
pub mod index_vec;
pub mod span;

pub use cancel::{CancellationToken, Cancelled};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, Diagnostics, ErrorCode, Severity};
pub use index_vec::{Idx, IndexVec};
pub use span::{Position, Span, Spanned};
