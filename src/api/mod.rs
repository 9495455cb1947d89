//! Purpose: Define the stable public Rust API boundary for meshwire.
//! Exports: Pipeline types and operations needed by the CLI and embedders.
//! Role: Public, additive-only surface; hides internal parse boundaries.
//! Invariants: This module is the only public path to pipeline primitives.
//! Invariants: Internal modules remain private and are not directly exposed.

mod client;
mod session;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::decode::{BinaryResource, PayloadKind, decode_field};
pub use crate::core::normalize::normalize;
pub use crate::core::record::{ResponseRecord, parse_normalized, parse_response};
pub use crate::core::resource::{CommitOutcome, CycleToken, HandleStore, ResourceHandle, export};
pub use client::{ApiResult, ExecutionRequest, HttpTransport, Transport};
pub use session::{Exchange, Session};
