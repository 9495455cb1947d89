//! Purpose: Drive full request cycles and own session continuity state.
//! Exports: `Session`, `Exchange`.
//! Role: Orchestrates transport -> normalize -> parse -> decode -> publish.
//! Invariants: `send` takes `&mut self`, so at most one cycle runs at a time.
//! Invariants: Handle replacement goes through the store's cycle tokens only.
//! Invariants: A decode failure degrades that field; the record stays usable.
#![allow(clippy::result_large_err)]
use crate::core::decode::{BinaryResource, PayloadKind, decode_field};
use crate::core::error::Error;
use crate::core::record::{ResponseRecord, parse_response};
use crate::core::resource::{CommitOutcome, HandleStore, ResourceHandle, export};
use std::path::{Path, PathBuf};

use super::client::{ApiResult, ExecutionRequest, Transport};

/// Outcome of one completed request cycle. `warnings` carries per-field
/// decode errors that were degraded instead of failing the response.
#[derive(Debug)]
pub struct Exchange {
    pub record: ResponseRecord,
    pub image: Option<ResourceHandle>,
    pub asset: Option<ResourceHandle>,
    pub warnings: Vec<Error>,
}

pub struct Session {
    transport: Box<dyn Transport>,
    session_id: String,
    store: HandleStore,
}

impl Session {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session_id: String::new(),
            store: HandleStore::new(),
        }
    }

    /// Resume an existing conversation instead of starting fresh.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Identifier threaded back to the service on each request. Empty until
    /// the first successful response assigns one.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn resource(&self, handle: ResourceHandle) -> Option<&BinaryResource> {
        self.store.get(handle)
    }

    pub fn live_handle(&self, slot: PayloadKind) -> Option<ResourceHandle> {
        self.store.live_handle(slot)
    }

    /// Run one full cycle. Transport and parse failures abort the cycle;
    /// payload decode failures degrade to "resource absent" and surface in
    /// `Exchange::warnings`.
    pub fn send(&mut self, prompt: &str) -> ApiResult<Exchange> {
        let token = self.store.begin_cycle();
        let request = ExecutionRequest {
            prompt,
            attachments: &[],
            session_id: &self.session_id,
        };
        let raw = self.transport.execute(&request)?;
        let record = parse_response(&raw)?;

        if !record.session_id.is_empty() {
            self.session_id = record.session_id.clone();
        }

        let mut warnings = Vec::new();
        let mut decode_degraded = |encoded: Option<&str>, kind| match decode_field(encoded, kind) {
            Ok(resource) => resource,
            Err(err) => {
                tracing::debug!(field = kind.field_name(), "payload decode degraded");
                warnings.push(err);
                None
            }
        };
        let image = decode_degraded(record.image.as_deref(), PayloadKind::Image);
        let asset = decode_degraded(record.object.as_deref(), PayloadKind::Asset);

        let (image, asset) = match self.store.commit(token, image, asset) {
            CommitOutcome::Applied { image, asset } => (image, asset),
            // A newer cycle already committed; keep its handles untouched.
            CommitOutcome::Stale => (None, None),
        };

        Ok(Exchange {
            record,
            image,
            asset,
            warnings,
        })
    }

    /// One-shot save of the current asset payload (`model.glb` by default).
    pub fn export_asset(&self, path: impl AsRef<Path>) -> ApiResult<PathBuf> {
        let handle = self.live_handle(PayloadKind::Asset).ok_or_else(|| {
            Error::new(crate::core::error::ErrorKind::Usage)
                .with_message("no asset payload available to export")
                .with_hint("Send a prompt that produces a 3D object first.")
        })?;
        let resource = self.store.get(handle).ok_or_else(|| {
            Error::new(crate::core::error::ErrorKind::Internal)
                .with_message("live asset handle has no backing resource")
        })?;
        export(resource, path)
    }
}
