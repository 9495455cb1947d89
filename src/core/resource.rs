//! Purpose: Own the lifecycle of published binary resources and their handles.
//! Exports: `HandleStore`, `ResourceHandle`, `CycleToken`, `CommitOutcome`, `export`.
//! Role: Final pipeline stage; sole creator and revoker of resource handles.
//! Invariants: At most one live handle per slot (image, asset) at any time.
//! Invariants: Revoke is idempotent; unknown handles are a no-op.
//! Invariants: A stale cycle can never revoke or replace handles committed by a newer cycle.
use crate::core::decode::{BinaryResource, PayloadKind};
use crate::core::error::{Error, ErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Transient, revocable reference to a published resource. Consumers
/// address resources through the handle; only the store revokes it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ResourceHandle {
    id: u64,
    slot: PayloadKind,
}

impl ResourceHandle {
    pub fn slot(&self) -> PayloadKind {
        self.slot
    }

    /// Stable address usable by display/rendering consumers.
    pub fn address(&self) -> String {
        format!("meshwire://{}/{}", self.slot.field_name(), self.id)
    }
}

/// Token tying decode/publish work to the request cycle that started it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CycleToken(u64);

#[derive(Debug, Eq, PartialEq)]
pub enum CommitOutcome {
    /// Handles from the prior cycle were revoked and these took their place.
    Applied {
        image: Option<ResourceHandle>,
        asset: Option<ResourceHandle>,
    },
    /// A newer cycle already committed; nothing was published or revoked.
    Stale,
}

#[derive(Debug, Default)]
pub struct HandleStore {
    next_id: u64,
    next_cycle: u64,
    committed_cycle: u64,
    live: HashMap<u64, BinaryResource>,
    slots: HashMap<PayloadKind, u64>,
}

impl HandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource and return its handle, revoking whatever handle
    /// previously occupied the same slot.
    pub fn publish(&mut self, resource: BinaryResource) -> ResourceHandle {
        let slot = resource.kind();
        if let Some(previous) = self.slots.remove(&slot) {
            self.live.remove(&previous);
        }
        self.next_id += 1;
        let handle = ResourceHandle {
            id: self.next_id,
            slot,
        };
        self.live.insert(handle.id, resource);
        self.slots.insert(slot, handle.id);
        handle
    }

    pub fn revoke(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle.id).is_some() {
            if self.slots.get(&handle.slot) == Some(&handle.id) {
                self.slots.remove(&handle.slot);
            }
            tracing::debug!(address = %handle.address(), "revoked resource handle");
        }
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle.id)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&BinaryResource> {
        self.live.get(&handle.id)
    }

    pub fn live_handle(&self, slot: PayloadKind) -> Option<ResourceHandle> {
        self.slots.get(&slot).map(|id| ResourceHandle { id: *id, slot })
    }

    /// Start a request cycle. Tokens are strictly increasing; commit order
    /// decides which cycle's resources stay live.
    pub fn begin_cycle(&mut self) -> CycleToken {
        self.next_cycle += 1;
        CycleToken(self.next_cycle)
    }

    /// A cycle is current until a later-started cycle commits. Callers use
    /// this to skip decode work for responses that arrived too late.
    pub fn is_current(&self, token: CycleToken) -> bool {
        token.0 > self.committed_cycle
    }

    /// Apply one completed cycle: revoke every handle from earlier cycles,
    /// then publish the new resources. Stale tokens commit nothing.
    pub fn commit(
        &mut self,
        token: CycleToken,
        image: Option<BinaryResource>,
        asset: Option<BinaryResource>,
    ) -> CommitOutcome {
        if !self.is_current(token) {
            tracing::debug!(cycle = token.0, "skipping commit from stale cycle");
            return CommitOutcome::Stale;
        }
        self.committed_cycle = token.0;
        for slot in [PayloadKind::Image, PayloadKind::Asset] {
            if let Some(previous) = self.live_handle(slot) {
                self.revoke(previous);
            }
        }
        CommitOutcome::Applied {
            image: image.map(|resource| self.publish(resource)),
            asset: asset.map(|resource| self.publish(resource)),
        }
    }
}

/// One-shot export of a resource's raw bytes. Does not require (and does
/// not leave behind) a published handle.
pub fn export(resource: &BinaryResource, path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let path = path.as_ref();
    std::fs::write(path, resource.bytes()).map_err(|err| {
        Error::new(map_io_error_kind(&err))
            .with_message("failed to write exported resource")
            .with_path(path)
            .with_source(err)
    })?;
    Ok(path.to_path_buf())
}

fn map_io_error_kind(err: &std::io::Error) -> ErrorKind {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => ErrorKind::Usage,
        _ => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::{CommitOutcome, HandleStore, export};
    use crate::core::decode::{PayloadKind, decode_field};

    fn asset_resource(encoded: &str) -> crate::core::decode::BinaryResource {
        decode_field(Some(encoded), PayloadKind::Asset)
            .expect("ok")
            .expect("resource")
    }

    #[test]
    fn publish_replaces_prior_slot_handle() {
        let mut store = HandleStore::new();
        let first = store.publish(asset_resource("aGVsbG8="));
        let second = store.publish(asset_resource("d29ybGQ="));
        assert!(!store.is_live(first));
        assert!(store.is_live(second));
        assert_eq!(store.live_handle(PayloadKind::Asset), Some(second));
    }

    #[test]
    fn revoke_is_idempotent() {
        let mut store = HandleStore::new();
        let handle = store.publish(asset_resource("aGVsbG8="));
        store.revoke(handle);
        store.revoke(handle);
        assert!(!store.is_live(handle));
        assert!(store.get(handle).is_none());
    }

    #[test]
    fn stale_cycle_cannot_displace_newer_commit() {
        let mut store = HandleStore::new();
        let older = store.begin_cycle();
        let newer = store.begin_cycle();

        let outcome = store.commit(newer, None, Some(asset_resource("d29ybGQ=")));
        let CommitOutcome::Applied { asset: Some(kept), .. } = outcome else {
            panic!("newer cycle should apply");
        };

        assert!(!store.is_current(older));
        assert_eq!(
            store.commit(older, None, Some(asset_resource("aGVsbG8="))),
            CommitOutcome::Stale
        );
        assert!(store.is_live(kept));
        assert_eq!(store.live_handle(PayloadKind::Asset), Some(kept));
    }

    #[test]
    fn export_writes_raw_bytes_without_publishing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.glb");
        let resource = asset_resource("Z2xURg==");

        let written = export(&resource, &path).expect("export");
        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).expect("read"), b"glTF");

        let store = HandleStore::new();
        assert_eq!(store.live_handle(PayloadKind::Asset), None);
    }
}
