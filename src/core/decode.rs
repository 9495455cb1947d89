//! Purpose: Decode base64 payload fields into typed binary resources.
//! Exports: `PayloadKind`, `BinaryResource`, `decode_field`.
//! Role: Third pipeline stage; synchronous, deterministic byte decoding.
//! Invariants: Standard base64 alphabet only; no leniency beyond the standard engine.
//! Invariants: Absent or empty input yields no resource, not an error.
use crate::core::error::{Error, ErrorKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PayloadKind {
    /// Raster image, displayed directly.
    Image,
    /// Binary glTF container, handed to a rendering consumer.
    Asset,
}

impl PayloadKind {
    pub fn media_type(self) -> &'static str {
        match self {
            PayloadKind::Image => "image/png",
            PayloadKind::Asset => "model/gltf-binary",
        }
    }

    /// Wire field carrying this payload in the response record.
    pub fn field_name(self) -> &'static str {
        match self {
            PayloadKind::Image => "image",
            PayloadKind::Asset => "object",
        }
    }

    pub fn default_filename(self) -> &'static str {
        match self {
            PayloadKind::Image => "image.png",
            PayloadKind::Asset => "model.glb",
        }
    }
}

/// Decoded bytes plus their declared media type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryResource {
    kind: PayloadKind,
    bytes: Vec<u8>,
}

impl BinaryResource {
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    pub fn media_type(&self) -> &'static str {
        self.kind.media_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Display-ready reference for image consumers (`data:` URI).
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type(), STANDARD.encode(&self.bytes))
    }
}

/// Decode one payload field. `None` and `""` both mean "no payload";
/// malformed base64 is an `Encoding` error tagged with the field name so
/// callers can degrade that field without dropping the record.
pub fn decode_field(
    encoded: Option<&str>,
    kind: PayloadKind,
) -> Result<Option<BinaryResource>, Error> {
    let Some(encoded) = encoded else {
        return Ok(None);
    };
    if encoded.is_empty() {
        return Ok(None);
    }
    let bytes = STANDARD.decode(encoded).map_err(|err| {
        Error::new(ErrorKind::Encoding)
            .with_message("payload is not valid base64")
            .with_field(kind.field_name())
            .with_source(err)
    })?;
    Ok(Some(BinaryResource { kind, bytes }))
}
