// Core modules implementing normalization, record validation, payload
// decoding, resource lifecycle, and error modeling.
pub mod decode;
pub mod error;
pub mod normalize;
pub mod record;
pub mod resource;
