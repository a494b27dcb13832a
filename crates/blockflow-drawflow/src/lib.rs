//! Drawflow-compatible wire format for Blockflow graphs
//!
//! Export writes one record per block with its payload, position and the
//! connections touching each declared port. Import decodes a document fully,
//! rebuilds the blocks and connections, then turns connection data back into
//! stack and arm links.

mod decode;
mod error;
mod export;
mod import;
mod wire;

pub use decode::{decode_str, decode_value, MAX_WRAPPING};
pub use error::ImportError;
pub use export::{export_document, export_value, DEFAULT_GRAPH_ID};
pub use import::{at_attach_point, import_records, import_records_with, ImportOptions, ImportReport};
pub use wire::*;

pub mod prelude {
    pub use crate::decode::{decode_str, decode_value};
    pub use crate::error::ImportError;
    pub use crate::export::export_value;
    pub use crate::import::{import_records, import_records_with, ImportOptions, ImportReport};
    pub use crate::wire::{Document, NodeRecord};
}
