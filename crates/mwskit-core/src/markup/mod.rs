//! Markup codec: parsing into [`StructuredValue`](crate::value::StructuredValue),
//! encoding back into a document, and the raw-text rewrite some product
//! responses need before they can be parsed.

pub mod decode;
pub mod encode;
pub mod rewrite;

pub use decode::{parse, XmlDocument};
pub use encode::encode_document;
pub use rewrite::normalize_item_attributes;
