//! Descriptor layer: serde schema and parser for deployment documents.

pub mod parser;
pub mod schema;

pub use parser::{parse_descriptors, DescriptorFormat};
pub use schema::{DeploymentSchema, ResourceSchema};
