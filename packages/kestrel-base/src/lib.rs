pub mod binary;
pub mod color;
pub mod error;
pub mod field;
pub mod visit;
pub mod visitor;

pub use color::Color;
pub use error::VisitError;
pub use field::{Field, FieldTag, FieldType, FieldValue};
pub use visit::{Visit, visit_as_u32};
pub use visitor::{VisitMode, Visitor, VisitorNode, VisitorNodeId};
