//! Appearance stream writing.
//!
//! ## Architecture
//!
//! ```text
//! Annotation + Style
//!     ↓
//! [appearance_stream::generate] (kind-specific drawing)
//!     ↓
//! [ContentStreamBuilder] (ops → content stream bytes)
//!     ↓
//! AnnotationArtifact (bbox, ops, logical resources)
//! ```
//!
//! [`ObjectSerializer`] renders the assembled objects in PDF syntax.

pub mod appearance_stream;
pub mod content_stream;
pub mod graphics_state;
pub mod object_serializer;

pub use appearance_stream::{
    generate, Annotation, AnnotationArtifact, AnnotationKind, CallerFrame, RenderContext, ResourceKey,
};
pub use content_stream::{encode_operations, ContentStreamBuilder, ContentStreamOp};
pub use graphics_state::{AlphaState, ExtGStateBuilder};
pub use object_serializer::ObjectSerializer;
