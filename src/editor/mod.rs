//! Adding annotations to a document.
//!
//! ## Architecture
//!
//! ```text
//! (kind, Location, Style)
//!     ↓
//! [Annotator] (page lookup, normalization, generation)
//!     ↓
//! [Assembler] (Form XObject + annotation dictionary)
//!     ↓
//! [ResourceManager] (fonts, images, graphics states, once per document)
//!     ↓
//! DocumentModel
//! ```

pub mod annotator;
pub mod assembler;
pub mod resource_manager;

pub use annotator::Annotator;
pub use assembler::Assembler;
pub use resource_manager::ResourceManager;
