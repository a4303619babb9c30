// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]

//! # PDF Annotate
//!
//! Add shape, ink, image and text annotations to PDF pages, with appearance
//! streams that render correctly on rotated pages.
//!
//! ## Core Features
//!
//! - **Kinds**: square, circle, polygon, polyline, line, ink, image, text
//! - **Rotation-aware geometry**: caller coordinates follow the displayed
//!   page; annotations are stored in the page's intrinsic space
//!   (ISO 32000-1:2008, Section 7.7.3.3, `/Rotate`)
//! - **Appearance streams**: every annotation gets a Form XObject
//!   (Section 12.5.5) so viewers draw it identically
//! - **Text layout**: word wrapping, alignment and baselines from standard
//!   font metrics
//! - **Resource sharing**: fonts, images and opacity states are stored once
//!   per document
//!
//! ## Architecture
//!
//! ```text
//! (kind, Location, Style)
//!     ↓
//! [geometry] caller space → intrinsic space
//!     ↓
//! [writer::appearance_stream] drawing operators + logical resources
//!     ↓
//! [editor] Form XObject + annotation dictionary
//!     ↓
//! [document::DocumentModel]
//! ```
//!
//! The crate does not read or write PDF files. A [`DocumentModel`]
//! implementation adapts whatever document library the caller uses;
//! [`MemoryDocument`] keeps everything in memory.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_annotate::{Annotator, Color, Location, MemoryDocument, PageGeometry, Style, StyleOverrides};
//!
//! # fn main() -> pdf_annotate::Result<()> {
//! let mut doc = MemoryDocument::new();
//! let page = doc.add_page(PageGeometry::new(612.0, 792.0, 90));
//!
//! let style = Style::from_overrides(
//!     StyleOverrides::new()
//!         .with_stroke_color(Color::rgb(1.0, 0.0, 0.0))
//!         .with_fill(Color::rgba(0.0, 0.0, 1.0, 0.5))
//!         .with_stroke_width(2.0),
//! )?;
//!
//! let mut annotator = Annotator::new(doc);
//! annotator.add_annotation("square", &Location::rect(page, 10.0, 20.0, 50.0, 60.0), &style)?;
//! annotator.add_annotation(
//!     "ink",
//!     &Location::points(page, [(60.0, 20.0), (80.0, 40.0), (100.0, 20.0)]),
//!     &style,
//! )?;
//!
//! let doc = annotator.into_document();
//! assert_eq!(doc.annotations(page).len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// PDF objects and the document boundary
pub mod document;
pub mod object;

// Geometry and styling
pub mod geometry;
pub mod style;

// Fonts and text layout
pub mod fonts;
pub mod text;

// Appearance streams
pub mod writer;

// Annotation assembly
pub mod annotation_types;
pub mod editor;

// Configuration
pub mod config;

pub use annotation_types::{AnnotationFlags, Metadata};
pub use config::AnnotatorConfig;
pub use document::{DocumentModel, ImageSource, MemoryDocument};
pub use editor::Annotator;
pub use error::{Error, Result};
pub use geometry::{Location, PageGeometry, Point, Rect};
pub use style::{Color, Style, StyleOverrides, TextAlign, TextBaseline};
pub use writer::AnnotationKind;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
