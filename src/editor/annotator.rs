//! Caller-facing entry point for adding annotations.

use super::assembler::Assembler;
use super::resource_manager::ResourceManager;
use crate::annotation_types::Metadata;
use crate::config::AnnotatorConfig;
use crate::document::DocumentModel;
use crate::error::{Error, Result};
use crate::geometry::{Location, PageTransform};
use crate::object::ObjectRef;
use crate::style::Style;
use crate::writer::{generate, Annotation, AnnotationKind, RenderContext};
use std::collections::HashMap;

/// Adds annotations to the pages of a document.
///
/// Owns the document model and the registry of resources already stored
/// in it, so repeated fonts, images and opacity states are shared.
///
/// # Example
///
/// ```
/// use pdf_annotate::{Annotator, Location, MemoryDocument, PageGeometry, Style};
///
/// let mut doc = MemoryDocument::new();
/// doc.add_page(PageGeometry::new(612.0, 792.0, 90));
///
/// let mut annotator = Annotator::new(doc);
/// annotator
///     .add_annotation("square", &Location::rect(0, 10.0, 20.0, 50.0, 60.0), &Style::default())
///     .unwrap();
/// assert_eq!(annotator.document().annotations(0).len(), 1);
/// ```
#[derive(Debug)]
pub struct Annotator<D: DocumentModel> {
    doc: D,
    config: AnnotatorConfig,
    resources: ResourceManager,
    caller_dimensions: HashMap<usize, (f64, f64)>,
}

impl<D: DocumentModel> Annotator<D> {
    /// Annotator with the default configuration.
    pub fn new(doc: D) -> Self {
        Self::from_parts(doc, AnnotatorConfig::default())
    }

    /// Annotator with a custom configuration.
    ///
    /// Fails with [`Error::InvalidConfig`] for a non-positive line spacing or
    /// a circle kappa outside `(0, 1]`.
    pub fn with_config(doc: D, config: AnnotatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(doc, config))
    }

    fn from_parts(doc: D, config: AnnotatorConfig) -> Self {
        Self {
            doc,
            config,
            resources: ResourceManager::new(),
            caller_dimensions: HashMap::new(),
        }
    }

    /// Declare the caller's own size for a page.
    ///
    /// Later locations on that page are scaled from `width x height` to
    /// the displayed page before rotation.
    pub fn set_page_dimensions(&mut self, page: usize, width: f64, height: f64) -> Result<()> {
        let geometry = self.doc.page_geometry(page)?;
        PageTransform::with_caller_dimensions(&geometry, width, height)?;
        self.caller_dimensions.insert(page, (width, height));
        Ok(())
    }

    /// Add an annotation of the named kind with fresh metadata.
    pub fn add_annotation(&mut self, kind: &str, location: &Location, style: &Style) -> Result<()> {
        let kind: AnnotationKind = kind.parse()?;
        self.add_annotation_with_metadata(kind, location, style, &Metadata::new())?;
        Ok(())
    }

    /// Add an annotation and return its dictionary reference.
    ///
    /// The document is untouched when geometry, style or resources are
    /// rejected.
    pub fn add_annotation_with_metadata(
        &mut self,
        kind: AnnotationKind,
        location: &Location,
        style: &Style,
        metadata: &Metadata,
    ) -> Result<ObjectRef> {
        let page = location.page();
        if page >= self.doc.page_count() {
            return Err(Error::InvalidGeometry(format!(
                "page index {} out of range (document has {} pages)",
                page,
                self.doc.page_count()
            )));
        }

        let geometry = self.doc.page_geometry(page)?;
        let transform = match self.caller_dimensions.get(&page) {
            Some(&(width, height)) => PageTransform::with_caller_dimensions(&geometry, width, height)?,
            None => PageTransform::new(&geometry)?,
        };
        let normalized = transform.normalize(location)?;
        let annotation = Annotation::from_geometry(kind, &normalized, style)?;

        let ctx = RenderContext::new(self.doc.font_metrics(), &self.doc, &self.config);
        let artifact = generate(&annotation, style, &ctx)?;

        Assembler::new(&mut self.doc, &mut self.resources, &self.config).assemble(
            page,
            &annotation,
            &artifact,
            style,
            metadata,
        )
    }

    /// The document being annotated.
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable access to the document.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Give the document back.
    pub fn into_document(self) -> D {
        self.doc
    }

    /// Active configuration.
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }
}
