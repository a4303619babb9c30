//! Boundary to the PDF document that receives annotations.
//!
//! Reading and writing the container file belongs to the caller. The
//! engine only needs the handful of capabilities in [`DocumentModel`]:
//! page geometry, object allocation, image lookup and appending to a
//! page's `/Annots` array. [`MemoryDocument`] implements them in memory.

use crate::error::{Error, Result};
use crate::fonts::{FontMetrics, StandardFontMetrics};
use crate::geometry::PageGeometry;
use crate::object::{Object, ObjectRef};
use std::collections::HashMap;

/// Lookup of raster images referenced by annotation styles.
pub trait ImageSource {
    /// Pixel dimensions of the image `id`, or `None` if it is unknown.
    fn image_dimensions(&self, id: &str) -> Option<(u32, u32)>;
}

/// Capabilities the annotation engine needs from a PDF document.
pub trait DocumentModel: ImageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Intrinsic size and `/Rotate` of a page.
    fn page_geometry(&self, page: usize) -> Result<PageGeometry>;

    /// Metrics used to lay out text.
    fn font_metrics(&self) -> &dyn FontMetrics {
        &StandardFontMetrics
    }

    /// Store an object as a new indirect object.
    fn add_object(&mut self, object: Object) -> ObjectRef;

    /// Image XObject for the image `id`, created on first use.
    fn image_xobject(&mut self, id: &str) -> Result<ObjectRef>;

    /// Append an annotation to the page's `/Annots`.
    fn append_annotation(&mut self, page: usize, annotation: ObjectRef) -> Result<()>;
}

/// A registered raster image.
#[derive(Debug, Clone)]
struct MemoryImage {
    width: u32,
    height: u32,
    data: bytes::Bytes,
    xobject: Option<ObjectRef>,
}

/// In-memory [`DocumentModel`].
///
/// Objects are numbered from 1 in insertion order. Images are stored as
/// raw 8-bit RGB samples.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<PageGeometry>,
    annotations: Vec<Vec<ObjectRef>>,
    objects: Vec<Object>,
    images: HashMap<String, MemoryImage>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page and return its index.
    pub fn add_page(&mut self, geometry: PageGeometry) -> usize {
        self.pages.push(geometry);
        self.annotations.push(Vec::new());
        self.pages.len() - 1
    }

    /// Register an RGB image under `id`.
    pub fn add_image(&mut self, id: impl Into<String>, width: u32, height: u32, rgb: impl Into<bytes::Bytes>) {
        self.images.insert(
            id.into(),
            MemoryImage {
                width,
                height,
                data: rgb.into(),
                xobject: None,
            },
        );
    }

    /// Look up an object by reference.
    pub fn object(&self, reference: ObjectRef) -> Option<&Object> {
        let index = (reference.id as usize).checked_sub(1)?;
        self.objects.get(index)
    }

    /// Follow a reference stored in an object, if it is one.
    pub fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(r) => self.object(*r),
            other => Some(other),
        }
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Annotations appended to a page.
    pub fn annotations(&self, page: usize) -> &[ObjectRef] {
        self.annotations.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page < self.pages.len() {
            Ok(())
        } else {
            Err(Error::InvalidGeometry(format!(
                "page index {} out of range (document has {} pages)",
                page,
                self.pages.len()
            )))
        }
    }
}

impl ImageSource for MemoryDocument {
    fn image_dimensions(&self, id: &str) -> Option<(u32, u32)> {
        self.images.get(id).map(|img| (img.width, img.height))
    }
}

impl DocumentModel for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_geometry(&self, page: usize) -> Result<PageGeometry> {
        self.check_page(page)?;
        Ok(self.pages[page])
    }

    fn add_object(&mut self, object: Object) -> ObjectRef {
        self.objects.push(object);
        ObjectRef::new(self.objects.len() as u32, 0)
    }

    fn image_xobject(&mut self, id: &str) -> Result<ObjectRef> {
        let image = self
            .images
            .get(id)
            .ok_or_else(|| Error::ResourceError(format!("unknown image '{}'", id)))?;
        if let Some(existing) = image.xobject {
            return Ok(existing);
        }

        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(i64::from(image.width)));
        dict.insert("Height".to_string(), Object::Integer(i64::from(image.height)));
        dict.insert("ColorSpace".to_string(), Object::Name("DeviceRGB".to_string()));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
        dict.insert("Length".to_string(), Object::Integer(image.data.len() as i64));
        let stream = Object::Stream {
            dict,
            data: image.data.clone(),
        };

        let reference = self.add_object(stream);
        if let Some(image) = self.images.get_mut(id) {
            image.xobject = Some(reference);
        }
        Ok(reference)
    }

    fn append_annotation(&mut self, page: usize, annotation: ObjectRef) -> Result<()> {
        self.check_page(page)?;
        self.annotations[page].push(annotation);
        Ok(())
    }
}
