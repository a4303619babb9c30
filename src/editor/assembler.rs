//! Turns a generated appearance into document objects.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5 (Annotations)
//!
//! The assembler resolves the artifact's logical resources, stores the
//! appearance as a Form XObject, builds the annotation dictionary for the
//! kind and appends it to the page.

use super::resource_manager::ResourceManager;
use crate::annotation_types::{pdf_date, BorderStyleType, Metadata};
use crate::config::AnnotatorConfig;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::geometry::Point;
use crate::object::{real_array, Object, ObjectRef};
use crate::style::{Color, Style};
use crate::writer::content_stream::format_number;
use crate::writer::{Annotation, AnnotationArtifact, AnnotationKind, ResourceKey};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;

/// Writes annotations into a document.
pub struct Assembler<'a, D: DocumentModel + ?Sized> {
    doc: &'a mut D,
    resources: &'a mut ResourceManager,
    config: &'a AnnotatorConfig,
}

impl<'a, D: DocumentModel + ?Sized> Assembler<'a, D> {
    /// Create an assembler over a document and its resource registry.
    pub fn new(doc: &'a mut D, resources: &'a mut ResourceManager, config: &'a AnnotatorConfig) -> Self {
        Self { doc, resources, config }
    }

    /// Store the appearance and annotation dictionary, append to `page`.
    pub fn assemble(
        &mut self,
        page: usize,
        annotation: &Annotation,
        artifact: &AnnotationArtifact,
        style: &Style,
        metadata: &Metadata,
    ) -> Result<ObjectRef> {
        let resources = self.resource_dictionary(artifact)?;
        let form = self.form_xobject(artifact, resources)?;
        let appearance = self.doc.add_object(form);

        let dict = Object::Dictionary(self.annotation_dictionary(annotation, artifact, style, metadata, appearance));
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("annotation dictionary {}", dict);
        }
        let reference = self.doc.add_object(dict);
        self.doc.append_annotation(page, reference)?;

        log::debug!(
            "appended {} annotation {} to page {} (appearance {})",
            annotation.kind(),
            reference,
            page,
            appearance
        );
        Ok(reference)
    }

    /// `/Resources` with one sub-dictionary per category.
    ///
    /// Images resolve first: they are the only resources that can fail.
    fn resource_dictionary(&mut self, artifact: &AnnotationArtifact) -> Result<Object> {
        let (images, others): (Vec<_>, Vec<_>) = artifact
            .resources
            .iter()
            .partition(|(_, key)| matches!(key, ResourceKey::Image(_)));

        let mut categories: HashMap<String, HashMap<String, Object>> = HashMap::new();
        for (name, key) in images.into_iter().chain(others) {
            let reference = self.resources.resolve(&mut *self.doc, key)?;
            categories
                .entry(key.category().to_string())
                .or_default()
                .insert(name.clone(), Object::Reference(reference));
        }

        Ok(Object::Dictionary(
            categories
                .into_iter()
                .map(|(category, entries)| (category, Object::Dictionary(entries)))
                .collect(),
        ))
    }

    fn form_xobject(&self, artifact: &AnnotationArtifact, resources: Object) -> Result<Object> {
        let content = artifact.content()?;

        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Form".to_string()));
        dict.insert("BBox".to_string(), real_array(artifact.bbox.to_array()));
        dict.insert("Resources".to_string(), resources);

        let data = if self.config.compress_streams {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&content)?;
            dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            encoder.finish()?
        } else {
            content
        };
        dict.insert("Length".to_string(), Object::Integer(data.len() as i64));

        Ok(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }

    fn annotation_dictionary(
        &self,
        annotation: &Annotation,
        artifact: &AnnotationArtifact,
        style: &Style,
        metadata: &Metadata,
        appearance: ObjectRef,
    ) -> HashMap<String, Object> {
        let kind = annotation.kind();
        let subtype = kind.subtype();

        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("Annot".to_string()));
        dict.insert("Subtype".to_string(), Object::Name(subtype.pdf_name().to_string()));
        dict.insert("Rect".to_string(), real_array(artifact.bbox.to_array()));

        let mut ap = HashMap::new();
        ap.insert("N".to_string(), Object::Reference(appearance));
        dict.insert("AP".to_string(), Object::Dictionary(ap));

        if kind != AnnotationKind::Text {
            dict.insert("C".to_string(), color_array(style.stroke_color()));
            dict.insert("BS".to_string(), border_style(style));
        }
        if subtype.has_interior_color() {
            if let Some(fill) = style.fill() {
                dict.insert("IC".to_string(), color_array(fill));
            }
        }

        match annotation {
            Annotation::Line { start, end } => {
                dict.insert("L".to_string(), real_array([start.x, start.y, end.x, end.y]));
            },
            Annotation::Polygon { points } | Annotation::Polyline { points } => {
                dict.insert("Vertices".to_string(), flatten(points));
            },
            Annotation::Ink { points } => {
                dict.insert("InkList".to_string(), Object::Array(vec![flatten(points)]));
            },
            Annotation::Text { .. } => {
                let color = style.text_color();
                let da = format!(
                    "/F1 {} Tf {} {} {} rg",
                    format_number(style.font_size()),
                    format_number(color.r),
                    format_number(color.g),
                    format_number(color.b)
                );
                dict.insert("DA".to_string(), Object::String(da.into_bytes()));
                dict.insert("Q".to_string(), Object::Integer(style.text_align().quadding()));
                dict.insert("Contents".to_string(), text_string(style.content()));
            },
            _ => {},
        }

        if let Some(name) = &metadata.name {
            dict.insert("NM".to_string(), text_string(name));
        }
        if let Some(author) = &metadata.author {
            dict.insert("T".to_string(), text_string(author));
        }
        if let Some(subject) = &metadata.subject {
            dict.insert("Subj".to_string(), text_string(subject));
        }
        if let Some(contents) = &metadata.contents {
            dict.insert("Contents".to_string(), text_string(contents));
        }
        if let Some(date) = &metadata.creation_date {
            dict.insert("CreationDate".to_string(), Object::String(pdf_date(date).into_bytes()));
        }
        if let Some(date) = &metadata.modified {
            dict.insert("M".to_string(), Object::String(pdf_date(date).into_bytes()));
        }
        let flags = metadata.flags.unwrap_or(self.config.default_flags);
        dict.insert("F".to_string(), Object::Integer(i64::from(flags.bits())));

        dict
    }
}

fn color_array(color: Color) -> Object {
    real_array([color.r, color.g, color.b])
}

fn border_style(style: &Style) -> Object {
    let mut bs = HashMap::new();
    bs.insert("W".to_string(), Object::Real(style.stroke_width()));
    let kind = match style.dash() {
        Some(dash) => {
            bs.insert("D".to_string(), real_array(dash.array.iter().copied()));
            BorderStyleType::Dashed
        },
        None => BorderStyleType::Solid,
    };
    bs.insert("S".to_string(), Object::Name(kind.pdf_name().to_string()));
    Object::Dictionary(bs)
}

fn flatten(points: &[Point]) -> Object {
    real_array(points.iter().flat_map(|p| [p.x, p.y]))
}

/// Text string: ASCII as is, anything else as UTF-16BE with a BOM.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec());
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes)
}
