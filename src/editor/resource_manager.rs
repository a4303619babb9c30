//! Resource management for annotation appearance streams.
//!
//! Maps logical resources (fonts, images, graphics states) to indirect
//! objects in the document. Each logical resource is registered at most
//! once per document; later lookups reuse the stored reference.

use crate::document::DocumentModel;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::writer::ResourceKey;
use std::collections::HashMap;

/// Registry of resource objects already added to a document.
#[derive(Debug, Clone, Default)]
pub struct ResourceManager {
    /// Logical resource → object reference
    registered: HashMap<ResourceKey, ObjectRef>,
}

impl ResourceManager {
    /// Create an empty resource manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference for `key`, creating the object on first use.
    pub fn resolve<D: DocumentModel + ?Sized>(&mut self, doc: &mut D, key: &ResourceKey) -> Result<ObjectRef> {
        if let Some(existing) = self.registered.get(key) {
            return Ok(*existing);
        }

        let reference = match key {
            ResourceKey::Font(name) => doc.add_object(standard_font(name)),
            ResourceKey::GraphicsState(alpha) => doc.add_object(alpha.to_object()),
            ResourceKey::Image(id) => doc.image_xobject(id)?,
        };
        log::debug!("registered {:?} as {}", key, reference);

        self.registered.insert(key.clone(), reference);
        Ok(reference)
    }

    /// Reference of an already registered resource.
    pub fn get(&self, key: &ResourceKey) -> Option<ObjectRef> {
        self.registered.get(key).copied()
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

/// Type1 font dictionary for a standard text font.
fn standard_font(base_font: &str) -> Object {
    let mut dict = HashMap::new();
    dict.insert("Type".to_string(), Object::Name("Font".to_string()));
    dict.insert("Subtype".to_string(), Object::Name("Type1".to_string()));
    dict.insert("BaseFont".to_string(), Object::Name(base_font.to_string()));
    dict.insert("Encoding".to_string(), Object::Name("WinAnsiEncoding".to_string()));
    Object::Dictionary(dict)
}
