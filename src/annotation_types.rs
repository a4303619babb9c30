//! Annotation dictionary vocabulary per ISO 32000-1:2008, Section 12.5.
//!
//! Subtypes, flags, border styles and the optional metadata written
//! alongside every annotation.

use bitflags::bitflags;
use chrono::{DateTime, Utc};

/// Annotation subtype written to `/Subtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationSubtype {
    /// Square annotation - Section 12.5.6.8
    Square,
    /// Circle annotation - Section 12.5.6.8
    Circle,
    /// Polygon annotation - Section 12.5.6.9
    Polygon,
    /// Polyline annotation - Section 12.5.6.9
    PolyLine,
    /// Line annotation - Section 12.5.6.7
    Line,
    /// Ink annotation - Section 12.5.6.13
    Ink,
    /// Rubber stamp annotation - Section 12.5.6.12
    Stamp,
    /// Free text annotation - Section 12.5.6.6
    FreeText,
}

impl AnnotationSubtype {
    /// PDF name for this subtype.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
            Self::PolyLine => "PolyLine",
            Self::Line => "Line",
            Self::Ink => "Ink",
            Self::Stamp => "Stamp",
            Self::FreeText => "FreeText",
        }
    }

    /// Whether `/IC` (interior color) applies.
    pub fn has_interior_color(&self) -> bool {
        matches!(self, Self::Square | Self::Circle | Self::Polygon)
    }
}

bitflags! {
    /// Annotation flags per PDF spec Table 165.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
    #[serde(from = "u32")]
    pub struct AnnotationFlags: u32 {
        /// Bit 1: do not display if no handler is available
        const INVISIBLE = 1 << 0;
        /// Bit 2: do not display or print
        const HIDDEN = 1 << 1;
        /// Bit 3: print when the page is printed
        const PRINT = 1 << 2;
        /// Bit 4: do not scale with page zoom
        const NO_ZOOM = 1 << 3;
        /// Bit 5: do not rotate with the page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: do not display on screen
        const NO_VIEW = 1 << 5;
        /// Bit 7: do not allow interaction
        const READ_ONLY = 1 << 6;
        /// Bit 8: do not allow deletion or property changes
        const LOCKED = 1 << 7;
        /// Bit 9: invert NoView on certain events
        const TOGGLE_NO_VIEW = 1 << 8;
        /// Bit 10: do not allow contents changes
        const LOCKED_CONTENTS = 1 << 9;
    }
}

impl From<u32> for AnnotationFlags {
    fn from(bits: u32) -> Self {
        AnnotationFlags::from_bits_truncate(bits)
    }
}

impl Default for AnnotationFlags {
    fn default() -> Self {
        AnnotationFlags::PRINT
    }
}

/// Border style type per PDF spec Table 166.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyleType {
    /// Solid border (S)
    #[default]
    Solid,
    /// Dashed border (D)
    Dashed,
}

impl BorderStyleType {
    /// Get PDF name for this border style.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Solid => "S",
            Self::Dashed => "D",
        }
    }
}

/// Optional bookkeeping entries of an annotation dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Unique name (`/NM`)
    pub name: Option<String>,
    /// Author (`/T`)
    pub author: Option<String>,
    /// Subject (`/Subj`)
    pub subject: Option<String>,
    /// Contents (`/Contents`), overrides the text of text annotations
    pub contents: Option<String>,
    /// Creation date (`/CreationDate`)
    pub creation_date: Option<DateTime<Utc>>,
    /// Modification date (`/M`)
    pub modified: Option<DateTime<Utc>>,
    /// Flags (`/F`); `None` uses the configured default
    pub flags: Option<AnnotationFlags>,
}

impl Metadata {
    /// Metadata with a fresh UUID name and the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            name: Some(uuid::Uuid::new_v4().to_string()),
            creation_date: Some(now),
            modified: Some(now),
            ..Self::default()
        }
    }

    /// Metadata with every entry unset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the unique name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Set both creation and modification date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self.modified = Some(date);
        self
    }

    /// Set the flags.
    pub fn with_flags(mut self, flags: AnnotationFlags) -> Self {
        self.flags = Some(flags);
        self
    }
}

/// Format a date as a PDF date string (Section 7.9.4).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pdf_annotate::annotation_types::pdf_date;
///
/// let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
/// assert_eq!(pdf_date(&date), "D:20240309140500+00'00'");
/// ```
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_subtype_names() {
        assert_eq!(AnnotationSubtype::PolyLine.pdf_name(), "PolyLine");
        assert_eq!(AnnotationSubtype::FreeText.pdf_name(), "FreeText");
        assert!(AnnotationSubtype::Polygon.has_interior_color());
        assert!(!AnnotationSubtype::Line.has_interior_color());
    }

    #[test]
    fn test_default_flags_print() {
        let flags = AnnotationFlags::default();
        assert!(flags.contains(AnnotationFlags::PRINT));
        assert_eq!(flags.bits(), 4);
    }

    #[test]
    fn test_flags_combine() {
        let flags = AnnotationFlags::PRINT | AnnotationFlags::LOCKED;
        assert_eq!(flags.bits(), 4 | 128);
    }

    #[test]
    fn test_metadata_new_is_unique() {
        let a = Metadata::new();
        let b = Metadata::new();
        assert!(a.name.is_some());
        assert_ne!(a.name, b.name);
        assert!(a.creation_date.is_some());
        assert_eq!(a.flags, None);
    }

    #[test]
    fn test_metadata_empty() {
        let m = Metadata::empty();
        assert_eq!(m.name, None);
        assert_eq!(m.creation_date, None);
    }

    #[test]
    fn test_metadata_builders() {
        let date = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
        let m = Metadata::empty()
            .with_author("reviewer")
            .with_subject("check")
            .with_date(date)
            .with_flags(AnnotationFlags::PRINT | AnnotationFlags::READ_ONLY);
        assert_eq!(m.author.as_deref(), Some("reviewer"));
        assert_eq!(m.subject.as_deref(), Some("check"));
        assert_eq!(pdf_date(&m.modified.unwrap()), "D:20231231235958+00'00'");
        assert!(m.flags.unwrap().contains(AnnotationFlags::READ_ONLY));
    }
}
