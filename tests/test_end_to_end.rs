//! End-to-end annotation of pages in every orientation.
//!
//! Each page receives the same 29 annotations: two passes of the six
//! shape kinds, two passes of four images and nine text blocks covering
//! every alignment and baseline combination.

use pdf_annotate::object::Object;
use pdf_annotate::{
    Annotator, Color, Location, MemoryDocument, PageGeometry, Style, StyleOverrides, TextAlign, TextBaseline,
};

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const IMAGES: [&str; 4] = ["png-1", "png-2", "png-3", "png-4"];

struct Styles {
    gaudy: Style,
    transparent: Style,
    texts: Vec<Style>,
    image: Style,
    transparent_image: Style,
}

fn styles() -> Styles {
    let gaudy = Style::from_overrides(
        StyleOverrides::new()
            .with_stroke_color(Color::rgb(1.0, 0.0, 0.0))
            .with_stroke_width(3.0)
            .with_fill(Color::rgb(0.0, 1.0, 0.0))
            .with_content("Latin")
            .with_font_size(12.0)
            .with_wrap_text(true),
    )
    .unwrap();

    let transparent = gaudy
        .derive(
            StyleOverrides::new()
                .with_fill(Color::rgba(0.0, 0.0, 1.0, 0.5))
                .with_stroke_color(Color::rgba(1.0, 0.0, 0.0, 0.25)),
        )
        .unwrap();

    let top_left = gaudy
        .derive(
            StyleOverrides::new()
                .with_stroke_color(Color::black())
                .with_content(r"Though yet of Hamlet, our dear brother's death \\ The memory be green")
                .with_font_size(6.0)
                .with_text_align(TextAlign::Left)
                .with_text_baseline(TextBaseline::Top),
        )
        .unwrap();

    let mut texts = Vec::new();
    for baseline in [TextBaseline::Top, TextBaseline::Middle, TextBaseline::Bottom] {
        for align in [TextAlign::Left, TextAlign::Center, TextAlign::Right] {
            texts.push(
                top_left
                    .derive(StyleOverrides::new().with_text_align(align).with_text_baseline(baseline))
                    .unwrap(),
            );
        }
    }

    let image = Style::from_overrides(StyleOverrides::new().with_stroke_width(0.0)).unwrap();
    let transparent_image = image
        .derive(
            StyleOverrides::new()
                .with_fill_transparency(0.5)
                .with_stroke_transparency(0.5),
        )
        .unwrap();

    Styles {
        gaudy,
        transparent,
        texts,
        image,
        transparent_image,
    }
}

fn add_shapes(annotator: &mut Annotator<MemoryDocument>, style: &Style, y1: f64, y2: f64) {
    annotator
        .add_annotation("square", &Location::rect(0, 10.0, y1, 50.0, y2), style)
        .unwrap();
    annotator
        .add_annotation("circle", &Location::rect(0, 60.0, y1, 100.0, y2), style)
        .unwrap();
    annotator
        .add_annotation(
            "polygon",
            &Location::points(0, [(110.0, y1), (150.0, y1), (130.0, y2)]),
            style,
        )
        .unwrap();
    annotator
        .add_annotation(
            "polyline",
            &Location::points(0, [(160.0, y1), (200.0, y1), (180.0, y2)]),
            style,
        )
        .unwrap();
    annotator
        .add_annotation("line", &Location::points(0, [(210.0, y1), (250.0, y2)]), style)
        .unwrap();
    annotator
        .add_annotation("ink", &Location::points(0, [(260.0, y1), (300.0, y2)]), style)
        .unwrap();
}

fn add_images(annotator: &mut Annotator<MemoryDocument>, style: &Style, y1: f64, y2: f64) {
    for (x, image) in [10.0, 60.0, 110.0, 160.0].into_iter().zip(IMAGES) {
        let style = style.derive(StyleOverrides::new().with_image(image)).unwrap();
        annotator
            .add_annotation("image", &Location::rect(0, x, y1, x + 40.0, y2), &style)
            .unwrap();
    }
}

fn add_texts(annotator: &mut Annotator<MemoryDocument>, texts: &[Style]) {
    for (i, style) in texts.iter().enumerate() {
        let x = 10.0 + i as f64 * 50.0;
        annotator
            .add_annotation("text", &Location::rect(0, x, 220.0, x + 40.0, 300.0), style)
            .unwrap();
    }
}

fn annotate(rotation: i32) -> MemoryDocument {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut doc = MemoryDocument::new();
    doc.add_page(PageGeometry::new(PAGE_WIDTH, PAGE_HEIGHT, rotation));
    for (i, id) in IMAGES.iter().enumerate() {
        let shade = (i as u8 + 1) * 60;
        doc.add_image(*id, 2, 2, vec![shade; 12]);
    }

    let styles = styles();
    let mut annotator = Annotator::new(doc);
    add_shapes(&mut annotator, &styles.gaudy, 20.0, 60.0);
    add_shapes(&mut annotator, &styles.transparent, 70.0, 110.0);
    add_images(&mut annotator, &styles.image, 120.0, 160.0);
    add_images(&mut annotator, &styles.transparent_image, 170.0, 210.0);
    add_texts(&mut annotator, &styles.texts);
    annotator.into_document()
}

fn rect(doc: &MemoryDocument, annot: &Object) -> [f64; 4] {
    let values: Vec<f64> = doc
        .resolve(annot.get("Rect").unwrap())
        .and_then(|r| r.as_array())
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect();
    [values[0], values[1], values[2], values[3]]
}

fn check_document(doc: &MemoryDocument, first_square: [f64; 4]) {
    let annots = doc.annotations(0);
    assert_eq!(annots.len(), 29);

    let mut image_xobjects = Vec::new();
    for (i, reference) in annots.iter().enumerate() {
        let annot = doc.object(*reference).unwrap();
        assert_eq!(annot.get("Type").and_then(|o| o.as_name()), Some("Annot"));

        let [x1, y1, x2, y2] = rect(doc, annot);
        assert!(x1 <= x2 && y1 <= y2, "annotation {} has an unordered rect", i);
        assert!(
            x1 >= 0.0 && y1 >= 0.0 && x2 <= PAGE_WIDTH && y2 <= PAGE_HEIGHT,
            "annotation {} lies outside the page: {:?}",
            i,
            [x1, y1, x2, y2]
        );

        let ap = annot.get("AP").unwrap();
        let form = doc.resolve(ap.get("N").unwrap()).unwrap();
        assert_eq!(form.get("Subtype").and_then(|o| o.as_name()), Some("Form"));
        assert_eq!(form.get("BBox"), annot.get("Rect"));
        assert!(!form.stream_data().unwrap().is_empty());

        if let Some(xobjects) = form.get("Resources").and_then(|r| r.get("XObject")) {
            image_xobjects.push(xobjects.get("Im1").and_then(|o| o.as_reference()).unwrap());
        }
    }

    assert_eq!(rect(doc, doc.object(annots[0]).unwrap()), first_square);

    // two passes over four images share four image objects
    assert_eq!(image_xobjects.len(), 8);
    image_xobjects.sort_by_key(|r| r.id);
    image_xobjects.dedup();
    assert_eq!(image_xobjects.len(), 4);
}

fn subtypes(doc: &MemoryDocument) -> Vec<String> {
    doc.annotations(0)
        .iter()
        .map(|r| {
            doc.object(*r)
                .and_then(|a| a.get("Subtype"))
                .and_then(|s| s.as_name())
                .unwrap()
                .to_string()
        })
        .collect()
}

#[test]
fn test_end_to_end() {
    let doc = annotate(0);
    check_document(&doc, [10.0, 20.0, 50.0, 60.0]);

    let subtypes = subtypes(&doc);
    assert_eq!(&subtypes[..6], ["Square", "Circle", "Polygon", "PolyLine", "Line", "Ink"]);
    assert!(subtypes[12..20].iter().all(|s| s == "Stamp"));
    assert!(subtypes[20..].iter().all(|s| s == "FreeText"));
}

#[test]
fn test_end_to_end_rotated_90() {
    let doc = annotate(90);
    check_document(&doc, [552.0, 10.0, 592.0, 50.0]);
}

#[test]
fn test_end_to_end_rotated_180() {
    let doc = annotate(180);
    check_document(&doc, [562.0, 732.0, 602.0, 772.0]);
}

#[test]
fn test_end_to_end_rotated_270() {
    let doc = annotate(270);
    check_document(&doc, [20.0, 742.0, 60.0, 782.0]);
}

#[test]
fn test_rotated_text_draws_upright() {
    let doc = annotate(90);
    let text = doc.object(doc.annotations(0)[20]).unwrap();
    let form = doc.resolve(text.get("AP").unwrap().get("N").unwrap()).unwrap();
    let content = String::from_utf8_lossy(form.stream_data().unwrap()).into_owned();
    assert!(content.contains("0 1 -1 0 612 0 cm"), "{}", content);
    assert!(content.contains("/F1 6 Tf"));
    assert!(content.contains("Tj"));
    // the standalone `\\` in the verse is a line break, never drawn
    assert!(!content.contains('\\'), "{}", content);
}
