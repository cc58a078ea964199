//! End-to-end conversion tests over synthetic DOCX packages.
//!
//! Run with: cargo test --test conversion

use std::io::{Cursor, Write};

use docmd::{convert_bytes, parse_bytes, ConvertOptions, Error};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
</w:styles>"#;

const IMAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image2.JPEG"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/missing.png"/>
  <Relationship Id="rId10" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/logo.png" TargetMode="External"/>
</Relationships>"#;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake png";
const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake jpeg";

fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
            xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"
            xmlns:v="urn:schemas-microsoft-com:vml">
  <w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body>
</w:document>"#,
        body
    )
}

/// Build a DOCX package from a body fragment plus extra parts.
fn build_docx(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let mut parts: Vec<(&str, Vec<u8>)> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("word/styles.xml", STYLES.as_bytes().to_vec()),
        ("word/document.xml", document_xml(body).into_bytes()),
    ];
    parts.extend(extra.iter().map(|(name, data)| (*name, data.to_vec())));

    for (name, data) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(&data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn para(style: Option<&str>, runs: &str) -> String {
    let ppr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    format!("<w:p>{}{}</w:p>", ppr, runs)
}

fn run(text: &str) -> String {
    format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, text)
}

fn bold_run(text: &str) -> String {
    format!(r#"<w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r>"#, text)
}

fn drawing(rel_id: &str) -> String {
    format!(
        r#"<w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        rel_id
    )
}

fn picture() -> String {
    r#"<w:r><w:pict><v:shape><v:imagedata r:id="rId7"/></v:shape></w:pict></w:r>"#.to_string()
}

fn cell(text: &str) -> String {
    format!("<w:tc><w:p>{}</w:p></w:tc>", run(text))
}

fn image_package(body: &str) -> Vec<u8> {
    build_docx(
        body,
        &[
            ("word/_rels/document.xml.rels", IMAGE_RELS.as_bytes()),
            ("word/media/image1.png", PNG_BYTES),
            ("word/media/image2.JPEG", JPEG_BYTES),
        ],
    )
}

#[test]
fn test_structured_document() {
    let body = [
        para(Some("Title"), &run("Annual Report")),
        para(Some("Heading1"), &run("Overview")),
        para(None, &format!("{}{}", run("Plain and "), bold_run("strong"))),
        para(Some("ListNumber"), &run("First")),
        para(Some("ListNumber"), &run("Second")),
        para(None, &run("Closing")),
        format!(
            "<w:tbl><w:tblPr/><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            cell("Name"),
            cell("Qty"),
            cell("Pen"),
            cell("2")
        ),
        "<w:p/>".to_string(),
    ]
    .concat();

    let output = convert_bytes(&build_docx(&body, &[]), &ConvertOptions::default()).unwrap();
    assert_eq!(
        output.markdown,
        "# Annual Report\n\n\
         ## Overview\n\n\
         Plain and **strong**\n\n\
         1. First\n\
         2. Second\n\n\
         Closing\n\n\
         | Name | Qty |\n\
         | --- | --- |\n\
         | Pen | 2 |\n"
    );
    assert!(output.images.is_empty());
}

#[test]
fn test_first_heading_promoted_without_title() {
    let body = [
        para(Some("Heading1"), &run("Guide")),
        para(Some("Heading2"), &run("Setup")),
        para(Some("ListBullet"), &run("• Install")),
        para(Some("ListBullet"), &run("Configure")),
    ]
    .concat();

    let output = convert_bytes(&build_docx(&body, &[]), &ConvertOptions::default()).unwrap();
    assert_eq!(
        output.markdown,
        "# Guide\n\n## Setup\n\n- Install\n- Configure\n"
    );
}

#[test]
fn test_list_styles_without_text_markers() {
    let body = [
        para(Some("ListNumber"), &run("Alpha")),
        para(Some("ListNumber"), &run("-5 degrees")),
        para(None, &run("Gap")),
        para(Some("ListBullet"), &run("Gamma")),
        para(Some("ListBullet"), &run("+1 for this idea")),
        para(Some("ListNumber"), &run("Again")),
    ]
    .concat();

    let output = convert_bytes(&build_docx(&body, &[]), &ConvertOptions::default()).unwrap();
    assert_eq!(
        output.markdown,
        "1. Alpha\n\
         2. -5 degrees\n\n\
         Gap\n\n\
         - Gamma\n\
         - +1 for this idea\n\
         1. Again\n"
    );
}

#[test]
fn test_conversion_is_deterministic() {
    let body = [
        para(Some("Title"), &run("Report")),
        para(Some("ListBullet"), &run("Point")),
        para(None, &drawing("rId8")),
        para(None, &format!("{}{}", run("Caption "), bold_run("text"))),
        para(None, &drawing("rId7")),
    ]
    .concat();
    let data = image_package(&body);

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first_options = ConvertOptions::new().with_assets_dir(first_dir.path());
    let second_options = ConvertOptions::new().with_assets_dir(second_dir.path());
    let first = convert_bytes(&data, &first_options).unwrap();
    let second = convert_bytes(&data, &second_options).unwrap();

    assert_eq!(first.markdown.as_bytes(), second.markdown.as_bytes());
    assert_eq!(first.images, ["image_001.png", "image_002.jpeg"]);
    assert_eq!(first.images, second.images);
    for name in &first.images {
        assert_eq!(
            std::fs::read(first_dir.path().join(name)).unwrap(),
            std::fs::read(second_dir.path().join(name)).unwrap()
        );
    }

    let plain = convert_bytes(&data, &ConvertOptions::default()).unwrap();
    let again = convert_bytes(&data, &ConvertOptions::default()).unwrap();
    assert_eq!(plain.markdown, again.markdown);
}

#[test]
fn test_blank_paragraphs_collapse() {
    let body = [
        para(None, &run("one")),
        "<w:p/><w:p/><w:p></w:p>".to_string(),
        para(None, &run("two")),
    ]
    .concat();

    let output = convert_bytes(&build_docx(&body, &[]), &ConvertOptions::default()).unwrap();
    assert_eq!(output.markdown, "one\n\ntwo\n");
    assert!(!output.markdown.contains("\n\n\n"));
}

#[test]
fn test_images_extracted_by_relationship() {
    let body = [
        para(None, &drawing("rId8")),
        para(None, &format!("{}{}", run("See figure"), picture())),
        para(None, &drawing("rId99")),
    ]
    .concat();

    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    let options = ConvertOptions::new().with_assets_dir(&assets);
    let output = convert_bytes(&image_package(&body), &options).unwrap();

    assert_eq!(output.images, vec!["image_001.png", "image_002.jpeg"]);
    assert_eq!(std::fs::read(assets.join("image_001.png")).unwrap(), PNG_BYTES);
    assert_eq!(std::fs::read(assets.join("image_002.jpeg")).unwrap(), JPEG_BYTES);
    assert!(!assets.join("image_003.png").exists());

    assert_eq!(
        output.markdown,
        "![Image](./assets/image_002.jpeg)\n\n\
         ![Image](./assets/image_001.png)\n\n\
         See figure\n\n\
         ![Image](./assets/image_001.png)\n"
    );
}

#[test]
fn test_images_skipped_without_assets_dir() {
    let body = [para(None, &drawing("rId7")), para(None, &run("Text"))].concat();

    let output = convert_bytes(&image_package(&body), &ConvertOptions::default()).unwrap();
    assert!(output.images.is_empty());
    assert_eq!(output.markdown, "Text\n");

    let dir = tempfile::tempdir().unwrap();
    let options = ConvertOptions::new()
        .with_assets_dir(dir.path())
        .with_images(false);
    let output = convert_bytes(&image_package(&body), &options).unwrap();
    assert!(output.images.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_media_folder_scan_without_relationships() {
    let body = para(None, &drawing("rId7"));
    let data = build_docx(
        &body,
        &[
            ("word/media/photo.GIF", b"GIF89a".as_slice()),
            ("word/media/notes.txt", b"not an image".as_slice()),
            ("word/media/chart.svg", b"<svg/>".as_slice()),
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let options = ConvertOptions::new().with_assets_dir(dir.path());
    let output = convert_bytes(&data, &options).unwrap();

    assert_eq!(output.images, vec!["image_001.gif", "image_002.svg"]);
    assert!(dir.path().join("image_002.svg").exists());
    // No ID mapping, so the drawing falls back to the first image
    assert_eq!(output.markdown, "![Image](./assets/image_001.gif)\n");
}

#[test]
fn test_malformed_relationships_fall_back_to_scan() {
    let body = para(None, &run("Body"));
    let data = build_docx(
        &body,
        &[
            ("word/_rels/document.xml.rels", b"<Relationships><Rel".as_slice()),
            ("word/media/image1.png", PNG_BYTES),
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let output = convert_bytes(&data, &ConvertOptions::new().with_assets_dir(dir.path())).unwrap();
    assert_eq!(output.images, vec!["image_001.png"]);
    assert_eq!(output.markdown, "Body\n");
}

#[test]
fn test_to_markdown_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    let body = [
        para(Some("Title"), &run("Doc")),
        para(Some("Heading2"), &run("Part")),
    ]
    .concat();
    std::fs::write(&path, build_docx(&body, &[])).unwrap();

    assert_eq!(docmd::to_markdown(&path).unwrap(), "# Doc\n\n### Part\n");
    assert_eq!(docmd::extract_text(&path).unwrap(), "Doc\nPart");

    let assets = dir.path().join("assets");
    let output =
        docmd::to_markdown_with_options(&path, &ConvertOptions::new().with_assets_dir(&assets))
            .unwrap();
    assert!(output.images.is_empty());
}

#[test]
fn test_missing_document_part() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(STYLES.as_bytes()).unwrap();
    let data = zip.finish().unwrap().into_inner();

    assert!(matches!(
        parse_bytes(&data),
        Err(Error::MissingComponent(ref part)) if part == "word/document.xml"
    ));
}

#[test]
fn test_parsed_tree_keeps_source() {
    let data = build_docx(&para(None, &run("x")), &[]);
    let doc = parse_bytes(&data).unwrap();
    assert_eq!(doc.source.as_deref(), Some(data.as_slice()));
    assert_eq!(doc.plain_text(), "x");
}
