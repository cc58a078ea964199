//! DOCX parser implementation.

use crate::container::{OoxmlContainer, DOCUMENT_PART};
use crate::error::{Error, Result};
use crate::model::{Cell, Document, Element, InlineObject, Numbering, Paragraph, Row, Run, Table};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::styles::StyleMap;

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    container: OoxmlContainer,
    styles: StyleMap,
    source: Vec<u8>,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data.clone())?;

        let styles = match container.read_xml("word/styles.xml") {
            Ok(xml) => StyleMap::parse(&xml).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable styles.xml: {}", e);
                StyleMap::default()
            }),
            Err(_) => StyleMap::default(),
        };

        Ok(Self {
            container,
            styles,
            source: data,
        })
    }

    /// Parse the document and return a Document model.
    ///
    /// The returned document keeps the package bytes so images can be
    /// extracted later.
    pub fn parse(&mut self) -> Result<Document> {
        let xml = self.container.read_xml(DOCUMENT_PART)?;
        let mut doc = Document::from_elements(parse_body(&xml, &self.styles)?);
        doc.source = Some(self.source.clone());

        log::debug!(
            "Parsed {} body elements ({} tables)",
            doc.elements.len(),
            doc.tables().count()
        );
        Ok(doc)
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }
}

/// Parse the direct children of `w:body`.
fn parse_body(xml: &str, styles: &StyleMap) -> Result<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    // Keep whitespace from xml:space="preserve" text
    reader.config_mut().trim_text(false);

    let mut elements = Vec::new();
    let mut in_body = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:body" if !in_body => in_body = true,
                b"w:p" if in_body => {
                    let para = parse_paragraph(&mut reader, styles)?;
                    elements.push(Element::Paragraph(para));
                }
                b"w:tbl" if in_body => {
                    let table = parse_table(&mut reader, styles)?;
                    elements.push(Element::Table(table));
                }
                _ if in_body => skip_element(&mut reader, e)?,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if in_body && e.name().as_ref() == b"w:p" => {
                let para = Paragraph {
                    style_name: styles.paragraph_style_name(None),
                    ..Default::default()
                };
                elements.push(Element::Paragraph(para));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:body" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }

    Ok(elements)
}

fn skip_element(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<()> {
    reader.read_to_end(start.name())?;
    Ok(())
}

/// Where a run sits relative to its paragraph.
struct OpenRun {
    run: Run,
    /// Element stack depth just inside `w:r`
    depth: usize,
}

/// Parse a paragraph whose `w:p` start tag has just been read.
///
/// Only runs that are direct children of the paragraph (or of a direct
/// `w:hyperlink`) contribute text; runs nested inside text boxes do not.
fn parse_paragraph(reader: &mut XmlReader<'_>, styles: &StyleMap) -> Result<Paragraph> {
    let mut para = Paragraph::new();
    let mut style_id: Option<String> = None;

    // Names of open elements below w:p
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut run: Option<OpenRun> = None;
    let mut drawings: Vec<Vec<String>> = Vec::new();
    let mut in_num_pr = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"w:r" if run.is_none() && is_run_parent(&stack) => {
                        run = Some(OpenRun {
                            run: Run::default(),
                            depth: stack.len() + 1,
                        });
                    }
                    b"w:numPr" if stack.first().is_some_and(|n| n == b"w:pPr") => {
                        in_num_pr = true;
                        para.numbering.get_or_insert_with(Numbering::default);
                    }
                    b"w:drawing" => {
                        drawings.push(Vec::new());
                        mark_inline_object(&mut run);
                    }
                    b"w:pict" => {
                        para.inline_objects.push(InlineObject::Picture);
                        mark_inline_object(&mut run);
                    }
                    b"a:blip" => collect_blip(e, &mut drawings),
                    _ => {}
                }
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:pStyle" if stack.len() == 1 && stack[0] == b"w:pPr" => {
                    style_id = attr_value(e, b"w:val");
                }
                b"w:numPr" if stack.first().is_some_and(|n| n == b"w:pPr") => {
                    para.numbering.get_or_insert_with(Numbering::default);
                }
                b"w:ilvl" if in_num_pr => {
                    if let Some(ref mut numbering) = para.numbering {
                        numbering.level = attr_value(e, b"w:val")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                    }
                }
                b"w:numId" if in_num_pr => {
                    if let Some(ref mut numbering) = para.numbering {
                        numbering.num_id = attr_value(e, b"w:val");
                    }
                }
                b"w:drawing" => {
                    para.inline_objects.push(InlineObject::drawing(Vec::<String>::new()));
                    mark_inline_object(&mut run);
                }
                b"w:pict" => {
                    para.inline_objects.push(InlineObject::Picture);
                    mark_inline_object(&mut run);
                }
                b"a:blip" => collect_blip(e, &mut drawings),
                name => {
                    if let Some(ref mut open) = run {
                        apply_run_child(open, &stack, name, e);
                    }
                }
            },
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut open) = run {
                    if stack.len() == open.depth + 1 && stack.last().is_some_and(|n| n == b"w:t")
                    {
                        let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        open.run.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                if stack.is_empty() && name.as_ref() == b"w:p" {
                    break;
                }
                stack.pop();
                match name.as_ref() {
                    b"w:r" if run.as_ref().is_some_and(|o| o.depth == stack.len() + 1) => {
                        if let Some(open) = run.take() {
                            para.runs.push(open.run);
                        }
                    }
                    b"w:numPr" => in_num_pr = false,
                    b"w:drawing" => {
                        if let Some(ids) = drawings.pop() {
                            para.inline_objects.push(InlineObject::drawing(ids));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => {
                return Err(Error::XmlParse("unterminated <w:p> element".to_string()));
            }
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }

    para.style_name = styles.paragraph_style_name(style_id.as_deref());
    Ok(para)
}

/// Runs count when they sit directly under the paragraph or a hyperlink.
fn is_run_parent(stack: &[Vec<u8>]) -> bool {
    match stack {
        [] => true,
        [only] => only == b"w:hyperlink",
        _ => false,
    }
}

fn mark_inline_object(run: &mut Option<OpenRun>) {
    if let Some(ref mut open) = run {
        open.run.has_inline_object = true;
    }
}

fn collect_blip(e: &BytesStart<'_>, drawings: &mut [Vec<String>]) {
    if let Some(current) = drawings.last_mut() {
        if let Some(id) = attr_value(e, b"r:embed") {
            current.push(id);
        }
    }
}

/// Handle an empty element that is a direct child of the open run or of its
/// `w:rPr`.
fn apply_run_child(open: &mut OpenRun, stack: &[Vec<u8>], name: &[u8], e: &BytesStart<'_>) {
    if stack.len() == open.depth {
        match name {
            b"w:tab" => open.run.text.push('\t'),
            b"w:br" | b"w:cr" => open.run.text.push('\n'),
            _ => {}
        }
    } else if stack.len() == open.depth + 1 && stack.last().is_some_and(|n| n == b"w:rPr") {
        match name {
            b"w:b" => open.run.bold = toggle_value(e),
            b"w:i" => open.run.italic = toggle_value(e),
            b"w:u" => {
                open.run.underline = attr_value(e, b"w:val").map_or(true, |v| v != "none")
            }
            _ => {}
        }
    }
}

/// Parse a table whose `w:tbl` start tag has just been read.
fn parse_table(reader: &mut XmlReader<'_>, styles: &StyleMap) -> Result<Table> {
    let mut table = Table::new();
    let mut row: Option<Row> = None;
    let mut cell_lines: Option<Vec<String>> = None;
    let mut grid_span = 1usize;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match (depth, e.name().as_ref()) {
                (0, b"w:tr") => {
                    row = Some(Row::default());
                    depth += 1;
                }
                (1, b"w:tc") if row.is_some() => {
                    cell_lines = Some(Vec::new());
                    grid_span = 1;
                    depth += 1;
                }
                (2, b"w:p") if cell_lines.is_some() => {
                    let para = parse_paragraph(reader, styles)?;
                    if let Some(ref mut lines) = cell_lines {
                        lines.push(para.text());
                    }
                }
                (2, b"w:tcPr") => depth += 1,
                // Nested tables and everything else below a cell are skipped
                _ => skip_element(reader, e)?,
            },
            Ok(Event::Empty(ref e)) => match (depth, e.name().as_ref()) {
                (0, b"w:tr") => table.add_row(Row::default()),
                (1, b"w:tc") => {
                    if let Some(ref mut r) = row {
                        r.cells.push(Cell::default());
                    }
                }
                (2, b"w:p") => {
                    if let Some(ref mut lines) = cell_lines {
                        lines.push(String::new());
                    }
                }
                (3, b"w:gridSpan") => {
                    grid_span = attr_value(e, b"w:val")
                        .and_then(|v| v.parse().ok())
                        .filter(|&n: &usize| n > 0)
                        .unwrap_or(1);
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if depth == 0 {
                    if e.name().as_ref() == b"w:tbl" {
                        break;
                    }
                    continue;
                }
                depth -= 1;
                match e.name().as_ref() {
                    b"w:tr" => {
                        if let Some(r) = row.take() {
                            table.add_row(r);
                        }
                    }
                    b"w:tc" => {
                        if let (Some(lines), Some(r)) = (cell_lines.take(), row.as_mut()) {
                            let cell = Cell::with_text(lines.join("\n"));
                            // One entry per grid column the cell covers
                            for _ in 0..grid_span {
                                r.cells.push(cell.clone());
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => {
                return Err(Error::XmlParse("unterminated <w:tbl> element".to_string()));
            }
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }

    Ok(table)
}

/// Read an attribute value by its qualified name.
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Interpret an on/off property such as `<w:b/>` or `<w:b w:val="0"/>`.
fn toggle_value(e: &BytesStart<'_>) -> bool {
    attr_value(e, b"w:val").map_or(true, |v| v != "0" && v != "false" && v != "off")
}
