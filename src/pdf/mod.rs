//! # PDF Serializer
//!
//! Takes laid-out pages and writes a PDF 1.7 file by hand. The subset needed
//! for reports is small: standard Type1 fonts, filled and stroked paths,
//! constant-alpha graphics states, internal link annotations and an outline.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, streams, ...
//! ...
//! xref                <- byte offset of every object
//! trailer             <- points to the catalog and info dictionary
//! %%EOF
//! ```
//!
//! Page objects are allocated before any content so that annotations and
//! outline entries can point at pages that come later in the file.

use std::io::Write as IoWrite;

use crate::error::ReportError;
use crate::font::{encode_str, StandardFont};
use crate::layout::{DrawCommand, LayoutPage, Stroke};
use crate::model::Metadata;
use crate::style::Color;
use miniz_oxide::deflate::compress_to_vec_zlib;

/// Bezier control distance for a quarter circle.
const KAPPA: f64 = 0.5522847498;

/// A bookmark in the viewer's outline panel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    pub title: String,
    /// 0-based page index.
    pub page_index: usize,
    pub children: Vec<OutlineItem>,
}

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing. Index = object number.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    fonts: Vec<(StandardFont, usize)>,
    /// Opacity in thousandths, and the graphics state object for it.
    alphas: Vec<(u16, usize)>,
}

impl PdfBuilder {
    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len() - 1
    }

    fn push(&mut self, data: impl Into<Vec<u8>>) -> usize {
        self.objects.push(data.into());
        self.objects.len() - 1
    }

    fn set(&mut self, id: usize, data: impl Into<Vec<u8>>) {
        self.objects[id] = data.into();
    }

    fn font_index(&self, font: StandardFont) -> usize {
        self.fonts.iter().position(|(f, _)| *f == font).unwrap_or(0)
    }

    fn alpha_index(&self, opacity: f64) -> Option<usize> {
        let key = alpha_key(opacity)?;
        self.alphas.iter().position(|(k, _)| *k == key)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        outline: &[OutlineItem],
        metadata: &Metadata,
    ) -> Result<Vec<u8>, ReportError> {
        if pages.is_empty() {
            return Err(ReportError::Render("document has no pages".to_string()));
        }

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            fonts: Vec::new(),
            alphas: Vec::new(),
        };

        self.register_fonts(&mut builder, pages);
        self.register_alphas(&mut builder, pages);

        let page_ids: Vec<usize> = pages.iter().map(|_| builder.reserve()).collect();
        let resources = self.build_resource_dict(&builder);

        for (page, &page_id) in pages.iter().zip(&page_ids) {
            let content = self.build_content_stream(page, &builder);
            let compressed = compress_to_vec_zlib(&content, 6);
            let mut stream = Vec::new();
            let _ = write!(
                stream,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            stream.extend_from_slice(&compressed);
            stream.extend_from_slice(b"\nendstream");
            let content_id = builder.push(stream);

            let mut annot_ids = Vec::with_capacity(page.links.len());
            for link in &page.links {
                let target = page_ids.get(link.target_page).ok_or_else(|| {
                    ReportError::Render(format!(
                        "link targets page {} of {}",
                        link.target_page,
                        pages.len()
                    ))
                })?;
                let [x1, y1, x2, y2] = link.rect;
                annot_ids.push(builder.push(format!(
                    "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] /Border [0 0 0] \
                     /A << /Type /Action /S /GoTo /D [{} 0 R /XYZ null null null] >> >>",
                    x1, y1, x2, y2, target
                )));
            }

            let mut page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources {}",
                page.width, page.height, content_id, resources
            );
            if !annot_ids.is_empty() {
                let refs: Vec<String> = annot_ids.iter().map(|id| format!("{id} 0 R")).collect();
                page_dict.push_str(&format!(" /Annots [{}]", refs.join(" ")));
            }
            page_dict.push_str(" >>");
            builder.set(page_id, page_dict);
        }

        let outline_id = self.write_outline(&mut builder, outline, &page_ids)?;

        let mut catalog = String::from("<< /Type /Catalog /Pages 2 0 R");
        if let Some(id) = outline_id {
            catalog.push_str(&format!(" /Outlines {id} 0 R /PageMode /UseOutlines"));
        }
        catalog.push_str(" >>");
        builder.set(1, catalog);

        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
        builder.set(
            2,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_ids.len()
            ),
        );

        let info_id = self.write_info(&mut builder, metadata);

        tracing::debug!(
            pages = pages.len(),
            objects = builder.objects.len() - 1,
            "serialized pdf"
        );
        Ok(self.serialize(&builder, info_id))
    }

    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut used: Vec<StandardFont> = pages
            .iter()
            .flat_map(|p| &p.commands)
            .filter_map(|c| match c {
                DrawCommand::Text { ink, .. } => Some(ink.font),
                _ => None,
            })
            .collect();
        used.sort();
        used.dedup();
        if used.is_empty() {
            used.push(StandardFont::Helvetica);
        }

        for font in used {
            let id = builder.push(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            ));
            builder.fonts.push((font, id));
        }
    }

    fn register_alphas(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut keys: Vec<u16> = pages
            .iter()
            .flat_map(|p| &p.commands)
            .filter_map(|c| alpha_key(command_opacity(c)))
            .collect();
        keys.sort_unstable();
        keys.dedup();

        for key in keys {
            let alpha = f64::from(key) / 1000.0;
            let id = builder.push(format!(
                "<< /Type /ExtGState /ca {alpha:.3} /CA {alpha:.3} >>"
            ));
            builder.alphas.push((key, id));
        }
    }

    fn build_resource_dict(&self, builder: &PdfBuilder) -> String {
        let fonts: Vec<String> = builder
            .fonts
            .iter()
            .enumerate()
            .map(|(i, (_, id))| format!("/F{i} {id} 0 R"))
            .collect();
        let mut dict = format!("<< /Font << {} >>", fonts.join(" "));
        if !builder.alphas.is_empty() {
            let states: Vec<String> = builder
                .alphas
                .iter()
                .enumerate()
                .map(|(i, (_, id))| format!("/GS{i} {id} 0 R"))
                .collect();
            dict.push_str(&format!(" /ExtGState << {} >>", states.join(" ")));
        }
        dict.push_str(" >>");
        dict
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, builder: &PdfBuilder) -> Vec<u8> {
        let mut stream = Vec::new();
        for command in &page.commands {
            self.write_command(&mut stream, command, builder);
        }
        stream
    }

    fn write_command(&self, stream: &mut Vec<u8>, command: &DrawCommand, builder: &PdfBuilder) {
        let _ = stream.write_all(b"q\n");
        if let Some(i) = builder.alpha_index(command_opacity(command)) {
            let _ = writeln!(stream, "/GS{i} gs");
        }

        match command {
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
                ..
            } => {
                self.write_paint(stream, fill.as_ref(), stroke.as_ref());
                let _ = writeln!(stream, "{x:.2} {y:.2} {width:.2} {height:.2} re");
                Self::write_paint_op(stream, fill.is_some(), stroke.is_some());
            }

            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                ..
            } => {
                self.write_paint(stream, None, Some(stroke));
                let _ = writeln!(stream, "{x1:.2} {y1:.2} m\n{x2:.2} {y2:.2} l\nS");
            }

            DrawCommand::Circle {
                cx,
                cy,
                radius,
                fill,
                stroke,
                ..
            } => {
                self.write_paint(stream, fill.as_ref(), stroke.as_ref());
                Self::write_circle_path(stream, *cx, *cy, *radius);
                Self::write_paint_op(stream, fill.is_some(), stroke.is_some());
            }

            DrawCommand::Text { x, y, text, ink } => {
                let c = ink.color;
                let _ = write!(
                    stream,
                    "BT\n/F{} {:.2} Tf\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} Td\n(",
                    builder.font_index(ink.font),
                    ink.size,
                    c.r,
                    c.g,
                    c.b,
                    x,
                    y
                );
                stream.extend_from_slice(&escape_pdf_bytes(&encode_str(text)));
                let _ = stream.write_all(b") Tj\nET\n");
            }
        }

        let _ = stream.write_all(b"Q\n");
    }

    fn write_paint(&self, stream: &mut Vec<u8>, fill: Option<&Color>, stroke: Option<&Stroke>) {
        if let Some(c) = fill {
            let _ = writeln!(stream, "{:.3} {:.3} {:.3} rg", c.r, c.g, c.b);
        }
        if let Some(s) = stroke {
            let _ = writeln!(
                stream,
                "{:.3} {:.3} {:.3} RG\n{:.2} w",
                s.color.r, s.color.g, s.color.b, s.width
            );
            if s.round_cap {
                let _ = stream.write_all(b"1 J\n");
            }
            if let Some([on, off]) = s.dash {
                let _ = writeln!(stream, "[{on:.2} {off:.2}] 0 d");
            }
        }
    }

    fn write_paint_op(stream: &mut Vec<u8>, fill: bool, stroke: bool) {
        let op: &[u8] = match (fill, stroke) {
            (true, true) => b"B\n",
            (true, false) => b"f\n",
            (false, true) => b"S\n",
            (false, false) => b"n\n",
        };
        let _ = stream.write_all(op);
    }

    fn write_circle_path(stream: &mut Vec<u8>, cx: f64, cy: f64, r: f64) {
        let k = r * KAPPA;
        let _ = writeln!(stream, "{:.2} {:.2} m", cx + r, cy);
        let quarters = [
            (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
            (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
            (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
            (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
        ];
        for (x1, y1, x2, y2, x3, y3) in quarters {
            let _ = writeln!(
                stream,
                "{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x3:.2} {y3:.2} c"
            );
        }
        let _ = stream.write_all(b"h\n");
    }

    /// Write the outline tree; returns the root object id.
    fn write_outline(
        &self,
        builder: &mut PdfBuilder,
        items: &[OutlineItem],
        page_ids: &[usize],
    ) -> Result<Option<usize>, ReportError> {
        if items.is_empty() {
            return Ok(None);
        }
        let root = builder.reserve();
        let (first, last, count) = self.write_outline_level(builder, items, root, page_ids)?;
        builder.set(
            root,
            format!("<< /Type /Outlines /First {first} 0 R /Last {last} 0 R /Count {count} >>"),
        );
        Ok(Some(root))
    }

    /// Returns (first id, last id, visible descendant count).
    fn write_outline_level(
        &self,
        builder: &mut PdfBuilder,
        items: &[OutlineItem],
        parent: usize,
        page_ids: &[usize],
    ) -> Result<(usize, usize, usize), ReportError> {
        let ids: Vec<usize> = items.iter().map(|_| builder.reserve()).collect();
        let mut count = items.len();

        for (i, item) in items.iter().enumerate() {
            let page = page_ids.get(item.page_index).ok_or_else(|| {
                ReportError::Render(format!(
                    "outline entry '{}' targets page {} of {}",
                    item.title,
                    item.page_index,
                    page_ids.len()
                ))
            })?;
            let mut dict = format!(
                "<< /Title {} /Parent {} 0 R /Dest [{} 0 R /XYZ null null null]",
                pdf_text_string(&item.title),
                parent,
                page
            );
            if i > 0 {
                dict.push_str(&format!(" /Prev {} 0 R", ids[i - 1]));
            }
            if i + 1 < ids.len() {
                dict.push_str(&format!(" /Next {} 0 R", ids[i + 1]));
            }
            if !item.children.is_empty() {
                let (first, last, descendants) =
                    self.write_outline_level(builder, &item.children, ids[i], page_ids)?;
                dict.push_str(&format!(
                    " /First {first} 0 R /Last {last} 0 R /Count {descendants}"
                ));
                count += descendants;
            }
            dict.push_str(" >>");
            builder.set(ids[i], dict);
        }

        Ok((ids[0], ids[ids.len() - 1], count))
    }

    fn write_info(&self, builder: &mut PdfBuilder, metadata: &Metadata) -> usize {
        let mut info = String::from("<< ");
        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Creator", &metadata.creator),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.push_str(&format!("/{} {} ", key, pdf_text_string(value)));
            }
        }
        info.push_str(&format!("/Producer (folio {}) >>", env!("CARGO_PKG_VERSION")));
        builder.push(info)
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{i} 0 obj\n");
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{offset:010} 00000 n \n");
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_id,
            xref_offset
        );

        output
    }
}

fn command_opacity(command: &DrawCommand) -> f64 {
    match command {
        DrawCommand::Rect { opacity, .. }
        | DrawCommand::Line { opacity, .. }
        | DrawCommand::Circle { opacity, .. } => *opacity,
        DrawCommand::Text { ink, .. } => ink.opacity,
    }
}

/// Opacity in thousandths; `None` when fully opaque.
fn alpha_key(opacity: f64) -> Option<u16> {
    let key = (opacity.clamp(0.0, 1.0) * 1000.0).round() as u16;
    (key < 1000).then_some(key)
}

/// Escape the delimiters of a PDF literal string.
fn escape_pdf_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if matches!(b, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

/// A PDF text string: a literal for ASCII, UTF-16BE hex otherwise.
fn pdf_text_string(s: &str) -> String {
    if s.is_ascii() {
        return format!("({})", String::from_utf8_lossy(&escape_pdf_bytes(s.as_bytes())));
    }
    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        hex.push_str(&format!("{unit:04X}"));
    }
    hex.push('>');
    hex
}
