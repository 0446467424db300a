//! PDF handout export
//!
//! Turns an [`OutputPlan`] into a new lopdf document. Every source page is
//! embedded once as a Form XObject and drawn into its slot with a scale and
//! translate matrix. This is the only place where top-origin geometry is
//! flipped to PDF's bottom-left origin.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::constants::{
    FRAME_COLOR, FRAME_LINE_WIDTH, HELVETICA_DEFAULT_WIDTH, HELVETICA_DIGIT_WIDTH,
    HELVETICA_SLASH_WIDTH, HELVETICA_SPACE_WIDTH, NOTES_LINE_COLOR, NOTES_LINE_WIDTH,
    SHEET_NUMBER_BASELINE, SHEET_NUMBER_COLOR, SLIDE_NUMBER_COLOR, SLIDE_NUMBER_INSET, mm_to_pt,
    sheet_font_size,
};
use crate::layout::{
    LayoutCache, LayoutPlan, Origin, calculate_notes_layout, content_area, fit_page, notes_lines,
};
use crate::output_plan::{OutputPagePlan, OutputPlan};
use crate::source::PdfSource;
use crate::types::*;

use super::XObjectCache;

const ORIGIN: Origin = Origin::BottomLeft;
const FONT_NAME: &str = "F1";

/// Writes handouts as PDF documents
#[derive(Debug, Clone, Default)]
pub struct HandoutExporter {
    title: Option<String>,
}

impl HandoutExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title written to the Info dictionary
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Export on a blocking thread; the source is handed back with the result
    pub async fn export(
        &self,
        plan: OutputPlan,
        source: PdfSource,
    ) -> Result<(Document, PdfSource)> {
        let exporter = self.clone();
        tokio::task::spawn_blocking(move || {
            let doc = exporter.export_document(&plan, &source)?;
            Ok((doc, source))
        })
        .await?
    }

    /// Build the handout document for a plan
    pub fn export_document(&self, plan: &OutputPlan, source: &PdfSource) -> Result<Document> {
        if plan.is_empty() {
            return Err(HandoutError::EmptySelection);
        }

        // Fail before writing anything if a page is missing.
        for index in plan.page_indices() {
            source.page(index)?;
        }

        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        let mut layouts = LayoutCache::new();
        let mut xobjects = XObjectCache::new();
        let mut font_id = None;
        let mut page_refs = Vec::with_capacity(plan.len());

        let total = plan.len();
        for (sheet_index, sheet) in plan.iter().enumerate() {
            let layout = layouts.get_or_build(&sheet.settings)?;
            let page_id = render_sheet(
                &mut output,
                source,
                &mut xobjects,
                &mut font_id,
                SheetContext {
                    sheet,
                    layout,
                    number: sheet_index + 1,
                    total,
                    parent: pages_tree_id,
                },
            )?;
            page_refs.push(Object::Reference(page_id));
        }

        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        output
            .objects
            .insert(pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_tree_id)),
        ]));
        output.trailer.set("Root", catalog_id);

        let mut info = Dictionary::new();
        info.set(
            "Producer",
            Object::string_literal(concat!("pdf-handout ", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = output.add_object(info);
        output.trailer.set("Info", info_id);

        log::info!(
            "Exported {} pages onto {} sheets ({} layouts, {} embedded pages)",
            plan.page_indices().len(),
            total,
            layouts.len(),
            xobjects.len()
        );

        Ok(output)
    }
}

struct SheetContext<'a> {
    sheet: &'a OutputPagePlan,
    layout: &'a LayoutPlan,
    /// 1-based sheet number
    number: usize,
    total: usize,
    parent: ObjectId,
}

fn render_sheet(
    output: &mut Document,
    source: &PdfSource,
    xobjects: &mut XObjectCache,
    font_id: &mut Option<ObjectId>,
    ctx: SheetContext<'_>,
) -> Result<ObjectId> {
    let SheetContext {
        sheet,
        layout,
        number,
        total,
        parent,
    } = ctx;
    let settings = &sheet.settings;
    let sheet_width = layout.sheet_width_pt;
    let sheet_height = layout.sheet_height_pt;
    let font_size = sheet_font_size(sheet_width);

    let mut content_ops = Vec::new();
    let mut xobject_dict = Dictionary::new();

    for (slot_index, &page_index) in sheet.page_indices.iter().enumerate() {
        let (Some(slot_mm), Some(slot_pt)) = (
            layout.slots_mm.get(slot_index),
            layout.slots_pt.get(slot_index),
        ) else {
            break;
        };

        let page = source.page(page_index)?;
        let notes = calculate_notes_layout(slot_mm.width, slot_mm.height, &settings.notes);
        let content = content_area(slot_pt, &notes, mm_to_pt);
        let fitted = fit_page(
            &content,
            page.size.width_pt,
            page.size.height_pt,
            settings.scale,
        );

        let xobject_name = format!("P{}", slot_index);
        let xobject_id = xobjects.embed(output, source, page_index)?;
        xobject_dict.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        // The XObject keeps the page's own coordinates, so shift by the MediaBox origin.
        let target = ORIGIN.rect(sheet_height, &fitted.rect);
        let tx = target.x - page.media_box[0] * fitted.scale;
        let ty = target.y - page.media_box[1] * fitted.scale;
        content_ops.push(format!(
            "q {:.5} 0 0 {:.5} {:.3} {:.3} cm /{} Do Q\n",
            fitted.scale, fitted.scale, tx, ty, xobject_name
        ));

        if settings.show_frame {
            let frame = ORIGIN.rect(sheet_height, slot_pt);
            content_ops.push(format!(
                "q {} RG {} w {:.3} {:.3} {:.3} {:.3} re S Q\n",
                rgb(FRAME_COLOR),
                FRAME_LINE_WIDTH,
                frame.x,
                frame.y,
                frame.width,
                frame.height
            ));
        }

        let lines = notes_lines(slot_mm, &notes);
        if !lines.is_empty() {
            let mut ops = format!("q {} RG {} w ", rgb(NOTES_LINE_COLOR), NOTES_LINE_WIDTH);
            for line in lines {
                ops.push_str(&format!(
                    "{:.3} {:.3} m {:.3} {:.3} l ",
                    mm_to_pt(line.x1),
                    ORIGIN.point_y(sheet_height, mm_to_pt(line.y1)),
                    mm_to_pt(line.x2),
                    ORIGIN.point_y(sheet_height, mm_to_pt(line.y2)),
                ));
            }
            ops.push_str("S Q\n");
            content_ops.push(ops);
        }

        if settings.show_slide_numbers {
            let size = font_size - 1.0;
            let baseline = slot_pt.y + SLIDE_NUMBER_INSET + size;
            content_ops.push(text_op(
                &(page_index + 1).to_string(),
                size,
                slot_pt.x + SLIDE_NUMBER_INSET,
                ORIGIN.point_y(sheet_height, baseline),
                SLIDE_NUMBER_COLOR,
            ));
        }
    }

    if settings.show_sheet_numbers {
        let label = format!("{} / {}", number, total);
        let width = text_width(&label, font_size);
        content_ops.push(text_op(
            &label,
            font_size,
            (sheet_width - width) / 2.0,
            SHEET_NUMBER_BASELINE,
            SHEET_NUMBER_COLOR,
        ));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobject_dict));
    if settings.show_sheet_numbers || settings.show_slide_numbers {
        let font = *font_id.get_or_insert_with(|| output.add_object(helvetica()));
        let mut fonts = Dictionary::new();
        fonts.set(FONT_NAME, Object::Reference(font));
        resources.set("Font", Object::Dictionary(fonts));
    }

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet_width as f32),
            Object::Real(sheet_height as f32),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

fn helvetica() -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn rgb((r, g, b): (f64, f64, f64)) -> String {
    format!("{} {} {}", r, g, b)
}

/// Rendered width of a label in Helvetica
fn text_width(text: &str, font_size: f64) -> f64 {
    let em: f64 = text
        .chars()
        .map(|c| match c {
            '0'..='9' => HELVETICA_DIGIT_WIDTH,
            ' ' => HELVETICA_SPACE_WIDTH,
            '/' => HELVETICA_SLASH_WIDTH,
            _ => HELVETICA_DEFAULT_WIDTH,
        })
        .sum();
    em * font_size
}

fn text_op(text: &str, size: f64, x: f64, y: f64, color: (f64, f64, f64)) -> String {
    format!(
        "BT /{} {} Tf {} rg {:.3} {:.3} Td ({}) Tj ET\n",
        FONT_NAME,
        size,
        rgb(color),
        x,
        y,
        escape_text(text)
    )
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_uses_glyph_widths() {
        // Two digits, two spaces and a slash.
        assert!((text_width("1 / 2", 10.0) - 19.46).abs() < 1e-9);
        assert!((text_width("12 / 14", 10.0) - 30.58).abs() < 1e-9);
        assert!(text_width("1", 10.0) > text_width("/", 10.0));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a(b)c\\"), "a\\(b\\)c\\\\");
    }

    #[test]
    fn test_text_op_format() {
        let op = text_op("3", 10.0, 12.0, 20.5, (0.0, 0.0, 0.0));
        assert_eq!(op, "BT /F1 10 Tf 0 0 0 rg 12.000 20.500 Td (3) Tj ET\n");
    }
}
