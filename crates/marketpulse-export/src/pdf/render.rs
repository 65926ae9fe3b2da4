use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb as PdfRgb,
};

use super::layout::{FontWeight, Page, ReportLayout, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::error::ExportError;

const DOCUMENT_TITLE: &str = "Relatório MarketPulse";
const LAYER_NAME: &str = "Conteúdo";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

/// Renders a laid-out report to PDF bytes using the built-in Helvetica fonts.
///
/// # Errors
///
/// Returns [`ExportError::Pdf`] if a font cannot be registered or the
/// document cannot be serialized.
pub fn render(layout: &ReportLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    tracing::debug!(pages = layout.pages.len(), "PDF document rendered");
    Ok(doc.save_to_bytes()?)
}

fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts) {
    for rect in &page.rects {
        layer.set_fill_color(color(rect.color));
        let shape = Rect::new(
            Mm(rect.x),
            Mm(PAGE_HEIGHT_MM - rect.bottom()),
            Mm(rect.x + rect.width),
            Mm(PAGE_HEIGHT_MM - rect.y),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(shape);
    }

    for run in &page.texts {
        layer.set_fill_color(color(run.color));
        layer.use_text(
            run.text.as_str(),
            run.size,
            Mm(run.x),
            Mm(PAGE_HEIGHT_MM - run.y),
            fonts.get(run.weight),
        );
    }
}

fn color(rgb: Rgb) -> Color {
    let channel = |v: u8| f32::from(v) / 255.0;
    Color::Rgb(PdfRgb::new(channel(rgb.r), channel(rgb.g), channel(rgb.b), None))
}
