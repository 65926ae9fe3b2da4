//! Spreadsheet report: a sheet model built from the bundle, then written
//! with `rust_xlsxwriter`.

use marketpulse_core::normalize_listing_url;
use rust_xlsxwriter::{Format, Workbook};

use crate::bundle::ReportBundle;
use crate::error::ExportError;
use crate::value::render_value;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl Cell {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) => None,
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One worksheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &'static str, headers: &[&'static str]) -> Self {
        Self {
            name,
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<Cell>, value: impl Into<Cell>) {
        self.rows.push(vec![label.into(), value.into()]);
    }
}

/// Builds the sheets for `bundle`. Sheets without source data are omitted.
#[must_use]
pub fn build_sheets(bundle: &ReportBundle<'_>) -> Vec<Sheet> {
    let listing = bundle.listing;
    let mut sheets = Vec::new();

    let mut general = Sheet::new("Dados Produto", &["Campo", "Valor"]);
    general.push("Título", render_value(Some(&listing.title)));
    general.push("Preço", render_value(Some(&listing.price)));
    general.push("Plataforma", listing.platform.display_name());
    general.push("Vendedor", render_value(listing.seller.as_deref()));
    general.push("Localização", render_value(listing.item_location.as_deref()));
    general.push("Estoque", render_value(listing.stock.as_deref()));
    general.push("Avaliação", render_value(listing.rating.as_deref()));
    general.push("Idade Anúncio", render_value(listing.listing_age.as_deref()));
    general.push("Vendas Est.", render_value(listing.sales_estimate.as_deref()));
    general.push("URL", render_value(bundle.source_url));
    sheets.push(general);

    let mut logistics = Sheet::new(
        "Logística",
        &["Tipo", "Altura", "Largura", "Comprimento", "Peso", "Fonte"],
    );
    let product = listing.product_linear().unwrap_or_default();
    let package = listing.package_linear().unwrap_or_default();
    logistics.rows.push(vec![
        "Produto (Físico)".into(),
        render_value(Some(&product.height)).into(),
        render_value(Some(&product.width)).into(),
        render_value(Some(&product.length)).into(),
        render_value(listing.product_weight()).into(),
        listing.product_source().report_label().into(),
    ]);
    logistics.rows.push(vec![
        "Embalagem (Envio)".into(),
        render_value(Some(&package.height)).into(),
        render_value(Some(&package.width)).into(),
        render_value(Some(&package.length)).into(),
        render_value(listing.package_weight()).into(),
        listing.package_source().report_label().into(),
    ]);
    sheets.push(logistics);

    if let Some(analysis) = bundle.analysis {
        let mut sheet = Sheet::new("Análise IA", &["Tipo", "Conteúdo"]);
        sheet.push("Score", Cell::Integer(analysis.score));
        sheet.push("Análise de Preço", render_value(Some(&analysis.price_analysis)));
        sheet.push(
            "Melhoria Descrição",
            render_value(Some(&analysis.description_improvement)),
        );
        for strength in &analysis.strengths {
            sheet.push("Ponto Forte", render_value(Some(strength)));
        }
        for weakness in &analysis.weaknesses {
            sheet.push("Ponto Fraco", render_value(Some(weakness)));
        }
        sheets.push(sheet);
    }

    if let Some(trends) = bundle.trends {
        let mut sheet = Sheet::new("Mercado", &["Tipo", "Valor"]);
        sheet.push("Oportunidade", trends.opportunity_level.label());
        sheet.push("Preço Médio Mercado", render_value(Some(&trends.price_range)));
        sheet.push("Resumo", render_value(Some(&trends.overview)));
        for product in &trends.trending_products {
            sheet.push("Produto em Alta", render_value(Some(product)));
        }
        sheets.push(sheet);
    }

    if let Some(copy) = bundle.copy {
        let mut sheet = Sheet::new("Copywriting", &["Seção", "Texto"]);
        sheet.push("Pitch de Vendas", render_value(Some(&copy.sales_pitch)));
        for title in &copy.optimized_titles {
            sheet.push("Título Sugerido", render_value(Some(title)));
        }
        for bullet in &copy.bullet_points {
            sheet.push("Bullet Point", render_value(Some(bullet)));
        }
        sheets.push(sheet);
    }

    let mut extra = Sheet::new("Ações e Concorrência", &["Categoria", "Conteúdo"]);
    for insight in &listing.actionable_insights {
        extra.push("Ação Sugerida", render_value(Some(insight)));
    }
    for ad in &listing.similar_ads {
        let url = normalize_listing_url(Some(&ad.url), &ad.title, listing.platform);
        extra.push(
            "Anúncio Semelhante",
            format!("{} ({}) - {url}", render_value(Some(&ad.title)), render_value(Some(&ad.price))),
        );
    }
    if !extra.rows.is_empty() {
        sheets.push(extra);
    }

    sheets
}

/// Writes `sheets` to an in-memory XLSX file.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if a sheet name is rejected or the
/// workbook cannot be serialized.
pub fn write_xlsx(sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, header) in (0u16..).zip(&sheet.headers) {
            worksheet.write_string_with_format(0, col, *header, &bold)?;
            worksheet.set_column_width(col, if col == 0 { 22 } else { 60 })?;
        }

        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Integer(value) => {
                        worksheet.write_number(row, col, integer_cell(*value))?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[allow(clippy::cast_precision_loss)]
fn integer_cell(value: i64) -> f64 {
    value as f64
}
