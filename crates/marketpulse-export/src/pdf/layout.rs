//! Pure layout of the PDF report.
//!
//! [`ReportLayout::build`] places every piece of text on A4 pages without
//! touching a PDF library, so page breaks and section order are testable on
//! plain data. Coordinates are millimetres from the top-left corner; text
//! `y` is the baseline.

use marketpulse_core::{AnalysisResult, CopywritingResult, ExtractedListing, TrendResult};

use crate::bundle::ReportBundle;
use crate::value::render_value;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// No content may extend below this line.
pub const PAGE_BREAK_LIMIT_MM: f32 = 280.0;

const MARGIN_X: f32 = 14.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_X;
const PAGE_TOP: f32 = 20.0;
const HEADER_BAND: f32 = 40.0;
const FIRST_CONTENT_Y: f32 = 50.0;
const SECTION_GAP: f32 = 15.0;
const LINE_HEIGHT: f32 = 5.0;
const CELL_PADDING: f32 = 2.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// Second column of the strengths/weaknesses block.
const RIGHT_COLUMN_X: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const SLATE_900: Rgb = Rgb::new(15, 23, 42);
pub const SLATE_800: Rgb = Rgb::new(30, 41, 59);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
const GRAY: Rgb = Rgb::new(100, 100, 100);
const GREEN: Rgb = Rgb::new(0, 100, 0);
const RED: Rgb = Rgb::new(180, 0, 0);
const BLUE: Rgb = Rgb::new(59, 130, 246);
const AMBER: Rgb = Rgb::new(245, 158, 11);
const TEAL: Rgb = Rgb::new(41, 128, 185);
const STRIPE: Rgb = Rgb::new(245, 245, 245);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub color: Rgb,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl FilledRect {
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One page: background rectangles are painted before text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub rects: Vec<FilledRect>,
    pub texts: Vec<TextRun>,
}

impl Page {
    /// Lowest point reached by content on this page, excluding the header band.
    #[must_use]
    pub fn content_bottom(&self) -> f32 {
        let text = self.texts.iter().map(|t| t.y).fold(0.0, f32::max);
        let rects = self
            .rects
            .iter()
            .filter(|r| r.y > 0.0)
            .map(FilledRect::bottom)
            .fold(0.0, f32::max);
        text.max(rects)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportLayout {
    pub pages: Vec<Page>,
}

impl ReportLayout {
    /// Lays out the full report for `bundle`.
    #[must_use]
    pub fn build(bundle: &ReportBundle<'_>) -> Self {
        let mut writer = Writer::new();
        writer.header(&bundle.generated_on());
        writer.product_section(bundle.listing, bundle.source_url);
        writer.logistics_section(bundle.listing);
        if let Some(trends) = bundle.trends {
            writer.trends_section(trends);
        }
        if let Some(analysis) = bundle.analysis {
            writer.analysis_section(analysis);
        }
        if let Some(copy) = bundle.copy {
            writer.copy_section(copy);
        }
        if !bundle.listing.similar_ads.is_empty() {
            writer.similar_ads_section(bundle.listing);
        }
        if !bundle.listing.actionable_insights.is_empty() {
            writer.insights_section(&bundle.listing.actionable_insights);
        }
        writer.finish()
    }

    /// Text runs in reading order with their page index.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &TextRun)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| page.texts.iter().map(move |t| (i, t)))
    }

    /// First run whose text equals `text`.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<(usize, &TextRun)> {
        self.texts().find(|(_, t)| t.text == text)
    }
}

// ---------------------------------------------------------------------------
// Text measurement
// ---------------------------------------------------------------------------

/// Greedy word wrap of `text` into lines no wider than `width_mm` at
/// `font_size` points. Words longer than a line are split. Always returns at
/// least one line.
#[must_use]
pub fn wrap_text(text: &str, width_mm: f32, font_size: f32) -> Vec<String> {
    let max_chars = chars_per_line(width_mm, font_size);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        if current_len > 0 || lines.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chars_per_line(width_mm: f32, font_size: f32) -> usize {
    let glyph = font_size * PT_TO_MM * AVG_GLYPH_EM;
    ((width_mm / glyph).floor() as usize).max(1)
}

#[allow(clippy::cast_precision_loss)]
fn lines_height(lines: usize, line_height: f32) -> f32 {
    lines as f32 * line_height
}

fn table_line_height(font_size: f32) -> f32 {
    font_size * PT_TO_MM * 1.25
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct TableStyle {
    head_fill: Rgb,
    striped: bool,
    font_size: f32,
}

const GRID: TableStyle = TableStyle {
    head_fill: TEAL,
    striped: false,
    font_size: 10.0,
};

struct Writer {
    pages: Vec<Page>,
    y: f32,
}

impl Writer {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_TOP,
        }
    }

    fn finish(self) -> ReportLayout {
        ReportLayout { pages: self.pages }
    }

    fn page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = PAGE_TOP;
    }

    /// Starts a new page when `height` more millimetres would cross the limit.
    fn ensure_space(&mut self, height: f32) {
        if self.y + height > PAGE_BREAK_LIMIT_MM {
            self.new_page();
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, weight: FontWeight, color: Rgb, text: String) {
        self.page().texts.push(TextRun {
            x,
            y,
            size,
            weight,
            color,
            text,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.page().rects.push(FilledRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn heading(&mut self, title: &str, reserve: f32) {
        self.ensure_space(reserve);
        self.text(
            MARGIN_X,
            self.y,
            14.0,
            FontWeight::Bold,
            SLATE_800,
            title.to_string(),
        );
        self.y += 10.0;
    }

    /// Wrapped paragraph that breaks line by line.
    fn paragraph(&mut self, text: &str, x: f32, width: f32, size: f32, color: Rgb) {
        for line in wrap_text(text, width, size) {
            self.ensure_space(LINE_HEIGHT);
            self.text(x, self.y, size, FontWeight::Regular, color, line);
            self.y += LINE_HEIGHT;
        }
    }

    fn table(&mut self, head: &[&str], widths: &[f32], rows: &[Vec<String>], style: TableStyle) {
        let head_cells: Vec<String> = head.iter().map(ToString::to_string).collect();
        let head_height = row_height(&head_cells, widths, style.font_size);
        let first_row = rows
            .first()
            .map_or(0.0, |r| row_height(r, widths, style.font_size));

        self.ensure_space(head_height + first_row);
        self.row(&head_cells, widths, style.font_size, FontWeight::Bold, WHITE, Some(style.head_fill));

        for (i, row) in rows.iter().enumerate() {
            let height = row_height(row, widths, style.font_size);
            if self.y + height > PAGE_BREAK_LIMIT_MM {
                self.new_page();
                self.row(&head_cells, widths, style.font_size, FontWeight::Bold, WHITE, Some(style.head_fill));
            }
            let fill = (style.striped && i % 2 == 1).then_some(STRIPE);
            self.row(row, widths, style.font_size, FontWeight::Regular, SLATE_800, fill);
        }
    }

    fn row(
        &mut self,
        cells: &[String],
        widths: &[f32],
        size: f32,
        weight: FontWeight,
        color: Rgb,
        fill: Option<Rgb>,
    ) {
        let height = row_height(cells, widths, size);
        if let Some(fill) = fill {
            let width: f32 = widths.iter().sum();
            self.rect(MARGIN_X, self.y, width, height, fill);
        }

        let line_height = table_line_height(size);
        let first_baseline = self.y + CELL_PADDING + size * PT_TO_MM;
        let mut x = MARGIN_X;
        for (cell, width) in cells.iter().zip(widths) {
            let mut baseline = first_baseline;
            for line in wrap_text(cell, width - 2.0 * CELL_PADDING, size) {
                self.text(x + CELL_PADDING, baseline, size, weight, color, line);
                baseline += line_height;
            }
            x += width;
        }
        self.y += height;
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    fn header(&mut self, generated_on: &str) {
        self.rect(0.0, 0.0, PAGE_WIDTH_MM, HEADER_BAND, SLATE_900);
        self.text(MARGIN_X, 20.0, 22.0, FontWeight::Bold, WHITE, "Relatório MarketPulse".into());
        self.text(
            MARGIN_X,
            28.0,
            10.0,
            FontWeight::Regular,
            WHITE,
            format!("Gerado em: {generated_on}"),
        );
        self.text(
            MARGIN_X,
            34.0,
            10.0,
            FontWeight::Regular,
            WHITE,
            "Inteligência de Mercado & Análise Técnica".into(),
        );
        self.y = FIRST_CONTENT_Y;
    }

    fn product_section(&mut self, listing: &ExtractedListing, source_url: Option<&str>) {
        self.heading("1. Dados do Produto", 30.0);
        let rating = format!(
            "{} ({})",
            render_value(listing.rating.as_deref()),
            render_value(listing.reviews_count.as_deref())
        );
        let mut rows = vec![
            pair("Produto", render_value(Some(&listing.title))),
            pair("Plataforma", listing.platform.display_name().to_string()),
            pair("Preço", render_value(Some(&listing.price))),
            pair("Vendedor", render_value(listing.seller.as_deref())),
            pair("Localização", render_value(listing.item_location.as_deref())),
            pair("Avaliação", rating),
            pair("Estoque", render_value(listing.stock.as_deref())),
            pair("Idade Anúncio", render_value(listing.listing_age.as_deref())),
            pair("Estimativa Vendas", render_value(listing.sales_estimate.as_deref())),
        ];
        if let Some(url) = source_url {
            rows.push(pair("URL", render_value(Some(url))));
        }
        self.table(
            &["Campo", "Informação"],
            &[50.0, CONTENT_WIDTH - 50.0],
            &rows,
            TableStyle {
                head_fill: BLUE,
                ..GRID
            },
        );
        self.y += SECTION_GAP;
    }

    fn logistics_section(&mut self, listing: &ExtractedListing) {
        self.heading("2. Dados Logísticos & Dimensões", 30.0);
        let product = listing.product_linear().unwrap_or_default();
        let package = listing.package_linear().unwrap_or_default();
        let rows = vec![
            vec![
                "Produto (Físico)".to_string(),
                render_value(Some(&product.height)),
                render_value(Some(&product.width)),
                render_value(Some(&product.length)),
                render_value(listing.product_weight()),
                listing.product_source().report_label().to_string(),
            ],
            vec![
                "Embalagem (Envio)".to_string(),
                render_value(Some(&package.height)),
                render_value(Some(&package.width)),
                render_value(Some(&package.length)),
                render_value(listing.package_weight()),
                listing.package_source().report_label().to_string(),
            ],
        ];
        self.table(
            &["Tipo", "Altura", "Largura", "Comp.", "Peso", "Fonte"],
            &[42.0, 28.0, 28.0, 28.0, 28.0, 28.0],
            &rows,
            TableStyle {
                head_fill: AMBER,
                striped: true,
                ..GRID
            },
        );
        self.y += SECTION_GAP;
    }

    fn trends_section(&mut self, trends: &TrendResult) {
        self.heading("3. Contexto de Mercado (Tendências)", 60.0);
        self.text(
            MARGIN_X,
            self.y,
            10.0,
            FontWeight::Regular,
            GRAY,
            format!("Nível de Oportunidade: {}", trends.opportunity_level.label()),
        );
        self.text(
            MARGIN_X,
            self.y + 6.0,
            10.0,
            FontWeight::Regular,
            GRAY,
            format!("Faixa de Preço Média: {}", render_value(Some(&trends.price_range))),
        );
        self.y += 14.0;

        self.paragraph(
            &format!("Resumo: {}", render_value(Some(&trends.overview))),
            MARGIN_X,
            CONTENT_WIDTH,
            10.0,
            SLATE_800,
        );
        self.y += LINE_HEIGHT;

        if !trends.trending_products.is_empty() {
            let rows: Vec<Vec<String>> = trends
                .trending_products
                .iter()
                .map(|p| vec![render_value(Some(p))])
                .collect();
            self.table(
                &["Produtos em Alta na Categoria"],
                &[CONTENT_WIDTH],
                &rows,
                TableStyle {
                    font_size: 9.0,
                    ..GRID
                },
            );
        }
        self.y += SECTION_GAP;
    }

    fn analysis_section(&mut self, analysis: &AnalysisResult) {
        self.heading("4. Análise de Qualidade (IA)", 80.0);
        self.text(
            MARGIN_X,
            self.y,
            12.0,
            FontWeight::Bold,
            SLATE_800,
            format!("Score: {}/100", analysis.score),
        );
        self.y += 8.0;

        self.ensure_space(LINE_HEIGHT * 2.0);
        self.text(MARGIN_X, self.y, 10.0, FontWeight::Bold, GREEN, "Pontos Fortes:".into());
        self.text(RIGHT_COLUMN_X, self.y, 10.0, FontWeight::Bold, RED, "Pontos de Melhoria:".into());
        self.y += LINE_HEIGHT;

        let left_width = RIGHT_COLUMN_X - MARGIN_X - 4.0;
        let right_width = PAGE_WIDTH_MM - MARGIN_X - RIGHT_COLUMN_X;
        let left = bullets(&analysis.strengths, left_width);
        let right = bullets(&analysis.weaknesses, right_width);
        for i in 0..left.len().max(right.len()) {
            self.ensure_space(LINE_HEIGHT);
            if let Some(line) = left.get(i) {
                self.text(MARGIN_X, self.y, 10.0, FontWeight::Regular, GREEN, line.clone());
            }
            if let Some(line) = right.get(i) {
                self.text(RIGHT_COLUMN_X, self.y, 10.0, FontWeight::Regular, RED, line.clone());
            }
            self.y += LINE_HEIGHT;
        }
        self.y += 10.0;

        self.ensure_space(LINE_HEIGHT * 3.0);
        self.text(
            MARGIN_X,
            self.y,
            11.0,
            FontWeight::Bold,
            SLATE_800,
            "Sugestão de Descrição Otimizada:".into(),
        );
        self.y += 6.0;
        self.paragraph(
            &render_value(Some(&analysis.description_improvement)),
            MARGIN_X,
            CONTENT_WIDTH,
            9.0,
            SLATE_800,
        );
        self.y += SECTION_GAP;
    }

    fn copy_section(&mut self, copy: &CopywritingResult) {
        self.heading("5. Copywriting & Persuasão", 100.0);
        let titles: Vec<Vec<String>> = copy
            .optimized_titles
            .iter()
            .map(|t| vec![render_value(Some(t))])
            .collect();
        self.table(&["Títulos Otimizados (SEO & Clique)"], &[CONTENT_WIDTH], &titles, GRID);
        self.y += 10.0;
        let bullets: Vec<Vec<String>> = copy
            .bullet_points
            .iter()
            .map(|b| vec![render_value(Some(b))])
            .collect();
        self.table(&["Bullet Points (Benefícios)"], &[CONTENT_WIDTH], &bullets, GRID);
        self.y += SECTION_GAP;
    }

    fn similar_ads_section(&mut self, listing: &ExtractedListing) {
        self.heading("6. Anúncios Semelhantes", 50.0);
        let rows: Vec<Vec<String>> = listing
            .similar_ads
            .iter()
            .map(|ad| vec![render_value(Some(&ad.title)), render_value(Some(&ad.price))])
            .collect();
        self.table(
            &["Título", "Preço"],
            &[CONTENT_WIDTH - 42.0, 42.0],
            &rows,
            TableStyle {
                striped: true,
                ..GRID
            },
        );
        self.y += SECTION_GAP;
    }

    fn insights_section(&mut self, insights: &[String]) {
        self.heading("7. Ações Sugeridas", 50.0);
        for insight in insights {
            let insight = render_value(Some(insight));
            for (i, line) in wrap_text(&insight, CONTENT_WIDTH - 8.0, 10.0).into_iter().enumerate() {
                self.ensure_space(6.0);
                let (x, text) = if i == 0 {
                    (MARGIN_X, format!("[ ] {line}"))
                } else {
                    (MARGIN_X + 8.0, line)
                };
                self.text(x, self.y, 10.0, FontWeight::Regular, SLATE_800, text);
                self.y += 6.0;
            }
        }
    }
}

fn pair(label: &str, value: String) -> Vec<String> {
    vec![label.to_string(), value]
}

fn bullets(items: &[String], width: f32) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| {
            wrap_text(&render_value(Some(item)), width - 4.0, 10.0)
                .into_iter()
                .enumerate()
                .map(|(i, line)| if i == 0 { format!("• {line}") } else { format!("  {line}") })
        })
        .collect()
}

fn row_height(cells: &[String], widths: &[f32], size: f32) -> f32 {
    let lines = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap_text(cell, width - 2.0 * CELL_PADDING, size).len())
        .max()
        .unwrap_or(1);
    lines_height(lines, table_line_height(size)) + 2.0 * CELL_PADDING
}
