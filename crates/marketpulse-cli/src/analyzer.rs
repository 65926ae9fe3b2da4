//! Listing analyzer commands: extraction, scoring, copywriting, the
//! calculator and report export.
//!
//! Every handler loads the persisted session, applies its task and saves
//! the session back, so the steps can run as separate invocations.

use clap::Subcommand;
use marketpulse_core::{Platform, Session};
use rust_decimal::Decimal;

use crate::context::AppContext;
use crate::output::{
    self, alert, emit, ANALYSIS_FAILED, COPY_FAILED, EXPORT_FAILED, EXTRACTION_FAILED,
};

/// Sub-commands available under `calc`.
#[derive(Debug, Subcommand)]
pub enum CalcCommands {
    /// Profit and margin for one sale; given values are kept in the session
    Margin {
        /// Sale price, e.g. "R$ 199,90" (defaults to the form price)
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        cost: Option<Decimal>,
        /// Tax rate in percent
        #[arg(long)]
        tax: Option<Decimal>,
        /// Platform commission in percent
        #[arg(long)]
        fee: Option<Decimal>,
        #[arg(long)]
        shipping: Option<Decimal>,
    },
    /// ROAS and ACoS for an ad campaign
    Roas {
        #[arg(long)]
        spend: Option<Decimal>,
        #[arg(long)]
        revenue: Option<Decimal>,
    },
}

/// Sub-commands available under `export`.
#[derive(Debug, Subcommand)]
pub enum ExportCommands {
    /// Paginated PDF report
    Pdf,
    /// Multi-sheet XLSX workbook
    Xlsx,
}

/// Sub-commands available under `session`.
#[derive(Debug, Subcommand)]
pub enum SessionCommands {
    /// Print the current session
    Show,
    /// Discard the listing and results, keeping calculator rates
    Clear,
}

/// Form fields given on the command line for `analyze`.
#[derive(Debug, Default)]
pub(crate) struct FormOverrides {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) price: Option<String>,
    pub(crate) platform: Option<Platform>,
}

impl FormOverrides {
    fn apply(self, session: &mut Session) {
        if let Some(title) = self.title {
            session.form.title = title;
        }
        if let Some(description) = self.description {
            session.form.description = description;
        }
        if let Some(price) = self.price {
            session.form.price = price;
        }
        if let Some(platform) = self.platform {
            session.form.platform = platform;
        }
    }
}

/// Extracts `url` into a fresh session.
///
/// Market context for the extracted title is fetched in a background task
/// while the listing is printed; a failure there is logged and the session
/// is saved without trends.
///
/// # Errors
///
/// Returns the extraction alert if the listing cannot be extracted; the
/// session is still saved (cleared) so the form can be filled by hand.
pub(crate) async fn run_extract(ctx: &AppContext, url: &str) -> anyhow::Result<()> {
    let client = ctx.gemini()?;
    let mut session = ctx.load_session()?;
    session.begin_extraction(url);

    let listing = match client.extract_listing(url).await {
        Ok(listing) => listing,
        Err(e) => {
            ctx.save_session(&session)?;
            return Err(alert("extract", EXTRACTION_FAILED, e));
        }
    };
    session.apply_extraction(listing);

    let trends_client = client.clone();
    let title = session.form.title.clone();
    let trends_task = tokio::spawn(async move { trends_client.analyze_trends(&title).await });

    if let Some(listing) = &session.listing {
        emit(ctx.json, listing, output::render_listing)?;
    }

    match trends_task.await {
        Ok(Ok(trends)) => session.trends = Some(trends),
        Ok(Err(e)) => tracing::warn!(error = %e, "market context unavailable"),
        Err(e) => tracing::warn!(error = %e, "market context task failed"),
    }

    ctx.save_session(&session)
}

/// Scores the form listing and stores the analysis.
///
/// # Errors
///
/// Returns an error if the title is empty, or the analysis alert if the
/// service call fails.
pub(crate) async fn run_analyze(ctx: &AppContext, overrides: FormOverrides) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    overrides.apply(&mut session);
    if session.form.title.trim().is_empty() {
        anyhow::bail!("Informe ao menos o título do anúncio (--title).");
    }

    let client = ctx.gemini()?;
    let form = &session.form;
    let analysis = client
        .analyze_listing(&form.title, &form.description, &form.price, form.platform)
        .await
        .map_err(|e| alert("analyze", ANALYSIS_FAILED, e))?;

    emit(ctx.json, &analysis, output::render_analysis)?;
    session.analysis = Some(analysis);
    ctx.save_session(&session)
}

/// Generates copy for the extracted listing.
///
/// # Errors
///
/// Returns an error if no listing was extracted, or the copy alert if the
/// service call fails.
pub(crate) async fn run_copy(ctx: &AppContext) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    let Some(listing) = &session.listing else {
        anyhow::bail!("Extraia um anúncio antes de gerar copy: marketpulse extract <url>");
    };

    let copy = ctx
        .gemini()?
        .generate_copywriting(listing)
        .await
        .map_err(|e| alert("copy", COPY_FAILED, e))?;

    emit(ctx.json, &copy, output::render_copy)?;
    session.copy = Some(copy);
    ctx.save_session(&session)
}

/// # Errors
///
/// Returns an error if the session cannot be loaded or saved, or when the
/// sale price does not parse or the inputs are out of range.
pub(crate) fn run_calc(ctx: &AppContext, command: CalcCommands) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    match command {
        CalcCommands::Margin {
            price,
            cost,
            tax,
            fee,
            shipping,
        } => {
            if let Some(price) = price {
                session.form.price = price;
            }
            let calculator = &mut session.calculator;
            calculator.cost_price = cost.unwrap_or(calculator.cost_price);
            calculator.tax_rate = tax.unwrap_or(calculator.tax_rate);
            calculator.platform_fee = fee.unwrap_or(calculator.platform_fee);
            calculator.shipping_cost = shipping.unwrap_or(calculator.shipping_cost);
            ctx.save_session(&session)?;

            let Some(margin) = session.margin() else {
                anyhow::bail!(
                    "Preço de venda inválido ou valores fora do intervalo: informe --price, ex. \"R$ 199,90\"."
                );
            };
            emit(ctx.json, &margin, output::render_margin)
        }
        CalcCommands::Roas { spend, revenue } => {
            let calculator = &mut session.calculator;
            calculator.ad_spend = spend.unwrap_or(calculator.ad_spend);
            calculator.ad_revenue = revenue.unwrap_or(calculator.ad_revenue);
            ctx.save_session(&session)?;
            emit(ctx.json, &session.ad_efficiency(), output::render_ad_efficiency)
        }
    }
}

/// # Errors
///
/// Returns the export alert if the report cannot be rendered or written.
pub(crate) fn run_export(ctx: &AppContext, command: &ExportCommands) -> anyhow::Result<()> {
    let session = ctx.load_session()?;
    let dir = &ctx.config.export_dir;
    let written = match command {
        ExportCommands::Pdf => marketpulse_export::export_pdf(&session, dir),
        ExportCommands::Xlsx => marketpulse_export::export_xlsx(&session, dir),
    }
    .map_err(|e| alert("export", EXPORT_FAILED, e))?;

    match written {
        Some(path) => {
            tracing::info!(path = %path.display(), "report exported");
            println!("Relatório salvo em {}", path.display());
        }
        None => println!("Nenhum anúncio extraído para exportar."),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the session cannot be loaded or saved.
pub(crate) fn run_session(ctx: &AppContext, command: &SessionCommands) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    match command {
        SessionCommands::Show => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                print!("{}", render_session(&session));
            }
            Ok(())
        }
        SessionCommands::Clear => {
            session.clear();
            ctx.save_session(&session)?;
            println!("Sessão limpa.");
            Ok(())
        }
    }
}

fn render_session(session: &Session) -> String {
    let done = |present: bool| if present { "sim" } else { "não" };
    let mut out = String::new();
    out.push_str(&format!(
        "URL: {}\n",
        session.source_url.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("Título: {}\n", session.form.title));
    out.push_str(&format!("Preço: {}\n", session.form.price));
    out.push_str(&format!("Plataforma: {}\n", session.form.platform));
    out.push_str(&format!("Análise: {}\n", done(session.analysis.is_some())));
    out.push_str(&format!("Tendências: {}\n", done(session.trends.is_some())));
    out.push_str(&format!("Copy: {}\n", done(session.copy.is_some())));
    match session.margin() {
        Some(margin) => out.push_str(&format!(
            "Margem: {} (lucro {})\n",
            margin.display_margin(),
            output::brl(margin.profit)
        )),
        None => out.push_str("Margem: -\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut session = Session::default();
        session.form.title = "Antigo".into();
        session.form.price = "R$ 10,00".into();

        FormOverrides {
            title: Some("Novo".into()),
            platform: Some(Platform::Shopee),
            ..FormOverrides::default()
        }
        .apply(&mut session);

        assert_eq!(session.form.title, "Novo");
        assert_eq!(session.form.price, "R$ 10,00");
        assert_eq!(session.form.platform, Platform::Shopee);
    }

    #[test]
    fn session_summary_marks_missing_results() {
        let mut session = Session::default();
        session.begin_extraction("https://produto.mercadolivre.com.br/MLB-1");
        let text = render_session(&session);
        assert!(text.contains("URL: https://produto.mercadolivre.com.br/MLB-1"));
        assert!(text.contains("Análise: não"));
        assert!(text.contains("Margem: -"));
    }
}
