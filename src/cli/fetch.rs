use super::ui;
use crate::core::config::EnvironmentTable;
use crate::core::error::ExportError;
use crate::core::{ChartRange, PriceProvider, PriceRecord};
use crate::export::{self, DateStyle, QuickenRecord};
use crate::providers::iex::IexProvider;
use crate::symbols::collect_symbols;
use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::Cell;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub env_file: PathBuf,
    pub environment: String,
    pub symbols: Vec<String>,
    pub symbols_file: Option<PathBuf>,
    pub range: ChartRange,
    /// Exact output file; when unset a timestamped name under `output_dir` is used.
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub date_style: DateStyle,
}

#[derive(Debug, Clone)]
pub struct SymbolSummary {
    pub symbol: String,
    pub count: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub environment: String,
    pub output_path: PathBuf,
    pub records: Vec<QuickenRecord>,
    pub symbols: Vec<SymbolSummary>,
}

/// Fetches each symbol in turn. The first failure ends the run.
pub async fn fetch_all(
    provider: &dyn PriceProvider,
    symbols: &[String],
    range: ChartRange,
) -> Result<Vec<PriceRecord>, ExportError> {
    let pb = ui::new_progress_bar(symbols.len() as u64);
    let mut prices = Vec::new();

    for symbol in symbols {
        pb.set_message(symbol.clone());
        let history = match provider.fetch_history(symbol, range).await {
            Ok(history) => history,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };
        debug!("Fetched {} prices for {}", history.len(), symbol);
        prices.extend(history);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(prices)
}

fn summarize(symbols: &[String], prices: &[PriceRecord]) -> Vec<SymbolSummary> {
    symbols
        .iter()
        .map(|symbol| {
            let dates: Vec<&str> = prices
                .iter()
                .filter(|p| &p.symbol == symbol)
                .filter_map(|p| p.date.as_deref())
                .collect();
            SymbolSummary {
                symbol: symbol.clone(),
                count: prices.iter().filter(|p| &p.symbol == symbol).count(),
                first_date: dates.iter().min().map(|d| d.to_string()),
                last_date: dates.iter().max().map(|d| d.to_string()),
            }
        })
        .collect()
}

/// Runs the whole export: environment, fetch, transform, write.
///
/// Nothing is written unless every symbol was fetched and every record converted.
pub async fn run(opts: &FetchOptions) -> Result<ExportSummary> {
    info!("Loading environment file...");
    let table = EnvironmentTable::load_from_path(&opts.env_file)?;
    let env = table.select(&opts.environment)?;
    info!(
        environment = %env.name,
        base_url = %env.base_url,
        token = %env.masked_token(),
        "Environment selected"
    );

    let symbols = collect_symbols(&opts.symbols, opts.symbols_file.as_deref())?;
    if symbols.is_empty() {
        bail!("No ticker symbols given; pass them as arguments or with --symbols-file");
    }
    info!("There are {} stocks to process", symbols.len());

    let provider = IexProvider::new(&env.base_url, &env.token)?;
    let prices = fetch_all(&provider, &symbols, opts.range).await?;
    if prices.is_empty() {
        warn!("The API returned no prices for any symbol");
    }

    let records = export::transform(&prices, opts.date_style)?;

    let output_path = opts.output.clone().unwrap_or_else(|| {
        export::default_output_path(&opts.output_dir, Local::now().naive_local())
    });
    export::write_records(&output_path, &records)?;
    info!(
        "Wrote {} prices to {}",
        records.len(),
        output_path.display()
    );

    Ok(ExportSummary {
        environment: env.name.clone(),
        output_path,
        symbols: summarize(&symbols, &prices),
        records,
    })
}

impl ExportSummary {
    pub fn display(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Symbol"),
            ui::header_cell("Prices"),
            ui::header_cell("From"),
            ui::header_cell("To"),
        ]);

        for summary in &self.symbols {
            table.add_row(vec![
                Cell::new(&summary.symbol),
                ui::number_cell(summary.count),
                ui::optional_cell(summary.first_date.as_deref()),
                ui::optional_cell(summary.last_date.as_deref()),
            ]);
        }

        let mut output = format!(
            "Environment: {}\n\n",
            ui::style_text(&self.environment, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nWrote {} prices to {}",
            ui::style_text(&self.records.len().to_string(), ui::StyleType::Highlight),
            ui::style_text(&self.output_path.display().to_string(), ui::StyleType::Subtle)
        ));
        output
    }
}
