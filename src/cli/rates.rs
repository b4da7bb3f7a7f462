use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use tracing::info;

use crate::cli::ui;
use crate::config::AppConfig;
use crate::providers::CbrProvider;
use crate::rates::{QuoteSet, RateProvider};
use crate::trace::Tracer;

pub async fn run(config: &AppConfig, codes: Vec<String>) -> Result<()> {
    let codes = if codes.is_empty() {
        config.currencies.clone()
    } else {
        codes
    };
    info!("Fetching rates for {codes:?}");

    let provider = CbrProvider::new(&config.source.base_url);
    let tracer = Tracer::new(super::build_sink(config)?);

    let spinner = ui::new_spinner("Fetching currency rates...");
    let result = tracer
        .call_async("fetch_rates", &(codes.clone(),), provider.fetch_rates(&codes))
        .await;
    spinner.finish_and_clear();

    let quotes = result?;
    println!("{}", display_as_table(&quotes));
    Ok(())
}

fn display_as_table(quotes: &QuoteSet) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);

    for (code, rate) in quotes.iter() {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut output = table.to_string();
    if let Some(as_of) = quotes.as_of() {
        output.push('\n');
        output.push_str(&ui::style_text(
            &format!("Rates as of {}", as_of.format("%Y-%m-%d")),
            ui::StyleType::Subtle,
        ));
    }
    output
}
