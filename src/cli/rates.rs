use super::ui;
use crate::build_manager;
use crate::core::config::AppConfig;
use crate::core::currency::SUPPORTED_CODES;
use crate::service::{Resolution, convert_with};
use anyhow::{Context, Result};
use comfy_table::Cell;

impl Resolution {
    /// Renders the mapping as a table of rates per one unit of `base`.
    pub fn display_as_table(&self, base: &str) -> Result<String> {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (per 1 {base})")),
        ]);

        for (code, _) in self.rates.iter() {
            let rate = convert_with(&self.rates, 1.0, base, code)
                .with_context(|| format!("No rate for {base} in the resolved mapping"))?;
            table.add_row(vec![Cell::new(code), ui::rate_cell(rate)]);
        }

        let mut output = format!(
            "Exchange rates for {}\n\n",
            ui::style_text(base, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Source: {} ({} currencies)", self.origin, self.rates.len()),
                ui::StyleType::Subtle
            )
        ));
        Ok(output)
    }
}

/// Resolves and prints the rates for `base`. The single resolution for `base`
/// is the only fetch, so there is no warm-up for the reference currency.
pub async fn run(config: &AppConfig, base: &str) -> Result<()> {
    let manager = build_manager(config)?;
    let pb = ui::new_spinner("Fetching exchange rates...");
    let resolution = manager.resolve(base).await;
    pb.finish_and_clear();

    let resolution = resolution.with_context(|| format!("Failed to resolve rates for {base}"))?;
    println!("{}", resolution.display_as_table(base)?);
    Ok(())
}

/// Prints every supported currency code, twelve per line.
pub fn print_codes() {
    for line in SUPPORTED_CODES.chunks(12) {
        println!("{}", line.join(" "));
    }
}
