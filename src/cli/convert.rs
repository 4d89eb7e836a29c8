use super::ui;
use crate::build_converter;
use crate::core::cache::RateOrigin;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};

/// Formats a conversion result line, e.g. `100.00 USD = 92.00 EUR`.
pub fn format_conversion(amount: f64, from: &str, converted: f64, to: &str) -> String {
    format!(
        "{} = {}",
        ui::style_text(&format!("{amount:.2} {from}"), ui::StyleType::TotalLabel),
        ui::style_text(&format!("{converted:.2} {to}"), ui::StyleType::TotalValue)
    )
}

pub async fn run(config: &AppConfig, amount: f64, from: &str, to: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let converter = build_converter(config)
        .await
        .inspect_err(|_| pb.finish_and_clear())?;
    let result = converter.convert(amount, from, to).await;
    pb.finish_and_clear();

    let converted =
        result.with_context(|| format!("Failed to convert {amount} {from} to {to}"))?;
    println!("{}", format_conversion(amount, from, converted, to));

    if let Some(cached) = converter.manager().cache().current().await {
        if cached.origin != RateOrigin::Live {
            println!(
                "{}",
                ui::style_text(
                    &format!("Live rates unavailable, used {} rates", cached.origin),
                    ui::StyleType::Warning
                )
            );
        }
    }
    Ok(())
}
