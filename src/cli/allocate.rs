use super::ui;
use crate::core::allocation::{AllocationRow, allocation_rows, parse_investment};
use crate::core::config::AppConfig;
use crate::core::instrument::Instrument;
use crate::core::price::Price;
use crate::core::quotes::PriceLookup;
use crate::providers::yahoo_finance::YahooFinanceProvider;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use std::sync::Arc;

/// Prices the configured instruments and prints the allocation table.
pub async fn run(config: &AppConfig, investment: Option<&str>) -> Result<()> {
    let investment = parse_investment(investment)?;
    let provider = YahooFinanceProvider::new(config.providers.yahoo_base_url())?;
    let lookup = PriceLookup::new(Arc::new(provider));

    let rows = compute(&config.instruments, &lookup, investment).await?;
    display_allocation_table(&rows, investment);
    Ok(())
}

async fn compute(
    instruments: &[Instrument],
    lookup: &PriceLookup,
    investment: Option<f64>,
) -> Result<Vec<AllocationRow>> {
    let pb = ui::new_progress_bar(instruments.len() as u64);
    pb.set_message("Fetching prices...");
    let prices = lookup.lookup_all(instruments, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    Ok(allocation_rows(instruments, &prices?, investment))
}

fn display_allocation_table(rows: &[AllocationRow], investment: Option<f64>) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Stock"),
        ui::header_cell("Ticker"),
        ui::header_cell("Price"),
        ui::header_cell("Weight"),
        ui::header_cell("Amount"),
        ui::header_cell("Quantity"),
    ]);

    for row in rows {
        let price = match row.last_traded_price {
            Price::Known(p) => Some(p),
            Price::Unavailable => None,
        };
        table.add_row(vec![
            Cell::new(&row.stock_name),
            Cell::new(ui::style_text(&row.stock_ticker, ui::StyleType::Subtle)),
            ui::format_optional_cell(price, |p| format!("{p:.2}")),
            Cell::new(format!("{:.2}%", row.allocation_percentage))
                .set_alignment(CellAlignment::Right),
            ui::format_optional_cell(row.allocated_amount, |a| a.to_string()),
            ui::format_optional_cell(row.allocated_quantity, |q| q.to_string()),
        ]);
    }

    println!(
        "\n{}\n",
        ui::style_text("Stock Allocation", ui::StyleType::Title)
    );
    println!("{table}");

    match investment {
        Some(investment) => {
            let allocated: u64 = rows.iter().filter_map(|r| r.allocated_amount).sum();
            println!(
                "\n{} {:.2}, {} {}\n",
                ui::style_text("Investment:", ui::StyleType::TotalLabel),
                investment,
                ui::style_text("Allocated:", ui::StyleType::TotalLabel),
                ui::style_text(&allocated.to_string(), ui::StyleType::TotalValue),
            );
        }
        None => println!("\nPass --investment to compute allocations.\n"),
    }
}
