//! Terminal rendering for estimates, history and details

use crate::pricing::{EstimateDetails, EstimateResult, HistoryEntry};
use chrono::{DateTime, Local, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Costs are always shown with two decimals
pub fn format_cost(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Spinner shown while a pricing call is outstanding
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn estimate_table(result: &EstimateResult, currency: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Type", "Name", "Region", "Units", "Unit cost", "Cost"]);
    for item in &result.breakdown {
        table.add_row(vec![
            Cell::new(&item.resource_type),
            Cell::new(&item.name),
            Cell::new(&item.region),
            right(item.units.to_string()),
            right(format!("{}{}", currency, format_cost(item.unit_cost))),
            right(format!("{}{}", currency, format_cost(item.cost))),
        ]);
    }
    table
}

pub fn render_estimate(result: &EstimateResult, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Cost Estimate").bold()));
    out.push_str(&estimate_table(result, currency).to_string());
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        style(format!("Total: {}{}", currency, format_cost(result.total_cost))).bold()
    ));
    out
}

pub fn render_history(entries: &[HistoryEntry], currency: &str) -> String {
    if entries.is_empty() {
        return "No history found.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Estimate", "Timestamp", "Total"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(format!("Estimate #{}", entry.id)),
            Cell::new(format_timestamp(&entry.timestamp)),
            right(format!("{}{}", currency, format_cost(entry.total_cost))),
        ]);
    }
    format!("{}\n", table)
}

pub fn render_details(details: &EstimateDetails, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Estimate Details").bold()));
    out.push_str(&format!("Estimate ID: {}\n", details.id));
    out.push_str(&format!("Timestamp:   {}\n", format_timestamp(&details.timestamp)));
    out.push_str(&format!(
        "Total Cost:  {}{}\n",
        currency,
        format_cost(details.total_cost)
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Type", "Name", "Region", "Units", "Unit cost", "Cost", "Share"]);
    for item in &details.items {
        table.add_row(vec![
            Cell::new(&item.resource_type),
            Cell::new(&item.name),
            Cell::new(&item.region),
            right(item.units.to_string()),
            right(format!("{}{}", currency, format_cost(item.unit_cost))),
            right(format!("{}{}", currency, format_cost(item.total_cost))),
            right(format!("{:.0}%", details.share_of_total(item))),
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{BreakdownItem, DetailItem, EstimateId};
    use chrono::TimeZone;

    fn sample_estimate() -> EstimateResult {
        EstimateResult {
            total_cost: 40.0,
            breakdown: vec![BreakdownItem {
                resource_type: "Compute".to_string(),
                name: "db.t3.micro".to_string(),
                region: "us-east-1".to_string(),
                units: 2,
                unit_cost: 20.0,
                cost: 40.0,
            }],
        }
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(40.0), "40.00");
        assert_eq!(format_cost(0.126), "0.13");
        assert_eq!(format_cost(1234.5), "1234.50");
    }

    #[test]
    fn test_render_estimate_total() {
        let out = console::strip_ansi_codes(&render_estimate(&sample_estimate(), "$")).to_string();
        assert!(out.contains("Total: $40.00"));
        assert!(out.contains("db.t3.micro"));
        assert!(out.contains("$20.00"));
    }

    #[test]
    fn test_render_history_empty() {
        assert_eq!(render_history(&[], "$"), "No history found.\n");
    }

    #[test]
    fn test_render_history_rows() {
        let entries = vec![HistoryEntry {
            id: EstimateId::Number(12),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            total_cost: 7.5,
        }];
        let out = render_history(&entries, "€");
        assert!(out.contains("Estimate #12"));
        assert!(out.contains("€7.50"));
    }

    #[test]
    fn test_render_details_share() {
        let details = EstimateDetails {
            id: EstimateId::Text("e-1".to_string()),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            total_cost: 40.0,
            items: vec![
                DetailItem {
                    resource_type: "Compute".to_string(),
                    name: "a".to_string(),
                    region: "us-east-1".to_string(),
                    units: 1,
                    unit_cost: 10.0,
                    total_cost: 10.0,
                },
                DetailItem {
                    resource_type: "Storage".to_string(),
                    name: "b".to_string(),
                    region: "us-east-1".to_string(),
                    units: 3,
                    unit_cost: 10.0,
                    total_cost: 30.0,
                },
            ],
        };
        let out = console::strip_ansi_codes(&render_details(&details, "$")).to_string();
        assert!(out.contains("Estimate ID: e-1"));
        assert!(out.contains("Total Cost:  $40.00"));
        assert!(out.contains("25%"));
        assert!(out.contains("75%"));
    }
}
