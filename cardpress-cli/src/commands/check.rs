//! `cardpress check` — row-by-row deck report without writing anything.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use cardpress_build::{check_deck, CheckReport, RowStatus};
use cardpress_svg::TemplateStore;

use super::super::DeckArgs;

/// Arguments for `cardpress check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub deck: DeckArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let (_config, paths) = self.deck.resolve()?;

        let csv = std::fs::read_to_string(&paths.data)
            .with_context(|| format!("cannot read deck '{}'", paths.data.display()))?;
        let table = cardpress_core::Table::parse(&csv)
            .with_context(|| format!("cannot parse deck '{}'", paths.data.display()))?;
        let mut store = TemplateStore::new(&paths.templates);

        let report = check_deck(&table, &mut store);
        if self.json {
            print_json(&report)?;
        } else {
            print_table(&report);
        }

        if !report.is_clean() {
            bail!(
                "{} of {} row(s) cannot build",
                report.failed(),
                report.rows.len()
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CheckReportJson {
    summary: CheckSummaryJson,
    rows: Vec<CheckRowJson>,
}

#[derive(Serialize)]
struct CheckSummaryJson {
    rows: usize,
    ready: usize,
    duplicates: usize,
    failed: usize,
    notes: usize,
}

#[derive(Serialize)]
struct CheckRowJson {
    line: u64,
    card: String,
    template: String,
    copies: u32,
    status: String,
    detail: String,
    notes: Vec<String>,
}

#[derive(Tabled)]
struct CheckTableRow {
    #[tabled(rename = "line")]
    line: u64,
    #[tabled(rename = "card")]
    card: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "copies")]
    copies: u32,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_json(report: &CheckReport) -> Result<()> {
    let payload = CheckReportJson {
        summary: CheckSummaryJson {
            rows: report.rows.len(),
            ready: report.ready(),
            duplicates: report.duplicates(),
            failed: report.failed(),
            notes: report.notes(),
        },
        rows: report
            .rows
            .iter()
            .map(|row| CheckRowJson {
                line: row.line,
                card: row.name.to_string(),
                template: row.template.to_string(),
                copies: row.copies,
                status: status_key(&row.status).to_string(),
                detail: status_detail(&row.status),
                notes: row.notes.clone(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize check JSON")?
    );
    Ok(())
}

fn print_table(report: &CheckReport) {
    println!(
        "Cardpress v{} | {} row(s) | {} ready | {} duplicate | {} failed",
        env!("CARGO_PKG_VERSION"),
        report.rows.len(),
        report.ready(),
        report.duplicates(),
        report.failed(),
    );

    if report.rows.is_empty() {
        println!("Deck has no rows.");
        return;
    }

    let table_rows: Vec<CheckTableRow> = report
        .rows
        .iter()
        .map(|row| CheckTableRow {
            line: row.line,
            card: row.name.to_string(),
            template: row.template.to_string(),
            copies: row.copies,
            status: status_label(&row.status).to_string(),
            detail: status_detail(&row.status),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    for row in &report.rows {
        for note in &row.notes {
            println!("{}", format!("  note: {}: {}", row.name, note).yellow());
        }
    }

    if report.failed() > 0 {
        println!("Fix the failed rows and re-run 'cardpress check'.");
    }
}

fn status_key(status: &RowStatus) -> &'static str {
    match status {
        RowStatus::Ready => "ready",
        RowStatus::DuplicateName => "duplicate",
        RowStatus::Failed(_) => "failed",
    }
}

fn status_label(status: &RowStatus) -> &'static str {
    match status {
        RowStatus::Ready => "READY",
        RowStatus::DuplicateName => "DUPLICATE",
        RowStatus::Failed(_) => "FAILED",
    }
}

fn status_detail(status: &RowStatus) -> String {
    match status {
        RowStatus::Ready => String::new(),
        RowStatus::DuplicateName => "earlier row claimed this name".to_string(),
        RowStatus::Failed(message) => message.clone(),
    }
}
