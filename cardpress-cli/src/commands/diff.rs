//! `cardpress diff` — unified diffs of what a build would change.

use anyhow::{Context, Result};
use clap::Args;

use cardpress_build::deck_diff;
use cardpress_core::Table;
use cardpress_svg::TemplateStore;

use super::super::DeckArgs;

/// Arguments for `cardpress diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub deck: DeckArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let (_config, paths) = self.deck.resolve()?;

        let csv = std::fs::read_to_string(&paths.data)
            .with_context(|| format!("cannot read deck '{}'", paths.data.display()))?;
        let table = Table::parse(&csv)
            .with_context(|| format!("cannot parse deck '{}'", paths.data.display()))?;
        let mut store = TemplateStore::new(&paths.templates);

        let result = deck_diff(&table, &mut store, &paths.output)
            .with_context(|| format!("diff failed for '{}'", paths.data.display()))?;

        if result.diffs.is_empty() {
            println!(
                "No differences across {} card(s) in '{}'.",
                result.cards,
                paths.output.display()
            );
            return Ok(());
        }

        for diff in result.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
