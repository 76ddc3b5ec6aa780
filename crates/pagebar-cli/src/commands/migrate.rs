use anyhow::{Context as _, Result};
use std::io::Write;

use pagebar_infrastructure::dto::CURRENT_SCHEMA_VERSION;

use super::Context;

pub fn run(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let path = ctx.repository.path().to_path_buf();
    let upgraded = ctx
        .repository
        .upgrade()
        .with_context(|| format!("Failed to migrate {}", path.display()))?;

    match upgraded {
        Some(from) => writeln!(
            out,
            "Migrated {} from {from} to {CURRENT_SCHEMA_VERSION}",
            path.display()
        )?,
        None => writeln!(out, "{} is up to date", path.display())?,
    }
    Ok(())
}
