use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use pagebar_core::sidebar::SidebarId;
use pagebar_core::submission::Submission;

use super::Context;

pub fn add(ctx: &Context, name: &str, out: &mut impl Write) -> Result<()> {
    let id = ctx.service.add_sidebar(name)?;
    writeln!(out, "Added {id}")?;
    Ok(())
}

pub fn delete(ctx: &Context, ids: &[String], out: &mut impl Write) -> Result<()> {
    let ids: Vec<SidebarId> = ids.iter().map(SidebarId::new).collect();
    let removed = ctx.service.delete_sidebars(&ids)?;
    writeln!(out, "Deleted {removed} sidebar(s)")?;
    Ok(())
}

pub fn list(ctx: &Context, json: bool, out: &mut impl Write) -> Result<()> {
    let store = ctx.service.sidebars()?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(store.entries())?)?;
        return Ok(());
    }

    if store.is_empty() {
        writeln!(out, "No sidebars")?;
        return Ok(());
    }

    for entry in store.iter() {
        let def = &entry.definition;
        let assigned: Vec<String> = def
            .locations
            .iter()
            .map(|(content_type, ids)| format!("{content_type}:{}", ids.len()))
            .collect();
        writeln!(
            out,
            "{}\t{}\t{}{}",
            entry.id,
            def.name,
            if assigned.is_empty() {
                "-".to_string()
            } else {
                assigned.join(",")
            },
            if def.cascade_to_children { "\tcascade" } else { "" }
        )?;
    }
    Ok(())
}

pub fn assign(
    ctx: &Context,
    id: &str,
    content_type: &str,
    item: u64,
    assigned: bool,
    out: &mut impl Write,
) -> Result<()> {
    let id = SidebarId::new(id);
    ctx.service
        .set_assignment(&id, content_type, item, assigned)?;
    let verb = if assigned { "Assigned" } else { "Unassigned" };
    writeln!(out, "{verb} {content_type} {item} on {id}")?;
    Ok(())
}

pub fn cascade(ctx: &Context, id: &str, enabled: bool, out: &mut impl Write) -> Result<()> {
    let id = SidebarId::new(id);
    ctx.service.set_cascade(&id, enabled)?;
    writeln!(
        out,
        "Cascade {} for {id}",
        if enabled { "on" } else { "off" }
    )?;
    Ok(())
}

pub fn submit(ctx: &Context, file: &Path, out: &mut impl Write) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read submission: {}", file.display()))?;
    let submission: Submission = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse submission: {}", file.display()))?;

    let store = ctx.service.submit(submission)?;
    writeln!(
        out,
        "Saved {} sidebar(s), last id {}",
        store.len(),
        store.last_allocated_id()
    )?;
    Ok(())
}

pub fn registrations(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let registrations = ctx.service.registrations()?;
    writeln!(out, "{}", serde_json::to_string_pretty(&registrations)?)?;
    Ok(())
}
