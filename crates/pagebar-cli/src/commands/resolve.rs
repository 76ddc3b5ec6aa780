use anyhow::Result;
use std::io::Write;
use std::path::Path;

use pagebar_core::placement::{PlacementIndex, ViewedPage, resolve_sidebar};
use pagebar_core::sidebar::SidebarId;
use pagebar_infrastructure::ContentCatalog;

use super::Context;

/// A viewed page described on the command line.
pub struct PageQuery {
    pub page: u64,
    pub parent: Option<u64>,
    pub content_type: String,
    pub default: Option<String>,
}

impl PageQuery {
    fn viewed_page(&self) -> ViewedPage {
        let page = ViewedPage::new(self.page, self.content_type.clone());
        match self.parent {
            Some(parent) => page.with_parent(parent),
            None => page,
        }
    }
}

pub fn resolve(ctx: &Context, query: PageQuery, indexed: bool, out: &mut impl Write) -> Result<()> {
    let store = ctx.service.sidebars()?;
    let page = query.viewed_page();
    let default = ctx.default_or(query.default);

    let resolved = if indexed {
        PlacementIndex::build(&store).resolve(&default, Some(&page))?
    } else {
        resolve_sidebar(&store, &default, Some(&page))?
    };

    writeln!(out, "{resolved}")?;
    Ok(())
}

pub fn display(
    ctx: &Context,
    catalog: &Path,
    default: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = ContentCatalog::from_path(catalog)?;
    let resolved = ctx
        .service
        .display_sidebar(&catalog, &ctx.default_or(default))?;
    writeln!(out, "{resolved}")?;
    Ok(())
}

pub fn checklist(
    ctx: &Context,
    id: &str,
    catalog: &Path,
    content_type: &str,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = ContentCatalog::from_path(catalog)?;
    let rows = ctx
        .service
        .checklist(&catalog, &SidebarId::new(id), content_type)?;

    for row in rows {
        let mark = if row.checked { "x" } else { " " };
        writeln!(out, "[{mark}] {}\t{}", row.item.id, row.item.title)?;
    }
    Ok(())
}
