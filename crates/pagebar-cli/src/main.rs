use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pagebar_core::sidebar::SidebarId;
use pagebar_infrastructure::ConfigService;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "pagebar")]
#[command(about = "Pagebar CLI - per-page sidebar placement", long_about = None)]
struct Cli {
    /// Sidebar store file (overrides the configured path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (defaults to ~/.config/pagebar/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a sidebar
    Add {
        /// Display name
        name: String,
    },
    /// Delete sidebars (unknown ids are ignored)
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List sidebars in declaration order
    List {
        /// Print the full definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the sidebar for a page
    Resolve {
        /// Viewed item id
        #[arg(long)]
        page: u64,
        /// Parent item id (0 means top-level)
        #[arg(long)]
        parent: Option<u64>,
        /// Content type of the viewed item
        #[arg(long = "type", default_value = "page")]
        content_type: String,
        /// Fallback sidebar (overrides the configured default)
        #[arg(long)]
        default: Option<String>,
        /// Use a prebuilt placement index instead of a scan
        #[arg(long)]
        indexed: bool,
    },
    /// Resolve the sidebar for the viewed page of a content catalog
    Display {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        default: Option<String>,
    },
    /// Assign an item to a sidebar
    Assign {
        id: String,
        item: u64,
        #[arg(long = "type", default_value = "page")]
        content_type: String,
    },
    /// Remove an item from a sidebar
    Unassign {
        id: String,
        item: u64,
        #[arg(long = "type", default_value = "page")]
        content_type: String,
    },
    /// Turn child inheritance on or off
    Cascade { id: String, state: Toggle },
    /// Apply a settings submission read from a TOML file
    Submit { file: PathBuf },
    /// Rewrite a legacy store file in the current layout
    Migrate,
    /// Print widget area registrations as JSON
    Registrations,
    /// Show the assignment checklist of one sidebar
    Checklist {
        id: String,
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long = "type", default_value = "page")]
        content_type: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn is_on(self) -> bool {
        self == Toggle::On
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let settings = config.get_config().context("Failed to load config")?;
    init_tracing(&settings.debug.log_level);

    let store_path = match cli.store {
        Some(path) => path,
        None => config.store_path()?,
    };
    tracing::debug!(store = ?store_path, "Using sidebar store");

    let ctx = Context::new(store_path, SidebarId::new(settings.render.default_sidebar));
    let out = &mut io::stdout().lock();

    match cli.command {
        Commands::Add { name } => commands::sidebar::add(&ctx, &name, out)?,
        Commands::Delete { ids } => commands::sidebar::delete(&ctx, &ids, out)?,
        Commands::List { json } => commands::sidebar::list(&ctx, json, out)?,
        Commands::Resolve {
            page,
            parent,
            content_type,
            default,
            indexed,
        } => {
            let query = commands::resolve::PageQuery {
                page,
                parent,
                content_type,
                default,
            };
            commands::resolve::resolve(&ctx, query, indexed, out)?
        }
        Commands::Display { catalog, default } => {
            commands::resolve::display(&ctx, &catalog, default, out)?
        }
        Commands::Assign {
            id,
            item,
            content_type,
        } => commands::sidebar::assign(&ctx, &id, &content_type, item, true, out)?,
        Commands::Unassign {
            id,
            item,
            content_type,
        } => commands::sidebar::assign(&ctx, &id, &content_type, item, false, out)?,
        Commands::Cascade { id, state } => {
            commands::sidebar::cascade(&ctx, &id, state.is_on(), out)?
        }
        Commands::Submit { file } => commands::sidebar::submit(&ctx, &file, out)?,
        Commands::Migrate => commands::migrate::run(&ctx, out)?,
        Commands::Registrations => commands::sidebar::registrations(&ctx, out)?,
        Commands::Checklist {
            id,
            catalog,
            content_type,
        } => commands::resolve::checklist(&ctx, &id, &catalog, &content_type, out)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "pagebar", "--store", "/tmp/s.toml", "resolve", "--page", "70", "--parent", "7",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.toml")));
        match cli.command {
            Commands::Resolve {
                page,
                parent,
                content_type,
                default,
                indexed,
            } => {
                assert_eq!(page, 70);
                assert_eq!(parent, Some(7));
                assert_eq!(content_type, "page");
                assert!(default.is_none());
                assert!(!indexed);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_cascade_toggle_values() {
        let cli = Cli::try_parse_from(["pagebar", "cascade", "ups-sidebar-1", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cascade { state: Toggle::Off, .. }
        ));

        assert!(Cli::try_parse_from(["pagebar", "cascade", "ups-sidebar-1", "maybe"]).is_err());
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["pagebar", "delete"]).is_err());
    }
}
