use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use conndesign_cli::{
    apply_assignments, describe_document, describe_fields, describe_plugins, describe_settings,
    open_registry, parse_assignment, store_settings, ShellOptions,
};
use conndesign_host::HostSettings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Steel connection design tool panels")]
struct Cli {
    /// Read settings from this file instead of the user configuration.
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Plugin directory to scan; repeat to scan several. Replaces the
    /// configured roots.
    #[arg(long = "plugins", global = true, value_name = "DIR")]
    plugin_roots: Vec<PathBuf>,
    /// Catalog file to compute from instead of the bundled tables.
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Compute on a background worker thread.
    #[arg(long, global = true)]
    background: bool,
    /// Log and ignore invalid field assignments instead of failing.
    #[arg(long, global = true)]
    lenient: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed panels in load order.
    List,
    /// Show a panel's fields, their values and allowed values.
    Fields(PanelArgs),
    /// Compute and print a panel's result.
    Show {
        #[command(flatten)]
        panel: PanelArgs,
        /// Also write the result as HTML to this path.
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },
    /// Print the effective settings after command-line overrides.
    Settings {
        /// Write them to the settings file.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct PanelArgs {
    /// Panel name as printed by `list`.
    plugin: String,
    /// Field assignment, applied in order.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let settings = effective_settings(&cli)?;
    if let Commands::Settings { save } = cli.command {
        print!("{}", describe_settings(&settings));
        if save {
            let path = store_settings(&settings, cli.settings.as_deref())?;
            println!("saved to {}", path.display());
        }
        return Ok(());
    }
    let registry = open_registry(&ShellOptions::from(&settings))?;

    match cli.command {
        Commands::Settings { .. } => {}
        Commands::List => {
            print!("{}", describe_plugins(registry.descriptors()));
        }
        Commands::Fields(panel) => {
            let controller = registry.activate(&panel.plugin)?;
            let mut controller = controller.lock();
            apply_assignments(&mut controller, &panel.assignments)?;
            print!("{}", describe_fields(controller.graph()));
        }
        Commands::Show { panel, html } => {
            let controller = registry.activate(&panel.plugin)?;
            let mut controller = controller.lock();
            apply_assignments(&mut controller, &panel.assignments)?;
            let document = controller.current_document();
            print!("{}", describe_document(document));
            if let Some(path) = html {
                fs::write(&path, document.to_html())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
    }
    Ok(())
}

fn effective_settings(cli: &Cli) -> Result<HostSettings> {
    let mut settings = match &cli.settings {
        Some(path) => HostSettings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => HostSettings::load(),
    };
    if !cli.plugin_roots.is_empty() {
        settings.plugin_roots = cli.plugin_roots.clone();
    }
    if cli.catalog.is_some() {
        settings.catalog_path = cli.catalog.clone();
    }
    if cli.background {
        settings.background_compute = true;
    }
    if cli.lenient {
        settings.strict_field_events = false;
    }
    Ok(settings)
}
