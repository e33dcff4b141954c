use std::collections::BTreeSet;

use anyhow::{Context, Result};
use extpack_core::ExtensionId;
use extpack_planner::{UninstallPlanner, UninstallRequest};
use extpack_repository::InstalledStore;

use crate::handlers::BuiltinHandlers;
use crate::render::{self, OutputStyle, PlanProgress};
use crate::{completions, Cli, Commands};

pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Plan {
            specs,
            namespaces,
            verbose,
            json,
        } => {
            if verbose {
                init_tracing();
            }
            let store = InstalledStore::open(&cli.state)?;
            let request = build_request(&specs, &namespaces, verbose)?;
            let handlers = BuiltinHandlers::new();
            let style = if json {
                OutputStyle::Plain
            } else {
                render::current_output_style()
            };

            let progress = PlanProgress::new(style);
            let plan = UninstallPlanner::new(&store, &handlers, &progress, &request).build_plan()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                for line in render::plan_lines(&plan, style) {
                    println!("{line}");
                }
                if let Some(header) = render::section_line(style, "removal order") {
                    println!();
                    println!("{header}");
                }
                for line in render::removal_order_lines(&plan) {
                    println!("{line}");
                }
            }
        }
        Commands::List => {
            let store = InstalledStore::open(&cli.state)?;
            let installed = store.snapshot();
            if installed.is_empty() {
                println!("No installed extensions");
            } else {
                for line in render::installed_lines(&installed) {
                    println!("{line}");
                }
            }
        }
        Commands::Completions { shell } => {
            completions::write_completions(shell);
        }
    }

    Ok(())
}

pub(crate) fn build_request(
    specs: &[String],
    namespaces: &[String],
    verbose: bool,
) -> Result<UninstallRequest> {
    let mut targets = Vec::with_capacity(specs.len());
    for spec in specs {
        let target: ExtensionId = spec
            .parse()
            .with_context(|| format!("invalid extension spec '{spec}'"))?;
        targets.push(target);
    }

    let namespaces = if namespaces.is_empty() {
        None
    } else {
        Some(namespaces.iter().cloned().collect::<BTreeSet<_>>())
    };

    Ok(UninstallRequest {
        targets,
        namespaces,
        verbose,
    })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
