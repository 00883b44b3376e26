//! a11yboard CLI: serve the dashboard, or render the accessibility run view
//! in the terminal.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use a11yboard_cli::http::HttpBackend;
use a11yboard_cli::{parse_params, render, resolve_config, save_artifacts, search_for};
use a11yboard_core::driver::{load_result_artifacts, load_view};
use a11yboard_core::{ArtifactBody, ArtifactTab, Backend, DashboardConfig, RunState, RunView};
use a11yboard_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(
    name = "a11yboard",
    about = "Accessibility run view for test-reporting dashboards",
    version,
    author
)]
struct Cli {
    /// YAML config file (server_url, project, page_size)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the backend API
    #[arg(long, global = true, env = "A11YBOARD_SERVER_URL")]
    server_url: Option<String>,
    /// Project sent with widget requests
    #[arg(long, global = true, env = "A11YBOARD_PROJECT")]
    project: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(long, short, default_value_t = 8000)]
        port: u16,
    },
    /// Show a run's overview: summary counts and accessibility ratios
    Run {
        run_id: String,
    },
    /// List the accessibility results of a run
    Results {
        run_id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Defaults to page_size from the config
        #[arg(long)]
        page_size: Option<u32>,
        /// Extra filter, e.g. `result[ne]=passed` (repeatable)
        #[arg(long = "filter", short)]
        filters: Vec<String>,
    },
    /// List (and optionally save) the artifacts of a run or result
    Artifacts {
        id: String,
        /// Treat the id as a result id instead of a run id
        #[arg(long)]
        result: bool,
        /// Write viewable artifacts into this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Query a legacy widget endpoint and print its JSON
    Widget {
        name: String,
        /// Widget parameter `key=value` (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.server_url, cli.project)?;

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port).await?;
        }
        Commands::Run { run_id } => {
            cmd_run(&config, &run_id).await?;
        }
        Commands::Results {
            run_id,
            page,
            page_size,
            filters,
        } => {
            let page_size = page_size.unwrap_or(config.page_size);
            cmd_results(&config, &run_id, page, page_size, &filters).await?;
        }
        Commands::Artifacts { id, result, save } => {
            cmd_artifacts(&config, &id, result, save).await?;
        }
        Commands::Widget { name, params } => {
            cmd_widget(&config, &name, &params).await?;
        }
    }

    Ok(())
}

// ─── Command implementations ──────────────────────────────────────────────────

async fn cmd_serve(config: DashboardConfig, host: String, port: u16) -> Result<()> {
    println!("a11yboard dashboard");
    println!("   Backend: {}", config.server_url);
    println!("   URL:     http://{}:{}", host, port);
    println!();

    serve(ServerConfig {
        host,
        port,
        dashboard: config,
    })
    .await
}

async fn cmd_run(config: &DashboardConfig, run_id: &str) -> Result<()> {
    let backend = HttpBackend::new(config);
    let search = search_for(run_id, 1, config.page_size, &[])?;
    let view = with_spinner("Loading run", load_view(&backend, &search, "#overview")).await;
    let run = loaded_run(&view, run_id)?;

    println!("{}", render::overview(run, view.pie()));
    println!();
    println!("── Artifacts ({}) ──────────────────────", view.artifact_tabs().len());
    println!("{}", render::artifacts(&view, backend.urls()));
    Ok(())
}

async fn cmd_results(
    config: &DashboardConfig,
    run_id: &str,
    page: u32,
    page_size: u32,
    filters: &[String],
) -> Result<()> {
    let backend = HttpBackend::new(config);
    let search = search_for(run_id, page, page_size, filters)?;
    let view = with_spinner("Loading results", load_view(&backend, &search, "#results-list")).await;
    loaded_run(&view, run_id)?;

    if view.table().is_error() {
        anyhow::bail!("Error fetching result data for run {}", run_id);
    }
    println!("{}", render::results(&view));
    Ok(())
}

async fn cmd_artifacts(
    config: &DashboardConfig,
    id: &str,
    for_result: bool,
    save: Option<PathBuf>,
) -> Result<()> {
    let backend = HttpBackend::new(config);

    let tabs: Vec<ArtifactTab> = if for_result {
        with_spinner("Loading artifacts", load_result_artifacts(&backend, id)).await?
    } else {
        let search = search_for(id, 1, config.page_size, &[])?;
        let view = with_spinner("Loading artifacts", load_view(&backend, &search, "#run-object")).await;
        loaded_run(&view, id)?;
        view.artifact_tabs().to_vec()
    };

    if tabs.is_empty() {
        println!("No viewable artifacts for {}", id);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Id", "Filename", "Kind", "Download"]);
    for tab in &tabs {
        let kind = match tab.body {
            ArtifactBody::Text(_) => "text",
            ArtifactBody::Image { .. } => "image",
        };
        table.add_row([
            tab.artifact.id.as_str(),
            tab.title(),
            kind,
            backend.urls().artifact_download(&tab.artifact.id).as_str(),
        ]);
    }
    println!("{}", table);

    if let Some(dir) = save {
        for path in save_artifacts(&dir, &tabs)? {
            println!("  ✓ Saved {}", path.display());
        }
    }
    Ok(())
}

async fn cmd_widget(config: &DashboardConfig, name: &str, params: &[String]) -> Result<()> {
    let backend = HttpBackend::new(config);
    let params = parse_params(params)?;
    let data = with_spinner("Loading widget", backend.get_widget(name, &params)).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

// ─── Utilities ────────────────────────────────────────────────────────────────

async fn with_spinner<F: Future>(message: &'static str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

fn loaded_run<'a>(view: &'a RunView, run_id: &str) -> Result<&'a a11yboard_core::Run> {
    match view.run_state() {
        RunState::Loaded(run) => Ok(run.as_ref()),
        RunState::Failed(msg) => anyhow::bail!("Could not load run {}: {}", run_id, msg),
        RunState::Loading => anyhow::bail!("Run {} did not finish loading", run_id),
    }
}
