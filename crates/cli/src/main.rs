use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use assessments::TestType;
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommend_client::HttpRecommendClient;
use search_view::{FileStore, Phase, SearchView};
use tracing::debug;

mod config;
mod render;
mod repl;

use config::ClientConfig;
use render::Renderer;

/// assess-recs - Assessment Recommendation Client
#[derive(Parser)]
#[command(name = "assess-recs")]
#[command(
    about = "Search the assessment catalog through the recommendation service",
    long_about = None
)]
struct Cli {
    /// Base URL of the recommendation service (overrides config and environment)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single search and print the results
    Search {
        /// Free-text query, e.g. "java developer who can collaborate"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Prefer assessments that support remote testing
        #[arg(long)]
        remote: bool,

        /// Prefer adaptive (IRT) assessments
        #[arg(long)]
        adaptive: bool,

        /// Preferred test type: k (Knowledge), s (Simulation) or p (Personality)
        #[arg(long)]
        test_type: Option<TestType>,
    },

    /// Interactive search session (default)
    Interactive,

    /// Switch between light and dark theme
    Theme,

    /// Check that the recommendation service is up
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing; stdout is reserved for the UI
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref(), cli.endpoint)
        .context("Failed to load configuration")?;
    debug!("Resolved configuration: {:?}", config);

    let client = HttpRecommendClient::new(config.endpoint.clone())
        .context("Failed to create recommendation client")?;
    let view = SearchView::new(client, FileStore::new(&config.storage_path));

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search {
            query,
            remote,
            adaptive,
            test_type,
        } => handle_search(view, query.join(" "), remote, adaptive, test_type).await,
        Commands::Interactive => {
            repl::run(view, Renderer::default()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Theme => handle_theme(view),
        Commands::Health => handle_health(&config).await,
    }
}

/// Handle the 'search' command
async fn handle_search(
    mut view: SearchView<HttpRecommendClient, FileStore>,
    query: String,
    remote: bool,
    adaptive: bool,
    test_type: Option<TestType>,
) -> Result<ExitCode> {
    let mut renderer = Renderer::default();
    view.initialize(&mut renderer);

    view.set_query(query);
    if remote {
        view.toggle_remote();
    }
    if adaptive {
        view.toggle_adaptive();
    }
    if let Some(test_type) = test_type {
        view.select_test_type(test_type);
    }

    println!("{}", renderer.header());
    println!("{}", renderer.filters(view.state().filters()));
    let sent = repl::search_with_progress(&mut view, &renderer, &mut std::io::stdout()).await?;
    if !sent {
        println!("{}", "Nothing to search for.".yellow());
    }

    Ok(ExitCode::from(search_exit_status(view.state().phase())))
}

/// Exit status of the 'search' command: 0 on success (even with no
/// matches), 1 when the search failed, 2 when there was nothing to search.
fn search_exit_status(phase: Phase) -> u8 {
    match phase {
        Phase::Success => 0,
        Phase::Idle => 2,
        Phase::Loading | Phase::Error => 1,
    }
}

/// Handle the 'theme' command
fn handle_theme(mut view: SearchView<HttpRecommendClient, FileStore>) -> Result<ExitCode> {
    let mut renderer = Renderer::default();
    view.initialize(&mut renderer);

    let theme = view
        .toggle_theme(&mut renderer)
        .with_context(|| format!("Failed to save theme to {}", view.store().path().display()))?;
    println!("{} Theme is now {}", "✓".green(), theme.as_str());
    Ok(ExitCode::SUCCESS)
}

/// Handle the 'health' command
async fn handle_health(config: &ClientConfig) -> Result<ExitCode> {
    let client = HttpRecommendClient::new(config.endpoint.clone())?;
    match client.health().await {
        Ok(()) => {
            println!("{} Service at {} is healthy", "✓".green(), client.base_url());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessments::RecommendResponse;
    use search_view::MemoryStore;

    /// Service that fails every request with a 503.
    struct Unreachable;

    impl recommend_client::RecommendationService for Unreachable {
        async fn recommend(
            &self,
            _request: &assessments::RecommendRequest,
        ) -> recommend_client::Result<RecommendResponse> {
            Err(recommend_client::ClientError::Status { status: 503 })
        }
    }

    #[test]
    fn test_search_exit_status_per_phase() {
        assert_eq!(search_exit_status(Phase::Success), 0);
        assert_eq!(search_exit_status(Phase::Error), 1);
        assert_eq!(search_exit_status(Phase::Idle), 2);
    }

    #[tokio::test]
    async fn test_exit_status_after_blank_and_failed_search() {
        let renderer = Renderer::default();
        let mut view = SearchView::new(Unreachable, MemoryStore::new());
        let mut out = Vec::new();

        view.set_query("   ");
        repl::search_with_progress(&mut view, &renderer, &mut out).await.unwrap();
        assert_eq!(search_exit_status(view.state().phase()), 2);

        view.set_query("coding test");
        repl::search_with_progress(&mut view, &renderer, &mut out).await.unwrap();
        assert_eq!(search_exit_status(view.state().phase()), 1);
    }

    #[test]
    fn test_cli_parses_search_flags() {
        let cli = Cli::try_parse_from([
            "assess-recs",
            "search",
            "java",
            "developer",
            "--remote",
            "--test-type",
            "k",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Search {
                query,
                remote,
                adaptive,
                test_type,
            }) => {
                assert_eq!(query.join(" "), "java developer");
                assert!(remote);
                assert!(!adaptive);
                assert_eq!(test_type, Some(TestType::Knowledge));
            }
            _ => panic!("expected search command"),
        }
    }
}
