//! Interactive search loop.
//!
//! A plain line replaces the query and submits it. Lines starting with `:`
//! are commands (see [`HELP`]).

use std::io::{self, Write};

use anyhow::{Context, Result};
use assessments::TestType;
use colored::Colorize;
use recommend_client::RecommendationService;
use search_view::{PreferenceStore, SearchView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::render::Renderer;

pub const HELP: &str = "\
Type a query and press Enter to search.
  :remote            toggle the Remote filter
  :adaptive          toggle the Adaptive filter
  :type <k|s|p|any>  set the test type (Knowledge, Simulation, Personality)
  :search            run the current query again
  :open <N>          open result N in the browser
  :filters           show the active filters
  :theme             switch between light and dark
  :help              show this help
  :quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Resubmit,
    ToggleRemote,
    ToggleAdaptive,
    SelectTestType(TestType),
    Open(usize),
    Filters,
    Theme,
    Help,
    Quit,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Ok(Command::Search(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("remote" | "r", None) => Ok(Command::ToggleRemote),
        ("adaptive" | "a", None) => Ok(Command::ToggleAdaptive),
        ("type" | "t", arg) => arg
            .unwrap_or("")
            .parse::<TestType>()
            .map(Command::SelectTestType)
            .map_err(|e| e.to_string()),
        ("search" | "s", None) => Ok(Command::Resubmit),
        ("open" | "o", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Command::Open(n)),
            _ => Err(format!("Not a result number: {}", n)),
        },
        ("open" | "o", None) => Err("Usage: :open <N>".to_string()),
        ("filters" | "f", None) => Ok(Command::Filters),
        ("theme", None) => Ok(Command::Theme),
        ("help" | "h" | "?", None) => Ok(Command::Help),
        ("quit" | "q" | "exit", None) => Ok(Command::Quit),
        _ => Err(format!("Unknown command ':{}' (try :help)", rest.trim())),
    }
}

/// Submit the current query, writing the Loading frame and then the outcome.
///
/// Writes nothing when the query is blank. Returns whether a request was sent.
pub async fn search_with_progress<S, P, W>(
    view: &mut SearchView<S, P>,
    renderer: &Renderer,
    out: &mut W,
) -> io::Result<bool>
where
    S: RecommendationService,
    P: PreferenceStore,
    W: Write,
{
    let mut loading_written = Ok(());
    let sent = view
        .submit_observed(|lifecycle| {
            loading_written = writeln!(out, "{}", renderer.lifecycle(lifecycle))
                .and_then(|()| out.flush());
        })
        .await;
    loading_written?;

    if sent {
        writeln!(out, "{}", renderer.lifecycle(view.lifecycle()))?;
    }
    Ok(sent)
}

/// Open the URL of the 1-based result `number` in a new browser window.
fn open_result<S, P>(view: &SearchView<S, P>, number: usize) -> std::result::Result<String, String>
where
    S: RecommendationService,
    P: PreferenceStore,
{
    let item = view
        .lifecycle()
        .results()
        .get(number - 1)
        .ok_or_else(|| format!("No result #{}", number))?;
    if item.url.is_empty() {
        return Err(format!("Result #{} has no link", number));
    }
    open::that_detached(&item.url).map_err(|e| format!("Could not open {}: {}", item.url, e))?;
    Ok(item.url.clone())
}

/// Run the loop until `:quit` or end of input.
pub async fn run<S, P>(mut view: SearchView<S, P>, mut renderer: Renderer) -> Result<()>
where
    S: RecommendationService,
    P: PreferenceStore,
{
    view.initialize(&mut renderer);
    println!("{}", renderer.header());
    println!("{}", renderer.filters(view.state().filters()));
    println!("{}", renderer.lifecycle(view.lifecycle()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.yellow());
                continue;
            }
        };

        match command {
            Command::Search(query) => {
                view.set_query(query);
                search_with_progress(&mut view, &renderer, &mut io::stdout()).await?;
            }
            Command::Resubmit => {
                search_with_progress(&mut view, &renderer, &mut io::stdout()).await?;
            }
            Command::ToggleRemote => {
                view.toggle_remote();
                println!("{}", renderer.filters(view.state().filters()));
            }
            Command::ToggleAdaptive => {
                view.toggle_adaptive();
                println!("{}", renderer.filters(view.state().filters()));
            }
            Command::SelectTestType(test_type) => {
                view.select_test_type(test_type);
                println!("{}", renderer.filters(view.state().filters()));
            }
            Command::Open(number) => match open_result(&view, number) {
                Ok(url) => println!("Opened {}", url),
                Err(message) => println!("{}", message.yellow()),
            },
            Command::Filters => println!("{}", renderer.filters(view.state().filters())),
            Command::Theme => {
                if let Err(e) = view.toggle_theme(&mut renderer) {
                    warn!("Theme not saved: {}", e);
                    println!("{}", "Theme changed but could not be saved.".yellow());
                }
                println!("{}", renderer.header());
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}
