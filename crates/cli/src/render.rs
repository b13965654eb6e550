//! Terminal rendering of the search view.
//!
//! The renderer is the theme target: toggling the theme swaps the palette
//! used for every later frame.

use assessments::{Assessment, Filters};
use colored::{ColoredString, Colorize};
use search_view::{Lifecycle, ThemePreference, ThemeTarget};

pub const TITLE: &str = "SHL Assessment Recommendation Engine";
pub const PLACEHOLDER: &str = "software engineering coding test";
pub const NO_MATCHES: &str = "No matching assessments.";

#[derive(Debug, Default)]
pub struct Renderer {
    theme: ThemePreference,
}

impl ThemeTarget for Renderer {
    fn apply_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
    }
}

impl Renderer {
    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemePreference::Dark => text.bright_white().bold(),
            ThemePreference::Light => text.black().bold(),
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemePreference::Dark => text.bright_cyan(),
            ThemePreference::Light => text.blue(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemePreference::Dark => text.bright_black(),
            ThemePreference::Light => text.dimmed(),
        }
    }

    fn error(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemePreference::Dark => text.bright_red(),
            ThemePreference::Light => text.red(),
        }
    }

    /// Label of the theme toggle (names the theme it switches to).
    pub fn theme_toggle_label(&self) -> &'static str {
        match self.theme {
            ThemePreference::Dark => "☀️ Light Mode",
            ThemePreference::Light => "🌙 Dark Mode",
        }
    }

    pub fn header(&self) -> String {
        format!(
            "{}  [{}]",
            self.heading(TITLE),
            self.muted(self.theme_toggle_label())
        )
    }

    /// One line summarizing the filters, active ones highlighted.
    pub fn filters(&self, filters: &Filters) -> String {
        let toggle = |label: &str, on: bool| {
            if on {
                format!("[{}]", self.accent(&format!("x {}", label)))
            } else {
                format!("[  {}]", label)
            }
        };
        format!(
            "Filters: {} {} {}",
            toggle("Remote", filters.remote.is_preferred()),
            toggle("Adaptive", filters.adaptive.is_preferred()),
            self.muted(&format!("<{}>", filters.test_type))
        )
    }

    /// Body for the current lifecycle phase.
    pub fn lifecycle(&self, lifecycle: &Lifecycle) -> String {
        match lifecycle {
            Lifecycle::Idle => self
                .muted(&format!("Type a query to search, e.g. \"{}\"", PLACEHOLDER))
                .to_string(),
            Lifecycle::Loading => self.heading("Searching...").to_string(),
            Lifecycle::Error(message) => self.error(message).to_string(),
            Lifecycle::Success(results) if results.is_empty() => {
                self.muted(NO_MATCHES).to_string()
            }
            Lifecycle::Success(results) => results
                .iter()
                .enumerate()
                .map(|(i, item)| self.card(i + 1, item))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    fn card(&self, number: usize, item: &Assessment) -> String {
        let mut lines = vec![format!(
            "{}. {}",
            self.accent(&number.to_string()),
            self.heading(&item.name)
        )];
        if !item.long_description.is_empty() {
            lines.push(format!("   {}", item.long_description));
        }

        let mut meta = format!(
            "Test Type: {} • Remote: {} • Adaptive: {}",
            item.test_type, item.remote_support, item.adaptive_support
        );
        if let Some(score) = item.score {
            meta.push_str(&format!(" • Score: {:.2}", score));
        }
        lines.push(format!("   {}", self.muted(&meta)));

        if !item.url.is_empty() {
            lines.push(format!("   {} {}", self.muted("View Details:"), item.url));
        }
        lines.join("\n")
    }
}
