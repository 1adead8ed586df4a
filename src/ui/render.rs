//! ui::render
//!
//! Text rendering of the repository model for the terminal.
//!
//! Coloring goes through [`Palette`], which carries its own enabled flag.
//! Nothing here touches process-wide color state, so two palettes with
//! different settings can coexist.

use chrono::{DateTime, FixedOffset, Utc};
use colored::Color;

use crate::git::{DeltaStatus, DiffDelta};
use crate::repo::{Branch, Commit, CommitType, Remote};

/// ANSI styling with an explicit on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
        } else {
            text.to_string()
        }
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }
}

/// Humanized time between `when` and `now`.
///
/// Times in the future, and anything under a minute old, read "just now".
pub fn since(when: &DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(when.with_timezone(&Utc)).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let (count, unit) = match secs {
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Fixed-width tag for a commit's classification.
fn type_tag(commit_type: Option<CommitType>, palette: &Palette) -> String {
    match commit_type {
        Some(CommitType::Local) => palette.green("local "),
        Some(CommitType::Even) => palette.blue("even  "),
        Some(CommitType::Remote) => palette.red("remote"),
        None => "      ".to_string(),
    }
}

/// One line per commit: hash, type, summary, age and author.
pub fn commit_line(commit: &Commit, now: DateTime<Utc>, palette: &Palette) -> String {
    format!(
        "{} {} {} {} {}",
        palette.yellow(commit.hash.abbrev()),
        type_tag(commit.commit_type, palette),
        commit.summary,
        palette.cyan(&format!("({})", since(&commit.author.when, now))),
        palette.blue(&format!("<{}>", commit.author.name)),
    )
}

/// Header block for a single commit.
pub fn commit_header(commit: &Commit, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        palette.yellow(&format!("commit {}", commit.hash)),
        format!("Author: {}", commit.author),
        format!("Date:   {}", commit.date()),
        String::new(),
    ];
    lines.extend(commit.message.lines().map(|l| format!("    {}", l)));
    lines
}

/// A branch with its tracking state.
///
/// `*` marks the current branch; `=` marks one that matches its upstream.
pub fn branch_line(branch: &Branch, is_current: bool, palette: &Palette) -> String {
    let marker = if is_current { "*" } else { " " };
    let name = if branch.is_remote() {
        palette.red(branch.name().as_str())
    } else if is_current {
        palette.green(branch.name().as_str())
    } else {
        branch.name().to_string()
    };

    let mut line = format!("{} {} {}", marker, name, palette.yellow(branch.hash().abbrev()));

    if let Some(upstream) = branch.upstream() {
        let state = if branch.is_clean() {
            "=".to_string()
        } else {
            format!("ahead {}, behind {}", branch.ahead().len(), branch.behind().len())
        };
        line.push_str(&format!(" [{}: {}]", palette.blue(upstream.name()), state));
    }

    line
}

/// A remote with its URLs.
pub fn remote_lines(remote: &Remote, palette: &Palette) -> Vec<String> {
    if remote.urls.is_empty() {
        return vec![palette.blue(&remote.name)];
    }
    remote
        .urls
        .iter()
        .map(|url| format!("{}\t{}", palette.blue(&remote.name), url))
        .collect()
}

/// A delta summary, colored by status.
pub fn delta_line(delta: &DiffDelta, palette: &Palette) -> String {
    let text = delta.to_string();
    match delta.status {
        DeltaStatus::Added | DeltaStatus::Copied => palette.green(&text),
        DeltaStatus::Deleted => palette.red(&text),
        DeltaStatus::Renamed | DeltaStatus::Typechange => palette.cyan(&text),
        _ => text,
    }
}

/// Color a unified patch line by line.
pub fn patch_lines(patch: &str, palette: &Palette) -> Vec<String> {
    patch
        .lines()
        .map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                line.to_string()
            } else if line.starts_with('+') {
                palette.green(line)
            } else if line.starts_with('-') {
                palette.red(line)
            } else if line.starts_with("@@") {
                palette.cyan(line)
            } else {
                line.to_string()
            }
        })
        .collect()
}
