use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SCROLLBACK: usize = 2048;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown theme '{0}' (expected one of: gruvbox, github, plain)")]
    UnknownTheme(String),
}

/// Behavioural knobs of the console. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,
    pub banner: Vec<String>,
    /// Forwarded to the gateway like any command; sequence replies get the
    /// help tone.
    pub help_keyword: String,
    /// Handled locally, never sent.
    pub clear_keyword: String,
    pub pending_indicator: String,
    pub scrollback: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "redigo> ".to_string(),
            banner: vec![
                "RediGo Playground - Multithread Redis".to_string(),
                "Type `help` for more information.".to_string(),
                String::new(),
            ],
            help_keyword: "help".to_string(),
            clear_keyword: "clear".to_string(),
            pending_indicator: "...".to_string(),
            scrollback: DEFAULT_SCROLLBACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Gruvbox,
    Github,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colours for each role. `None` leaves the terminal's own colour in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    pub background: Option<Rgb>,
    pub foreground: Option<Rgb>,
    pub accent: Option<Rgb>,
    pub muted: Option<Rgb>,
    pub error: Option<Rgb>,
    pub help: Option<Rgb>,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Gruvbox => "gruvbox",
            Theme::Github => "github",
            Theme::Plain => "plain",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Gruvbox, Theme::Github, Theme::Plain]
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Gruvbox => Palette {
                background: Some(Rgb(0x28, 0x28, 0x28)),
                foreground: Some(Rgb(0xeb, 0xdb, 0xb2)),
                accent: Some(Rgb(0xfa, 0xbd, 0x2f)),
                muted: Some(Rgb(0xbd, 0xae, 0x93)),
                error: Some(Rgb(0xfb, 0x49, 0x34)),
                help: Some(Rgb(0x83, 0xa5, 0x98)),
            },
            Theme::Github => Palette {
                background: Some(Rgb(0x0d, 0x11, 0x17)),
                foreground: Some(Rgb(0xc9, 0xd1, 0xd9)),
                accent: Some(Rgb(0x58, 0xa6, 0xff)),
                muted: Some(Rgb(0x8b, 0x94, 0x9e)),
                error: Some(Rgb(0xf8, 0x51, 0x49)),
                help: Some(Rgb(0xd2, 0x99, 0x22)),
            },
            Theme::Plain => Palette::default(),
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gruvbox" | "gruv" => Ok(Theme::Gruvbox),
            "github" | "github-dark" => Ok(Theme::Github),
            "plain" | "none" => Ok(Theme::Plain),
            _ => Err(ConfigError::UnknownTheme(s.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
