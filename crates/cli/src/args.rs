//! Command-line parsing and validation.
//!
//! Single-dash arguments are set aside before clap sees the command line, so
//! the checks run in this order:
//! 1. unknown `--` flags (clap parse)
//! 2. `--width`/`--height` without `--preview`
//! 3. missing URL
//! 4. single-dash arguments
//! 5. `--width`/`--height` values
//! 6. URL normalization and validation
//!
//! The URL is the last positional argument.

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use rinku_core::{PreviewSize, TargetUrl};
use std::ffi::OsString;
use thiserror::Error;

pub const USAGE: &str = "Usage: rinku [--no-cache] [--preview [--width N] [--height N]] <url>";

/// Largest accepted card edge, in pixels.
pub const MAX_DIMENSION: f64 = 16_384.0;

const SIZE_FLAGS: [&str; 2] = ["--width", "--height"];

#[derive(Debug, Parser)]
#[command(name = "rinku", version, about = "Fetch link preview metadata or render a preview card as JSON")]
pub struct Cli {
    /// Neither read nor write cached metadata
    #[arg(long)]
    pub no_cache: bool,

    /// Render a preview card instead of returning metadata
    #[arg(long)]
    pub preview: bool,

    /// Card width in pixels (requires --preview)
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub width: Option<String>,

    /// Card height in pixels (requires --preview)
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub height: Option<String>,

    /// Page to preview; https:// is assumed when no scheme is given
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,
}

/// Argument errors reported to the caller. `Display` is the exact response text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown flag '{0}'.")]
    UnknownFlag(String),

    #[error("Invalid flag '{0}'. Did you mean '-{0}'?")]
    SingleDash(String),

    #[error("The --width and --height flags require --preview to be set.")]
    SizeWithoutPreview,

    #[error("{}", USAGE)]
    MissingUrl,

    #[error("Invalid URL '{0}'.")]
    InvalidUrl(String),

    #[error("Invalid value '{value}' for {flag}.")]
    InvalidValue { flag: &'static str, value: String },

    #[error("{0}")]
    Other(String),
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub url: TargetUrl,
    pub cache_enabled: bool,
    /// Card size when rendering; `None` selects metadata mode.
    pub preview: Option<PreviewSize>,
}

/// Result of parsing the command line.
#[derive(Debug)]
pub enum Parsed {
    Run(Invocation),
    /// `--help` or `--version`; clap's rendered text goes to stdout as-is.
    Info(clap::Error),
    Invalid(ValidationError),
}

pub fn parse<I, T>(args: I) -> Parsed
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (args, single_dash) = split_single_dash(args.into_iter().map(Into::into));

    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.validate(single_dash) {
            Ok(invocation) => Parsed::Run(invocation),
            Err(e) => Parsed::Invalid(e),
        },
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Parsed::Info(e),
        Err(e) => Parsed::Invalid(from_clap(&e)),
    }
}

impl Cli {
    /// Validate parsed arguments. `single_dash` is the first single-dash
    /// argument removed from the command line, if any.
    pub fn validate(mut self, single_dash: Option<String>) -> Result<Invocation, ValidationError> {
        if !self.preview && (self.width.is_some() || self.height.is_some()) {
            return Err(ValidationError::SizeWithoutPreview);
        }

        let input = self.urls.pop().ok_or(ValidationError::MissingUrl)?;
        if !self.urls.is_empty() {
            tracing::debug!(ignored = ?self.urls, "using the last positional argument as the URL");
        }

        if let Some(arg) = single_dash {
            return Err(ValidationError::SingleDash(arg));
        }

        let preview = if self.preview {
            let default = PreviewSize::default();
            Some(PreviewSize {
                width: dimension("--width", self.width.as_deref())?.unwrap_or(default.width),
                height: dimension("--height", self.height.as_deref())?.unwrap_or(default.height),
            })
        } else {
            None
        };

        let url = TargetUrl::parse(&input).map_err(|e| {
            tracing::debug!("rejected URL {input:?}: {e}");
            ValidationError::InvalidUrl(input.clone())
        })?;

        Ok(Invocation { url, cache_enabled: !self.no_cache, preview })
    }
}

/// Remove single-dash arguments (`-`, `-x`, `-abc`) ahead of clap, returning
/// the remaining arguments and the first one removed.
///
/// A negative number directly after `--width`/`--height` is that flag's value
/// and is kept. Everything after `--` is positional.
fn split_single_dash(args: impl Iterator<Item = OsString>) -> (Vec<OsString>, Option<String>) {
    let mut kept = Vec::new();
    let mut first = None;
    let mut after_size_flag = false;
    let mut positional_only = false;

    for (i, arg) in args.enumerate() {
        if i == 0 || positional_only {
            kept.push(arg);
            continue;
        }

        let text = arg.to_str();
        if text == Some("--") {
            positional_only = true;
        } else if let Some(t) = text
            && t.starts_with('-')
            && !t.starts_with("--")
            && !(after_size_flag && t.parse::<f64>().is_ok())
        {
            first.get_or_insert_with(|| t.to_string());
            after_size_flag = false;
            continue;
        }

        after_size_flag = text.is_some_and(|t| SIZE_FLAGS.contains(&t));
        kept.push(arg);
    }

    (kept, first)
}

fn dimension(flag: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 && v <= MAX_DIMENSION => Ok(Some(v)),
        _ => Err(ValidationError::InvalidValue { flag, value: raw.to_string() }),
    }
}

fn from_clap(err: &clap::Error) -> ValidationError {
    if err.kind() == ErrorKind::UnknownArgument
        && let Some(ContextValue::String(arg)) = err.get(ContextKind::InvalidArg)
        && arg.starts_with("--")
    {
        return ValidationError::UnknownFlag(arg.clone());
    }

    let rendered = err.render().to_string();
    let line = rendered.lines().next().unwrap_or_default();
    ValidationError::Other(line.strip_prefix("error: ").unwrap_or(line).to_string())
}
