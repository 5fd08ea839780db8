#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo binary.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `FOLIO_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Folio Demo: replays a scripted visit of the portfolio page

USAGE:
    folio-demo [OPTIONS]

OPTIONS:
    --state-path=PATH    Theme preference file (default: $XDG_STATE_HOME/folio/demo/preferences.json)
    --layout=PATH        Page inventory as JSON (default: built-in portfolio page)
    --duration-ms=N      Simulated session length in milliseconds (default: 20000)
    --step-ms=N          Host frame interval in milliseconds (default: 16)
    --width=N            Viewport width in pixels (default: 1280)
    --height=N           Viewport height in pixels (default: 800)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    FOLIO_DEMO_STATE_PATH     Override --state-path
    FOLIO_DEMO_LAYOUT         Override --layout
    FOLIO_DEMO_DURATION_MS    Override --duration-ms
    FOLIO_DEMO_STEP_MS        Override --step-ms
    RUST_LOG                  Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Theme preference file; `None` uses the per-user default.
    pub state_path: Option<PathBuf>,
    /// Page inventory file; `None` uses the built-in page.
    pub layout: Option<PathBuf>,
    /// Simulated session length.
    pub duration_ms: u64,
    /// Host frame interval.
    pub step_ms: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            state_path: None,
            layout: None,
            duration_ms: 20_000,
            step_ms: 16,
            width: 1_280,
            height: 800,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Opts),
    Help,
    Version,
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid --{flag} value: {val}"))
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version` or bad input.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();
        opts.apply_env(|key| env::var(key).ok());

        match opts.apply_args(env::args().skip(1)) {
            Ok(Invocation::Run(opts)) => opts,
            Ok(Invocation::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Invocation::Version) => {
                println!("folio-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply `FOLIO_DEMO_*` overrides. Unparseable numbers are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("FOLIO_DEMO_STATE_PATH") {
            self.state_path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("FOLIO_DEMO_LAYOUT") {
            self.layout = Some(PathBuf::from(val));
        }
        if let Some(val) = var("FOLIO_DEMO_DURATION_MS")
            && let Ok(n) = val.parse()
        {
            self.duration_ms = n;
        }
        if let Some(val) = var("FOLIO_DEMO_STEP_MS")
            && let Ok(n) = val.parse()
        {
            self.step_ms = n;
        }
    }

    /// Apply command-line flags on top of `self`.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Invocation, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--version" | "-V" => return Ok(Invocation::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--state-path=") {
                        self.state_path = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--layout=") {
                        self.layout = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--duration-ms=") {
                        self.duration_ms = number("duration-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--step-ms=") {
                        self.step_ms = number("step-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        self.width = number("width", val)?;
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        self.height = number("height", val)?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }
        if self.step_ms == 0 {
            return Err("Invalid --step-ms value: 0".to_owned());
        }
        Ok(Invocation::Run(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.duration_ms, 20_000);
        assert_eq!(opts.step_ms, 16);
        assert!(opts.state_path.is_none());
        assert!(opts.layout.is_none());
    }

    #[test]
    fn flags_override_env() {
        let mut opts = Opts::default();
        opts.apply_env(|key| match key {
            "FOLIO_DEMO_DURATION_MS" => Some("500".to_owned()),
            "FOLIO_DEMO_STEP_MS" => Some("nope".to_owned()),
            _ => None,
        });
        assert_eq!(opts.duration_ms, 500);
        assert_eq!(opts.step_ms, 16);

        let opts = match opts.apply_args(["--duration-ms=900", "--state-path=/tmp/p.json"]) {
            Ok(Invocation::Run(opts)) => opts,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(opts.duration_ms, 900);
        assert_eq!(opts.state_path, Some(PathBuf::from("/tmp/p.json")));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            Opts::default().apply_args(["--width=10", "-h", "--bogus"]),
            Ok(Invocation::Help)
        );
        assert_eq!(Opts::default().apply_args(["-V"]), Ok(Invocation::Version));
    }

    #[test]
    fn bad_values_are_reported() {
        assert_eq!(
            Opts::default().apply_args(["--step-ms=fast"]),
            Err("Invalid --step-ms value: fast".to_owned())
        );
        assert!(Opts::default().apply_args(["--step-ms=0"]).is_err());
        assert_eq!(
            Opts::default().apply_args(["--frobnicate"]),
            Err("Unknown argument: --frobnicate".to_owned())
        );
    }

    #[test]
    fn help_text_contains_env_vars() {
        assert!(HELP_TEXT.contains("FOLIO_DEMO_STATE_PATH"));
        assert!(HELP_TEXT.contains("FOLIO_DEMO_DURATION_MS"));
        assert!(!VERSION.is_empty());
    }
}
