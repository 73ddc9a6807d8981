//! arcc-drv - Checker Driver
//!
//! Coordinates parsing and semantic analysis of Arc sources against a
//! configured channel table, and renders the resulting diagnostics.
//!
//! ```
//! use arcc_drv::{Config, Session};
//!
//! let config = Config::default().with_channel("valve", 100, "f64");
//! let session = Session::new(config).unwrap();
//! let report = session.check_source("main.arc", "authority (valve 200)");
//! assert!(!report.has_errors());
//! assert_eq!(report.authorities.channels.get(&100), Some(&200));
//! ```

pub mod config;
pub mod error;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use arcc_sem::{analyze_program, Authorities, Channels};
use arcc_util::{CancellationToken, Diagnostic, Diagnostics};
use tracing::debug;

pub use config::{ChannelConfig, Config};
pub use error::{ConfigError, DrvError};

/// Checking session: one channel table, any number of sources
#[derive(Debug)]
pub struct Session {
    config: Config,
    channels: Rc<Channels>,
    token: CancellationToken,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, DrvError> {
        let channels = Rc::new(config.channels()?);
        debug!(channels = channels.len(), "created session");
        Ok(Self {
            config,
            channels,
            token: CancellationToken::new(),
        })
    }

    /// Use `token` to cancel checks from another thread.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and analyze `text`.
    ///
    /// Semantic analysis is skipped when the source has syntax errors; the
    /// report then holds only the lexer and parser diagnostics.
    pub fn check_source(&self, name: &str, text: &str) -> CheckReport {
        let (program, mut diagnostics) = arcc_par::parse(text);
        if !diagnostics.ok() {
            debug!(file = name, errors = diagnostics.error_count(), "syntax errors, skipping analysis");
            return CheckReport {
                name: name.to_string(),
                diagnostics,
                authorities: Authorities::default(),
            };
        }

        let resolver: Rc<dyn arcc_sem::Resolver> = self.channels.clone();
        let output = analyze_program(&program, Some(resolver), self.token.clone());
        diagnostics.merge(output.diagnostics);
        debug!(file = name, diagnostics = diagnostics.len(), "checked");
        CheckReport {
            name: name.to_string(),
            diagnostics,
            authorities: output.analysis.authorities,
        }
    }

    /// Read and check a file.
    pub fn check_file(&self, path: &Path) -> Result<CheckReport, DrvError> {
        let text = std::fs::read_to_string(path).map_err(|source| DrvError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(self.check_source(&path.display().to_string(), &text))
    }
}

/// Outcome of checking one source
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Display name of the source
    pub name: String,
    /// Parse and analysis diagnostics, in report order
    pub diagnostics: Diagnostics,
    /// Authority values of the program
    pub authorities: Authorities,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.ok()
    }

    /// One line per diagnostic: `name:line:col: severity[CODE]: message`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diagnostic in self.diagnostics.iter() {
            render_diagnostic(&mut out, &self.name, diagnostic);
        }
        out
    }
}

fn render_diagnostic(out: &mut String, name: &str, diagnostic: &Diagnostic) {
    let _ = write!(out, "{name}:{}: {}", diagnostic.start, diagnostic.severity);
    if let Some(code) = diagnostic.code {
        let _ = write!(out, "[{code}]");
    }
    let _ = writeln!(out, ": {}", diagnostic.message);
}
