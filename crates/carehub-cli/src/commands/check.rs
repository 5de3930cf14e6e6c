//! `carehub check` command implementation.
//!
//! Loads the configuration, runs the structural validation from
//! `carehub-core` and a few extra consistency checks, then prints a summary.

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::fmt;
use tracing_subscriber::EnvFilter;

use carehub_core::{CarehubConfig, StoreBackend};

use super::ConfigSource;

// ============================================================================
// Check Result Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single check finding.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    /// Config key the finding is about, e.g. `session_store.url`.
    pub location: String,
    pub message: String,
}

impl CheckFinding {
    fn new(severity: Severity, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            location: location.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CheckResults {
    pub findings: Vec<CheckFinding>,
}

impl CheckResults {
    fn push(&mut self, severity: Severity, location: &str, message: impl Into<String>) {
        self.findings.push(CheckFinding::new(severity, location, message));
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn print_summary(&self) {
        let mut findings: Vec<_> = self.findings.iter().collect();
        findings.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.location.cmp(&b.location)));
        for finding in findings {
            println!("  [{}] {}: {}", finding.severity, finding.location, finding.message);
        }

        println!();
        println!("{}", "=".repeat(60));
        let (errors, warnings) = (self.count(Severity::Error), self.count(Severity::Warning));
        if errors == 0 && warnings == 0 {
            println!("All checks passed!");
        } else {
            println!("Summary: {} error(s), {} warning(s)", errors, warnings);
        }
    }
}

// ============================================================================
// Checks
// ============================================================================

/// Run every check against a loaded configuration.
pub fn check_config(config: &CarehubConfig) -> CheckResults {
    let mut results = CheckResults::default();

    if let Err(e) = config.validate() {
        results.push(Severity::Error, "config", e.to_string());
    }

    let dashboard = &config.dashboard;
    let loopback = matches!(dashboard.host.as_str(), "127.0.0.1" | "localhost" | "::1");
    if !loopback && !dashboard.secure_cookies {
        results.push(
            Severity::Warning,
            "dashboard.secure_cookies",
            format!(
                "dashboard binds {} but session cookies are not marked Secure",
                dashboard.host
            ),
        );
    }

    let store = &config.session_store;
    match store.backend {
        StoreBackend::Memory => {
            let mut seen = HashSet::new();
            for (i, seed) in store.seed_users.iter().enumerate() {
                let location = format!("session_store.seed_users[{}]", i);
                if !seen.insert(seed.email.to_ascii_lowercase()) {
                    results.push(
                        Severity::Error,
                        &location,
                        format!("duplicate account email '{}'", seed.email),
                    );
                }
                if seed.password.is_empty() {
                    results.push(Severity::Error, &location, "password must not be empty");
                }
            }
            if store.seed_users.is_empty() {
                results.push(
                    Severity::Warning,
                    "session_store.seed_users",
                    "no accounts are seeded; users must register first",
                );
            }
        }
        StoreBackend::Supabase => {
            if !store.seed_users.is_empty() {
                results.push(
                    Severity::Info,
                    "session_store.seed_users",
                    "seed users are ignored by the supabase backend",
                );
            }
            if let Some(var) = &store.anon_key_env
                && std::env::var(var).is_err()
                && store.anon_key.is_some()
            {
                results.push(
                    Severity::Warning,
                    "session_store.anon_key_env",
                    format!("{} is not set; falling back to session_store.anon_key", var),
                );
            }
        }
    }

    let ip = &config.ip_lookup;
    if ip.enabled && !(ip.url.starts_with("http://") || ip.url.starts_with("https://")) {
        results.push(
            Severity::Error,
            "ip_lookup.url",
            format!("must be an http(s) URL, got '{}'", ip.url),
        );
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        results.push(
            Severity::Error,
            "logging.level",
            format!("invalid filter '{}': {}", config.logging.level, e),
        );
    }

    results
}

fn print_overview(source: &ConfigSource, config: &CarehubConfig) {
    let origin = if source.path.exists() { "" } else { " (not found, using defaults)" };
    println!("  Config:        {}{}", source.path.display(), origin);
    println!("  Dashboard:     http://{}", config.dashboard.bind_addr());
    match config.session_store.backend {
        StoreBackend::Memory => println!(
            "  Session store: memory ({} seeded account(s))",
            config.session_store.seed_users.len()
        ),
        StoreBackend::Supabase => println!(
            "  Session store: supabase ({})",
            config.session_store.url.as_deref().unwrap_or("no url")
        ),
    }
    if config.ip_lookup.enabled {
        println!("  IP lookup:     {}", config.ip_lookup.url);
    } else {
        println!("  IP lookup:     disabled");
    }
    println!("  Log level:     {}", config.logging.level);
}

/// Run `carehub check`.
pub fn run(source: &ConfigSource) -> Result<()> {
    println!("Checking CareHub configuration...");
    println!();

    let config = source.load()?;
    print_overview(source, &config);
    println!();

    let results = check_config(&config);
    results.print_summary();
    if results.has_errors() {
        bail!("Configuration has errors that must be fixed");
    }
    Ok(())
}
