//! CLI route: run context that builds both snapshots and compares them.

use crate::attribution::OwnershipPolicy;
use crate::cli::output::format_report;
use crate::cli::parse::{Cli, OutputFormat};
use crate::config::{CompareConfig, ConfigLoader};
use crate::diagnostics::Diagnostic;
use crate::diff::{DiffEngine, DiffOptions, TextStyle};
use crate::error::{CompareError, SnapshotError};
use crate::snapshot::{BuildOptions, BuildOutcome, FileSnapshotCache, SnapshotBuilder};
use std::path::Path;
use tracing::{info, warn};

/// What the binary writes: the report for stdout, diagnostics for stderr
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Effective settings for one comparison, after CLI overrides
pub struct RunContext {
    config: CompareConfig,
    use_cache: bool,
    format: OutputFormat,
    style: TextStyle,
}

impl RunContext {
    /// Load configuration and apply CLI overrides
    pub fn new(cli: &Cli) -> Result<Self, CompareError> {
        let config = match cli.config {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::with_config(cli, config, color_default()))
    }

    /// Apply CLI overrides to an already-loaded configuration
    pub fn with_config(cli: &Cli, mut config: CompareConfig, color: bool) -> Self {
        if cli.include_size_changes {
            config.diff.include_size_changes = true;
        }
        if cli.warn_reassigned {
            config.attribution.policy = OwnershipPolicy::WarnOnReassign;
        }
        Self {
            config,
            use_cache: cli.use_cache,
            format: cli.format,
            style: TextStyle {
                color: color && !cli.no_color,
            },
        }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Build both snapshots (sequentially) and render the comparison
    pub fn execute(&self, first: &Path, second: &Path) -> Result<RunOutput, CompareError> {
        let cache = self.cache();
        let options = BuildOptions {
            use_cache: self.use_cache && cache.is_some(),
            persist_cache: self.config.cache.persist && cache.is_some(),
            ownership_policy: self.config.attribution.policy,
        };

        let a = build(first, options, cache.as_ref())?;
        let b = build(second, options, cache.as_ref())?;

        let engine = DiffEngine::new(DiffOptions {
            include_size_changes: self.config.diff.include_size_changes,
        });
        let report = engine.compare(&a.snapshot, &b.snapshot)?;
        if report.is_empty() {
            info!("No package or unpackaged file differences");
        }
        info!(
            previous = %report.previous_version,
            current = %report.current_version,
            changes = report.packages.len() + report.files.len(),
            "Comparison finished"
        );

        let mut diagnostics = a.diagnostics;
        diagnostics.extend(b.diagnostics);
        diagnostics.extend(report.diagnostics.iter().cloned());

        Ok(RunOutput {
            report: format_report(&report, self.format, self.style)?,
            diagnostics,
        })
    }

    fn cache(&self) -> Option<FileSnapshotCache> {
        match self.config.cache.dir {
            Some(ref dir) => Some(FileSnapshotCache::new(dir.clone())),
            None => match FileSnapshotCache::default_location() {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("Snapshot cache disabled: {}", e);
                    None
                }
            },
        }
    }
}

fn build(
    root: &Path,
    options: BuildOptions,
    cache: Option<&FileSnapshotCache>,
) -> Result<BuildOutcome, SnapshotError> {
    let builder = SnapshotBuilder::new(root.to_path_buf()).with_options(options);
    match cache {
        Some(cache) => builder.with_cache(cache).build(),
        None => builder.build(),
    }
}

fn color_default() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
