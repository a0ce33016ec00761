//! Sort run execution.

use super::config::SortConfig;
use super::dispatcher::Dispatcher;
use super::types::SortReport;
use crate::core::date::DateResolver;
use crate::core::metadata::{ExifDecoder, MetadataDecoder};
use crate::core::organize::NamingScheme;
use crate::core::registry::DuplicateRegistry;
use crate::core::scanner::{MediaFilter, WalkOptions};
use crate::error::{Result, SorterError};
use crate::events::{null_sender, Event, EventSender, RunEvent};
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Builder for a [`Sorter`]
pub struct SorterBuilder {
    config: SortConfig,
    decoder: Option<Arc<dyn MetadataDecoder>>,
}

impl SorterBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
            decoder: None,
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: SortConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the source directories
    pub fn sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.config.sources = sources;
        self
    }

    /// Add one source directory
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.sources.push(source.into());
        self
    }

    /// Set the library root
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.config.destination = Some(destination.into());
        self
    }

    pub fn min_size(mut self, min_size: u64) -> Self {
        self.config.min_size = min_size;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Worker thread count (0 = one per logical CPU)
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn naming(mut self, naming: NamingScheme) -> Self {
        self.config.naming = naming;
        self
    }

    /// Set walk options
    pub fn walk_options(mut self, options: WalkOptions) -> Self {
        self.config.walk = options;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.walk.include_hidden = include;
        self
    }

    /// Use a different metadata decoder for EXIF dates
    pub fn decoder(mut self, decoder: Arc<dyn MetadataDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Build the sorter
    pub fn build(self) -> Sorter {
        Sorter {
            config: self.config,
            decoder: self.decoder.unwrap_or_else(|| Arc::new(ExifDecoder)),
        }
    }
}

impl Default for SorterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorts media from source directories into a dated library
pub struct Sorter {
    config: SortConfig,
    decoder: Arc<dyn MetadataDecoder>,
}

impl Sorter {
    /// Create a new sorter builder
    pub fn builder() -> SorterBuilder {
        SorterBuilder::new()
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Run without events
    pub fn run(&self) -> Result<SortReport> {
        self.run_with_events(&null_sender())
    }

    /// Run with event reporting.
    ///
    /// Fails only on setup problems: invalid configuration, a root that
    /// cannot be walked, or a worker pool that cannot start. Per-file
    /// problems end up in [`SortReport::failures`].
    pub fn run_with_events(&self, events: &EventSender) -> Result<SortReport> {
        let start_time = Instant::now();
        self.config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .thread_name(|i| format!("sort-worker-{}", i))
            .build()
            .map_err(|e| SorterError::ThreadPool(e.to_string()))?;

        info!(
            sources = self.config.sources.len(),
            destination = ?self.config.destination,
            dry_run = self.config.dry_run,
            threads = pool.current_num_threads(),
            "Sort started"
        );
        events.send(Event::Run(RunEvent::Started {
            sources: self.config.sources.clone(),
            destination: self.config.destination.clone(),
            dry_run: self.config.dry_run,
        }));

        let registry = DuplicateRegistry::new();
        let resolver = DateResolver::new(Arc::clone(&self.decoder));
        let destination = self.config.destination.as_deref();
        let dispatcher = Dispatcher {
            registry: &registry,
            resolver: &resolver,
            filter: MediaFilter::new(self.config.min_size),
            walk_options: &self.config.walk,
            destination,
            naming: self.config.naming,
            dry_run: self.config.dry_run,
            events,
        };

        let mut report = SortReport::new(self.config.dry_run);

        pool.install(|| -> Result<()> {
            match destination {
                Some(root) if root.is_dir() => report.absorb(dispatcher.prescan(root)?),
                Some(root) => info!(root = %root.display(), "Library does not exist yet, skipping pre-scan"),
                None => info!("No destination configured, reporting only"),
            }

            for source in &self.config.sources {
                report.absorb(dispatcher.ingest(source)?);
            }
            Ok(())
        })?;

        report.registry_size = registry.len();
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        let summary = report.summary();
        info!(
            placed = summary.placed,
            duplicates = summary.duplicates,
            failures = summary.failures,
            duration_ms = summary.duration_ms,
            "Sort completed"
        );
        events.send(Event::Run(RunEvent::Completed { summary }));

        Ok(report)
    }
}
