//! # Pipeline Module
//!
//! Orchestrates the full run: scan, hash, group. The pipeline owns the
//! phase ordering; each phase finishes completely before the next starts,
//! so the hash pool only ever sees the final file list and grouping only
//! ever sees the final digest index.

use crate::core::classifier::MimeClassifier;
use crate::core::collection::{DoublesReport, ImageCollection};
use crate::core::hasher::{HashPool, DEFAULT_WORKERS};
use crate::core::scanner::Scanner;
use crate::error::Result;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Directory base names pruned during the scan
    pub skip: Vec<String>,
    /// MIME types counted as images
    pub accepted_types: Vec<String>,
    /// Hash worker count
    pub workers: usize,
}

/// Builder for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    fn new(root: PathBuf) -> Self {
        Self {
            config: PipelineConfig {
                root,
                skip: Vec::new(),
                accepted_types: vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                    "image/gif".to_string(),
                ],
                workers: DEFAULT_WORKERS,
            },
        }
    }

    /// Prune directories with these base names.
    pub fn skip<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the accepted MIME types.
    pub fn accepted_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.accepted_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the hash worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

/// What one run produced.
#[derive(Debug)]
pub struct PipelineResult {
    /// Images found by the scan
    pub total_images: usize,
    /// The duplicate groups
    pub report: DoublesReport,
    /// Per-file failures from the scan and hash phases, rendered
    pub errors: Vec<String>,
    /// Wall-clock duration of the whole run
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_images: self.total_images,
            duplicate_groups: self.report.len(),
            duplicate_files: self.report.duplicate_file_count(),
            duration_ms: self.duration_ms,
        }
    }
}

/// The scan-hash-group pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Start building a pipeline over `root`.
    pub fn builder(root: impl Into<PathBuf>) -> PipelineBuilder {
        PipelineBuilder::new(root.into())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run without event reporting.
    pub fn run(&self) -> Result<PipelineResult> {
        self.run_with_events(&null_sender())
    }

    /// Run, emitting progress events along the way.
    ///
    /// Fails only when the root is unusable or the run cannot start;
    /// per-file failures are collected into the result instead.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult> {
        let started = Instant::now();
        events.send(Event::Pipeline(PipelineEvent::Started {
            root: self.config.root.clone(),
        }));
        info!(root = %self.config.root.display(), "starting duplicate scan");

        let collection = ImageCollection::new();
        let mut errors = Vec::new();

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));
        let classifier = MimeClassifier::new(self.config.accepted_types.iter().cloned());
        let scanner = Scanner::new(classifier, self.config.skip.iter().cloned());
        let scan_errors = match scanner.scan(&self.config.root, &collection, events) {
            Ok(scan_errors) => scan_errors,
            Err(fatal) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: fatal.to_string(),
                }));
                return Err(fatal.into());
            }
        };
        errors.extend(scan_errors.iter().map(ToString::to_string));

        let paths = collection.files();
        let total_images = paths.len();
        debug!(total_images, "scan phase finished");

        if total_images == 0 {
            let result = PipelineResult {
                total_images: 0,
                report: DoublesReport::default(),
                errors,
                duration_ms: started.elapsed().as_millis() as u64,
            };
            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: result.summary(),
            }));
            return Ok(result);
        }

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        }));
        let pool = HashPool::new(self.config.workers);
        let hash_errors = pool.run(&paths, &collection, events);
        errors.extend(hash_errors.iter().map(ToString::to_string));
        debug!(
            hashed = total_images - hash_errors.len(),
            failed = hash_errors.len(),
            "hash phase finished"
        );

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Grouping,
        }));
        let report = collection.find_doubles();

        let result = PipelineResult {
            total_images,
            report,
            errors,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            groups = result.report.len(),
            duplicates = result.report.duplicate_file_count(),
            duration_ms = result.duration_ms,
            "duplicate scan finished"
        );
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary(),
        }));

        Ok(result)
    }
}
