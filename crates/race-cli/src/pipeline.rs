//! Resolve, normalize and extract in one refresh cycle.
//!
//! Everything a presenter needs comes back in a [`DashboardSnapshot`]; no
//! state is kept between cycles apart from the image mapping, which is read
//! once per [`Dashboard`].

use race_analytics::AnalyticsEngine;
use race_ingest::{ImageMapping, ImageMappingCache, IngestError, SourceResolver};
use race_model::{Diagnostic, Diagnostics, RaceResults, SessionMetadata};
use race_normalization::{PartialRecordError, extract_metadata, normalize};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span};

use crate::config::DashboardConfig;

/// Everything produced by one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub results: RaceResults,
    pub metadata: SessionMetadata,
    pub has_race_data: bool,
    pub diagnostics: Diagnostics,
    pub record_errors: Vec<PartialRecordError>,
    pub image_mapping: ImageMapping,
}

impl DashboardSnapshot {
    pub fn analytics(&self) -> AnalyticsEngine<'_> {
        AnalyticsEngine::new(&self.results)
    }

    pub fn image_for(&self, username: &str) -> Option<&str> {
        self.image_mapping.image_for(username)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A refresh cycle that found nothing to show.
///
/// Carries the diagnostics gathered up to the failure so the caller can
/// explain what was tried.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct LoadError {
    #[source]
    pub error: IngestError,
    pub diagnostics: Diagnostics,
}

impl LoadError {
    pub fn is_no_data(&self) -> bool {
        matches!(self.error, IngestError::NoDataAvailable { .. })
    }
}

/// A configured dashboard that can be refreshed on demand.
///
/// Callers must not run two refreshes of the same data directory at once;
/// tiers are read one after another and may change in between.
pub struct Dashboard {
    config: DashboardConfig,
    resolver: SourceResolver,
    images: ImageMappingCache,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let resolver = SourceResolver::from_config(&config.source_config());
        let images = ImageMappingCache::new(config.image_mapping_path());
        Self {
            config,
            resolver,
            images,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Runs one cycle, appending to `diagnostics`.
    ///
    /// # Errors
    ///
    /// Fails only when no tier yields a dataset.
    pub fn refresh(&self, mut diagnostics: Diagnostics) -> Result<DashboardSnapshot, LoadError> {
        let span = info_span!("refresh", data_dir = %self.config.data_dir.display());
        let _guard = span.enter();

        let resolved = match self.resolver.resolve(&mut diagnostics) {
            Ok(resolved) => resolved,
            Err(error) => return Err(LoadError { error, diagnostics }),
        };

        let normalized = normalize(&resolved);
        if !normalized.record_errors.is_empty() {
            diagnostics.push(
                Diagnostic::warning(format!(
                    "skipped {} malformed record(s)",
                    normalized.record_errors.len()
                ))
                .with_tier(resolved.kind()),
            );
        }

        let metadata = extract_metadata(&resolved, &normalized.results);
        let image_mapping = self.images.get(&mut diagnostics).clone();

        info!(
            source = %metadata.provenance.label,
            records = normalized.results.len(),
            has_race_data = normalized.results.has_race_data(),
            "Dashboard refreshed"
        );

        Ok(DashboardSnapshot {
            has_race_data: normalized.results.has_race_data(),
            results: normalized.results,
            metadata,
            diagnostics,
            record_errors: normalized.record_errors,
            image_mapping,
        })
    }
}

/// Runs a single cycle with a fresh dashboard.
pub fn load_dashboard(config: &DashboardConfig) -> Result<DashboardSnapshot, LoadError> {
    Dashboard::new(config.clone()).refresh(Diagnostics::new())
}
