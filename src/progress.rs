//! Progress-callback trait for per-jurisdiction extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the report. The CLI uses this to
//! drive its progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use house_stats2csv::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rows: Arc<AtomicUsize>,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_jurisdiction_complete(&self, name: &str, _districts: usize, records: usize) {
//!         self.rows.fetch_add(records, Ordering::SeqCst);
//!         eprintln!("{name}: {records} rows");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     rows: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each jurisdiction.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in canonical jurisdiction order.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after segmentation, before any jurisdiction is grouped.
    ///
    /// # Arguments
    /// * `total_jurisdictions`: number of configured jurisdictions found in
    ///   the input
    fn on_extraction_start(&self, total_jurisdictions: usize) {
        let _ = total_jurisdictions;
    }

    /// Called before a jurisdiction's block is grouped and normalized.
    fn on_jurisdiction_start(&self, name: &str, index: usize, total: usize) {
        let _ = (name, index, total);
    }

    /// Called when every record of a jurisdiction parsed successfully.
    fn on_jurisdiction_complete(&self, name: &str, districts: usize, records: usize) {
        let _ = (name, districts, records);
    }

    /// Called once after the last jurisdiction, only on success.
    fn on_extraction_complete(&self, total_records: usize) {
        let _ = total_records;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
