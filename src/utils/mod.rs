//! # Utility Modules
//!
//! Supporting utilities for text transcoding, logging, and metrics.
//!
//! ## Components
//! - **Text**: UTF-8 ↔ Shift-JIS conversion and fixed-size padded string fields
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe observability counters

pub mod logging;
pub mod metrics;
pub mod text;

pub use metrics::{Metrics, MetricsSnapshot};
pub use text::{padded_string, sjis_to_utf8, utf8_to_sjis};
