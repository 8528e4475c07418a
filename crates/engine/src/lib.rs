//! # Meridian Engine
//!
//! The Meridian Engine resolves data choices and drives batch creation of data
//! sources. A data choice is a named, categorized handle that produces a data
//! value on demand; callers hold choices and resolve them later, possibly many times.
//!
//! ## Key Features
//!
//! - **Data Choices**: Direct (in-memory value), Unbound (placeholder) and Resource
//!   (URL or literal text) variants behind one `DataChoice` enum
//! - **Category Filtering**: Offer only the choices whose categories match a request
//! - **Batch Loading**: Create many data sources concurrently and collect successes
//!   and failures in a `DataSourceResults`
//! - **Choice Documents**: Load persisted choice lists from YAML or JSON
//!
//! ## Usage
//!
//! ```rust
//! use meridian_engine::{ChoiceIdentity, DataChoice, ResourceDataChoice};
//!
//! let identity = ChoiceIdentity::new("notes", "notes", Some("Station notes".into()), Vec::new());
//! let choice = DataChoice::from(ResourceDataChoice::new(identity, "KDEN KBOU KCOS"));
//!
//! let data = choice.get_data(None)?.expect("literal text resolves");
//! assert_eq!(data.as_text(), Some("KDEN KBOU KCOS"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`choice`**: Choice variants, identity, and the resource fetcher seam
//! - **`results`**: The success/failure aggregator
//! - **`batch`**: Concurrent data-source creation feeding the aggregator
//! - **`document`**: Persisted choice lists

pub mod batch;
pub mod choice;
pub mod document;
pub mod results;

// Re-export commonly used types for convenience
pub use batch::{BatchLoader, BatchResults, DataSourceFactory, LoadedResource, ResourceSourceFactory};
pub use choice::{
    ChoiceIdentity, DataChangeListener, DataChoice, DirectDataChoice, HttpResourceFetcher, ResolveData, ResourceDataChoice, ResourceFetcher,
    UnboundDataChoice, default_fetcher, filter_choices,
};
pub use document::{ChoiceDocument, parse_choice_document, parse_choice_str};
pub use results::{DataSourceResults, summarize};
