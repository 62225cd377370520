#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`EngineError`)
//! - [`config`]: Engine configuration (`EngineConfig`, builder)
//! - [`score`]: Health score calculator (`health_score`)
//! - [`profile`]: Record to profile conversion (`ProfileBuilder`)
//! - [`quantity`]: Package size parsing and comparison (`parse_quantity`, `ValueBadge`)
//! - [`search_terms`]: Catalog search term extraction (`extract_search_terms`)
//! - [`catalog`]: Catalog client (`CatalogClient` trait, `HttpCatalogClient`)
//! - [`fetcher`]: Concurrent candidate fetching with retry (`CandidateFetcher`)
//! - [`ranker`]: Alternative filtering and ordering (`AlternativeRanker`)
//! - [`compare`]: Side-by-side product comparison (`ProductComparator`)
//! - [`trend`]: Scan history trend summary (`summarize`)
//! - [`engine`]: Main orchestrator (`AlternativesEngine`, `AlternativesEngineBuilder`)
//!
//! # Architecture
//!
//! ```text
//! ProductRecord --> ProfileBuilder --> health_score
//!       |
//!       +--> extract_search_terms --> CandidateFetcher --> CatalogClient (per term)
//!                                            |
//!                                     Vec<CandidateProduct>
//!                                            |
//!                                     AlternativeRanker
//!                                            |
//!                                    AlternativesReport
//! ```

pub mod catalog;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod profile;
pub mod quantity;
pub mod ranker;
pub mod score;
pub mod search_terms;
pub mod trend;

// --- Public API Re-exports ---

// Engine (main orchestrator)
pub use engine::{
    AlternativesEngine, AlternativesEngineBuilder, AlternativesReport, DiscoveryStatus,
};

// Configuration
pub use config::{EngineConfig, EngineConfigBuilder};

// Error
pub use error::EngineError;

// Catalog
pub use catalog::{CandidateProduct, CatalogClient, HttpCatalogClient};

// Scoring
pub use profile::ProfileBuilder;
pub use score::health_score;

// Quantity
pub use quantity::{
    ParsedQuantity, QuantityComparison, QuantityUnit, ValueBadge, compare_quantities,
    parse_quantity,
};

// Search terms
pub use search_terms::extract_search_terms;

// Ranking / comparison / trend
pub use compare::{ComparisonInput, ComparisonVerdict, ProductComparator, Winner};
pub use ranker::{AlternativeRanker, AlternativeResult, OriginalProduct};
pub use trend::{ScanHistoryEntry, TrendDirection, TrendSummary};
