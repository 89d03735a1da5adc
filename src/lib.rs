//! # Chronix News
//!
//! A news aggregation pipeline that pulls category headlines from a hosted
//! news API, tags each story with a keyword-count sentiment label, and keeps
//! the latest article set both in memory and in a JSON snapshot that can be
//! filtered by category, sentiment and free text.
//!
//! ## Architecture
//!
//! 1. **Fetching**: one provider request batch per category ([`providers`])
//! 2. **Normalizing**: fallbacks, image allow-list, ids, sentiment ([`ingest`], [`sentiment`])
//! 3. **Publishing**: generation-checked swap of the in-memory set ([`store`])
//!    and a snapshot file rewrite ([`outputs`])
//! 4. **Scheduling**: single-flight refreshes on a timer ([`pipeline`], [`scheduler`])
//! 5. **Querying**: stable three-predicate filtering ([`filter`])

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod providers;
pub mod scheduler;
pub mod sentiment;
pub mod store;
pub mod utils;
