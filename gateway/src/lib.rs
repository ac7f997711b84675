//! Catalog read/ingest gateway
//!
//! # Module structure
//!
//! ```text
//! gateway/src/
//! ├── core/          # config, app state, server bootstrap, logging
//! ├── cache/          # typed Redis wrapper (Get/Set/Delete/Ping)
//! ├── fingerprint/    # deterministic cache-key construction
//! ├── origin/         # remote row-store client (HTTP/REST)
//! ├── db/             # relational repository layer (Postgres wire protocol)
//! ├── resolution/      # three-layer product resolution engine
//! ├── orchestrator/   # read / ingest / stock-update orchestration
//! ├── auth/           # bearer-token boundary middleware
//! └── routes/         # HTTP surface
//! ```

pub mod auth;
pub mod cache;
pub mod core;
pub mod db;
pub mod fingerprint;
pub mod orchestrator;
pub mod origin;
pub mod resolution;
pub mod routes;

pub use core::config::Config;
pub use core::logger::{cleanup_old_logs, init_logger_with_file};
pub use core::server::Server;
pub use core::state::AppState;
