/**
 * Environment-driven service configuration.
 */
pub mod config;
/**
 * Metadata store: sqlx-backed repository for
 *  nodes and roots. The database is the single
 *  source of truth for configuration; handlers
 *  re-read it per request.
 */
pub mod database;
/**
 * HTTP server: admin API (nodes, roots), the
 *  delegated storage data plane, and health
 *  endpoints.
 */
pub mod http;
/**
 * Process entrypoint: logging, state setup,
 *  graceful shutdown.
 */
pub mod process;
/**
 * Best-effort indexing of object writes into
 *  the configured search engine nodes.
 */
pub mod search;
mod state;

pub use config::Config as ServiceConfig;
pub use process::spawn_service;
pub use state::State as ServiceState;
