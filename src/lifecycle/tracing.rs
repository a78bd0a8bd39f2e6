//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); the
//! structured fields carry the context instead.
//!
//! ## What Gets Traced
//!
//! - **Cache lifecycle**: start, shutdown and the number of slots at exit
//! - **Reads**: fetch start/finish per `key`, with `subscribers` on success
//! - **Invalidations**: `key` and the outcome (`Refetching`, `MarkedStale`, ...)
//! - **Writes**: a span per client call (`method`, `endpoint`), the response status
//! - **Navigation**: route changes and redirects to the login page
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info solo-dashboard accounts
//! RUST_LOG=debug solo-dashboard nodes --network 3
//! ```
//!
//! With `RUST_LOG=info` a delete looks like:
//!
//! ```text
//! INFO Resource cache started
//! INFO Fetch ok key=https://api.solo.dev/accounts subscribers=1
//! INFO delete: Invalidated key=https://api.solo.dev/accounts outcome=Refetching
//! INFO Fetch ok key=https://api.solo.dev/accounts subscribers=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
