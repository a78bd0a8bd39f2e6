#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Solo Dashboard
//!
//! > **The client side of the solo admin dashboard, without the pixels.**
//!
//! This crate holds the state and behaviour of the dashboard used to manage
//! **accounts** (social-media logins), **networks** (virtual network
//! definitions) and **nodes** (hosts joined to a network). Every real action
//! happens on a remote HTTP API; the client caches reads, sends writes,
//! reports failures as alerts and sends unauthenticated users to the login page.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One owner for the cache
//! Every cached read lives in a single Tokio task, the [`ResourceCache`](framework::ResourceCache).
//! Views talk to it through a cloneable [`ResourceClient`](framework::ResourceClient) by
//! message passing, so no lock guards a cache slot and two views reading the same URL
//! share one request.
//!
//! ### Explicit context
//! Nothing is global. The alert bus, session, router and guard are created once by
//! [`Dashboard`](lifecycle::Dashboard) and passed to views in a
//! [`DashboardContext`](context::DashboardContext).
//!
//! ### Views are models
//! A view is a struct with the rows it would render and the actions it offers. A UI
//! binding draws the rows and calls the actions; tests do the same without a UI.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. List → mutate → invalidate
//! Each entity view subscribes its list read, triggers a write, and on the endpoint's
//! success code invalidates the list so it refetches. Any other code becomes an error
//! alert quoting the response body.
//!
//! ### 2. Type-Safe Error Handling
//! Each entity has its own error type ([`AccountError`](accounts::AccountError),
//! [`NetworkError`](networks::NetworkError), [`NodeError`](nodes::NodeError)) built with
//! `thiserror`, with `#[from]` conversions from the cache and transport errors.
//!
//! ### 3. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The resource cache, write handles, the HTTP transport and its mock.
//! - **Key items**: [`ResourceCache`](framework::ResourceCache),
//!   [`MutationHandle`](framework::MutationHandle), [`MockTransport`](framework::mock::MockTransport).
//!
//! ### 2. Cross-cutting state ([`alerts`], [`session`], [`navigation`], [`layout`])
//! The alert bus and regions, the redirect guard, the router and the viewport policy.
//!
//! ### 3. The Interface ([`clients`])
//! Entity clients wrapping the `ResourceClient` with typed reads and writes.
//! - **Key items**: [`CollectionClient`](clients::CollectionClient),
//!   [`AccountClient`](clients::AccountClient).
//!
//! ### 4. The Views ([`accounts`], [`networks`], [`nodes`], [`chrome`])
//! Lists, forms and the page frame.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Key items**: [`Dashboard`](lifecycle::Dashboard),
//!   [`DashboardConfig`](config::DashboardConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! export SOLO_API_BASE_URL=https://api.solo.dev
//! export SOLO_OAUTH_BASE_URL=https://auth.solo.dev
//! RUST_LOG=info cargo run -- accounts
//! ```

pub mod accounts;
pub mod alerts;
pub mod chrome;
pub mod clients;
pub mod config;
pub mod context;
pub mod forms;
pub mod framework;
pub mod layout;
pub mod lifecycle;
pub mod model;
pub mod navigation;
pub mod networks;
pub mod nodes;
pub mod session;
