//! stateflow cloud resource adapters
//!
//! This crate connects remote resource types to the convergence poller in
//! `stateflow-wait`, turning each service's status vocabulary into wait
//! specifications and reporting failures with the resource they concern.
//!
//! # Supported Resources
//!
//! - **Glue**: Integration Table Properties (create, update, delete waits)
//! - **Organizations**: Account (create wait, transient-error retry)
//! - **Rekognition**: Stream Processor (update wait)
//! - **CloudFront**: Continuous Deployment Policy (synchronous, no waits)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              resource lifecycle call             │
//! │           (create / update / delete)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                stateflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Adapter Abstraction              │   │
//! │  │  trait ResourceAdapter { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Catalog    │  │  Timeouts    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ stateflow-wait│ │stateflow-config│
//! │    poller     │ │   settings    │
//! └───────────────┘ └───────────────┘
//! ```

pub mod action;
pub mod adapter;
pub mod catalog;
pub mod error;
pub mod timeouts;

// Re-exports
pub use action::{ActionType, Settled};
pub use adapter::{ResourceAdapter, apply, settle, submit};
pub use catalog::ResourceKind;
pub use error::{ApiError, CloudError, Result, WaitFailure};
pub use timeouts::{ResourceTimeouts, Tuning, retry_config, spec_builder};
