//! # Swapstation Ops
//!
//! Station-side operations service layer for an EV battery-swap network:
//! reservation queue, swap workflow, battery inventory, payments and
//! revenue reporting, all driven against the platform's REST backend.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, classification rules and ports
//! - **application**: Workflow services (queue, swap engine, inventory, revenue)
//! - **infrastructure**: External concerns (HTTP gateway, session store)
//! - **shared**: Cross-cutting helpers (pagination, wire decoding)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, init_tracing, AppConfig};

// Re-export the gateway and session types for easy access
pub use infrastructure::http::HttpApiGateway;
pub use infrastructure::session::{SessionState, SessionStore, StaffProfile};

// Re-export the service layer
pub use application::{
    InventoryService, PaymentsService, PlanService, ReservationQueue, RevenueReporter,
    SwapWorkflowEngine, VehicleService,
};

pub use domain::{ApiError, DomainError, DomainResult};
