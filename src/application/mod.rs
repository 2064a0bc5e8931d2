pub mod inventory;
pub mod payments;
pub mod plans;
pub mod reservations;
pub mod revenue;
pub mod swap;
pub mod vehicles;

pub use inventory::{AddStockRequest, ChangeStatusRequest, InventoryService, RemoveStockRequest};
pub use payments::{PaymentIntent, PaymentsService};
pub use plans::{PlanService, PlanView};
pub use reservations::{CancelRequest, ReservationFilter, ReservationQueue};
pub use revenue::{compute_revenue_stats, RevenueReporter, RevenueStats};
pub use swap::SwapWorkflowEngine;
pub use vehicles::{RegisterVehicleRequest, VehicleService};
