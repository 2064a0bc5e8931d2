pub mod battery;
pub mod error;
pub mod payment;
pub mod plan;
pub mod ports;
pub mod reservation;
pub mod swap;
pub mod vehicle;

// Re-export commonly used types
pub use battery::{
    BatteryStatus, BatteryUnit, CapacityBand, ConditionCategory, InventoryFilter, InventorySort,
    InventoryStats, ModelFamily,
};
pub use error::{ApiError, ApiResult, DomainError, DomainResult};
pub use payment::{Payment, PaymentMethod, PaymentStatus, VnpayOutcome};
pub use plan::{BillingPeriod, Pricing, SubscriptionPlan};
pub use ports::{ApiGateway, FilePart, MultipartForm, SessionContext};
pub use reservation::{CancelReason, ReservationStatus, SlotReservation};
pub use swap::{BatteryDescriptor, PaymentType, SwapResult, SwapStatus, SwapTransaction};
pub use vehicle::{RegistrationScan, Vehicle, VehicleDraft};
