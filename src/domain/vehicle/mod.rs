mod model;

pub use model::{RegistrationScan, Vehicle, VehicleDraft, SCAN_CONFIDENCE_THRESHOLD};
