mod model;

pub use model::{CancelReason, ReservationStatus, SlotReservation};
