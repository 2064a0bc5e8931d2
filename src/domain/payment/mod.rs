mod model;
mod vnpay;

pub use model::{Payment, PaymentMethod, PaymentStatus};
pub use vnpay::{parse_return, VnpayOutcome};
