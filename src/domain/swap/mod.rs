mod model;

pub use model::{BatteryDescriptor, PaymentType, SwapResult, SwapStatus, SwapTransaction};
