pub mod clock;
pub mod telemetry;
pub mod types;

pub use self::clock::now_ms;
pub use self::telemetry::init_tracing;
pub use self::types::{JobId, Priority};
