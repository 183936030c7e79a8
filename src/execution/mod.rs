// Trade cycle orchestration and cooperative shutdown
pub mod session;
pub mod stop;

pub use session::{CycleOutcome, StopReason, TradingSession};
pub use stop::StopSignal;
