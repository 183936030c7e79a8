// Risk management module
pub mod martingale;
pub mod session_guard;

pub use martingale::{MartingaleConfig, StakeController, StakeState, StakeUpdate};
pub use session_guard::{GuardVerdict, RiskGuard, SessionLedger, SessionLimits};
