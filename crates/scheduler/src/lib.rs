pub mod scheduler;
pub mod ticker;
pub mod trigger;

pub use scheduler::LogScheduler;
pub use ticker::Ticker;
