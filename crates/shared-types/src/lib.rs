pub mod error;

// Sentencing domain modules (canonical locations for all domain types)
pub mod calculation;
pub mod offence;
pub mod retrieval;

pub use error::*;

// Re-export all domain types
pub use calculation::*;
pub use offence::*;
pub use retrieval::*;
