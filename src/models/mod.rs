//! Data models for the field sales manager service

pub mod enums;
pub mod report;
pub mod session;
pub mod visit;

// Re-export commonly used types
pub use enums::{ExceptionReason, FlagKind, StaffRole};
pub use session::{Company, Session, SessionToken, SessionUser};
pub use visit::{classify, ClassifiedVisit, ReviewDecision, Visit, VisitState};
