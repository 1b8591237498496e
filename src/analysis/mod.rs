pub mod analyzer;
pub mod angles;
pub mod feedback;
pub mod phase;
pub mod reps;
pub mod scorer;
pub mod session;
pub mod validator;

pub use analyzer::{FrameEvaluation, FrameOutcome, SquatAnalyzer};
pub use feedback::{Feedback, FeedbackPolicy};
pub use phase::{PhaseTracker, SquatPhase};
pub use reps::RepCounter;
pub use scorer::{FormIssue, FormScorer};
pub use session::{SessionState, SessionSummary};
pub use validator::{validate, Rejection};
