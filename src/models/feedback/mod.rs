pub mod fallback;
pub mod store;
pub mod sync;
pub mod types;

pub use fallback::{FALLBACK_FEEDBACK, SampleFeedback, fallback_records};
pub use store::FeedbackStore;
pub use sync::{FeedbackService, FeedbackSync, LoadOutcome, VoteOutcome};
pub use types::{FeedbackForm, FeedbackRecord, NewFeedback, VoteDirection, VoteRequest};
