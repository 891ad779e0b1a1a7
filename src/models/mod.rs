// Models module

pub mod journal;
pub mod mood;
pub mod profile;

// Re-export commonly used types
pub use journal::{
    JournalEntry, JournalFilter, JournalPatch, JournalQuery, JournalWriteRequest, NewJournalEntry,
};
pub use mood::MoodRequest;
pub use profile::{StatusReport, UserProfile};
