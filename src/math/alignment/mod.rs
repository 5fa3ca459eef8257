// src/math/alignment/mod.rs

// Brute-Force-Suche über diskretisierte Drehwinkel und Sub-Zellen-Offsets
pub mod cancel;
pub mod candidates;
pub mod config;
pub mod profile;
pub mod search;
pub mod yield_point;

pub use self::cancel::CancellationToken;
pub use self::candidates::CandidateAngles;
pub use self::config::SearchConfig;
pub use self::profile::SearchProfile;
pub use self::search::{AlignmentResult, AlignmentSearch, SearchOutcome, find_best_alignment};
pub use self::yield_point::{CooperativeYield, NoYield, ThreadYield, YieldPoint};
