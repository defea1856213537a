pub mod core;

pub use core::errors::CoreError;
pub use core::models::{ContactInfo, JobKeywords, MatchResult, MatcherSettings, ResumeMatchReport};
pub use core::service::MatchService;
