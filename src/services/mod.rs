pub mod filtering;
pub mod inspiration;
pub mod interactions;
pub mod merging;
pub mod onboarding;
pub mod orchestrator;
pub mod planner;
pub mod providers;
pub mod random;
pub mod taste;
pub mod title_search;
