//! Integration test modules.

mod gamification_flow_test;
mod persistence_test;
mod progress_flow_test;
