//! Unit test modules.

mod levels_test;
mod streak_test;
