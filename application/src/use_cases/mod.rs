//! Use cases (application services)

pub mod judge;
pub mod learn;
pub mod run_race;

#[cfg(test)]
pub(crate) mod testing;
