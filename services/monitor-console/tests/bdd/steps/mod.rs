//! BDD step definitions for the monitor console

pub mod polling_steps;
