//! Outbound adapters implementing domain ports against real engines.

pub mod persistence;
