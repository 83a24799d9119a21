//! Crate tests and test utils


mod connection;
