//! Command entry points

pub mod install;
