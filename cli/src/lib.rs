//! Scaffolding and package management for Ontario.ca Frontend projects.
//!
//! The `ontario-frontend` binary is a thin shell over these modules: it parses
//! arguments, loads [`config::CliConfig`], and renders the outcomes returned by
//! [`orchestrator::Orchestrator`] and [`create::create_project`].

pub mod command;
pub mod common;
pub mod config;
pub mod create;
pub mod error;
pub mod installer;
pub mod orchestrator;
pub mod project;
pub mod registry;
pub mod transfer;
