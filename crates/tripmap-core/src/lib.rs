//! tripmap core - POI model, region catalog, zone assignment and artifact writers
//!
//! This crate turns a table of travel points of interest into two artifacts: a KML file for
//! mobile map apps and a self-contained interactive planner page.

pub mod assign;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod ports;

pub use error::{Result, TripmapError};
