//! Core of the payments insights dashboard: fact store access, cached
//! aggregations, boundary enrichment and the report views.

pub mod aggregation;
pub mod boundary;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod derived;
pub mod enrichment;
pub mod error;
pub mod facts;
pub mod filter;
pub mod format;
pub mod panel;
pub mod request;
pub mod rng;
pub mod sequencer;
pub mod store;
pub mod types;
pub mod views;
