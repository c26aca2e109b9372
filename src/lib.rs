//! Polizas Server Library
//!
//! This crate exposes the batch pipeline and HTTP router for
//! integration testing. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `batch`: Batch sessions and the sequential processing pipeline
//! - `extract`: Text extraction behind the `TextExtractor` seam
//! - `matcher`: Policy-number matching over extracted text
//! - `archive`: In-memory ZIP assembly for the output

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod routes;
pub mod state;
