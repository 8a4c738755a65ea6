// src/lib.rs
//! Reads a publicly published Google Sheet through its gviz query endpoint
//! and keeps it on screen as a list of excuses or as a table, optionally
//! reloading every five seconds.

pub mod cloud_handler;
pub mod config;
pub mod data_types;
pub mod error;
pub mod gviz;
pub mod load_state;
pub mod logging;
pub mod notice;
pub mod scheduler;
pub mod viewer;

pub use cloud_handler::{HttpFetcher, SheetFetcher, SheetLoader};
pub use config::Config;
pub use data_types::{DisplayMode, Excuse, ExcuseList, SheetData, SourceReference, TableData};
pub use error::FetchError;
pub use load_state::{Completion, Generation, LoadState, SheetSession};
pub use viewer::{LoadTicket, Viewer};
