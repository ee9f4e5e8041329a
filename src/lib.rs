// src/lib.rs

//! Internet Archive client library.
//!
//! Fetches item metadata and searches the archive, decoding its loosely
//! shaped JSON into a stable model.
//!
//! ```no_run
//! use iarchive::{models::Config, services::ArchiveService};
//!
//! # async fn run() -> iarchive::error::Result<()> {
//! let service = ArchiveService::new(&Config::default())?;
//! let item = service.item_with_collections("HunterLeeBrownPianoWorks2010-2011").await?;
//! for file in item.sorted_audio_files() {
//!     println!("{} {}", file.display_name(), file.download_url(service.endpoints()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod services;
pub mod utils;
pub mod views;
