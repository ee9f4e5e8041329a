//! Service layer for the archive client.
//!
//! This module contains:
//! - Request orchestration (`ArchiveService`)
//! - The HTTP seam it talks through (`Transport`, `ReqwestTransport`)
//! - Canned mock payloads
//! - Event-driven feeds (`ItemFeed`, `SearchFeed`)

mod archive;
mod feed;
pub mod mock;
mod transport;

pub use archive::{ArchiveService, DataSource};
pub use feed::{FeedReceiver, ItemFeed, RequestFeed, RequestState, SearchFeed};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
