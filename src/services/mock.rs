// src/services/mock.rs

//! Canned payloads served in mock mode.

/// The kinds of upstream call the orchestrator makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Metadata,
    Search,
    AlternateSearch,
}

const ITEM: &str = include_str!("../../data/mock/item.json");
const SEARCH: &str = include_str!("../../data/mock/search.json");
const ALTERNATE_SEARCH: &str = include_str!("../../data/mock/alternate_search.json");

/// Identifier of the canned item document.
pub const MOCK_IDENTIFIER: &str = "HunterLeeBrownPianoWorks2010-2011";

/// Body returned for every request of `kind`, regardless of its parameters.
pub fn payload(kind: RequestKind) -> &'static [u8] {
    match kind {
        RequestKind::Metadata => ITEM.as_bytes(),
        RequestKind::Search => SEARCH.as_bytes(),
        RequestKind::AlternateSearch => ALTERNATE_SEARCH.as_bytes(),
    }
}
