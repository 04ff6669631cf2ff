//! # Waypin Core
//!
//! Core library for the waypin photo-pin pipeline: location photo search,
//! image fetch-and-cache with per-slot cancellation, and the pin/photo store
//! ports the UI layer consumes.
//!
//! ## Overview
//!
//! Two cooperating units compose the pipeline:
//!
//! - [`provider`]: given a coordinate, builds a bounded geographic query,
//!   issues a single request, and parses the response into photo descriptors.
//! - [`image_service`]: given a record's remote URL, resolves image bytes
//!   through a two-tier cache ([`cache`]), fetching on miss and writing the
//!   result back so the next resolution is a pure cache hit.
//!
//! Around them: [`store`] defines the persisted pin/photo collaborator
//! contract (plus an in-memory reference adapter), [`slot`] carries the one
//! correctness-critical rule of the pipeline (a reused UI slot must never
//! display a stale fetch's result), [`sample`] picks bounded subsets for
//! collection resets, and [`collection`] orchestrates a full refresh.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod cache;
pub mod collection;
pub mod error;
pub mod image_service;
pub mod provider;
pub mod sample;
pub mod slot;
pub mod store;

pub use cache::{ImageBlobStore, ImageCache, ImageCacheKey, ImageCacheRoot};
pub use collection::CollectionService;
pub use error::{Error, Result};
pub use image_service::{
    FetchHandle, FetchOutcome, ImageService, ImageTransport, ReqwestTransport,
};
pub use provider::{FlickrApiProvider, PhotoSearch, parse_search_response};
pub use sample::pick_indices;
pub use slot::Slot;
pub use store::{
    ChangeEvent, MemoryStore, PersistentStore, PhotoRepository, PinRepository,
};
