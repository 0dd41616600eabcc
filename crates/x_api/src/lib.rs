//! Blocking client for the X v2 read endpoints behind the [`Fetcher`] seam.
//!
//! [`Fetcher`]: xwatch_core::Fetcher

mod client;
mod convert;
mod wire;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, XClient, XClientConfig};
