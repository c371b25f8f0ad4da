//! # imageserver
//!
//! Serves JPEG images over HTTP and, when a caller asks for a smaller
//! rendition, resizes on demand and caches the result on disk.
//!
//! ```text
//! GET /albums/dawn.jpg                 → the file as stored
//! GET /albums/dawn.jpg?width=400       → 400 wide, height kept in proportion
//! GET /albums/dawn.jpg?width=400&height=100 → exactly 400x100
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`request`] | Route matching and `width`/`height` query parsing |
//! | [`source`] | Resolves request paths under the images root; reads file identity |
//! | [`cache`] | Cache keys, the on-disk rendition store, cache statistics |
//! | [`imaging`] | Decode, bounds check, Lanczos3 resize, JPEG encode |
//! | [`service`] | The per-request lifecycle, independent of HTTP |
//! | [`server`] | axum router, response mapping, graceful shutdown |
//! | [`config`] | Immutable server configuration from TOML + CLI |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Cache Identity, Not Content
//!
//! The cache key hashes a source file's path, name, size and modification
//! time rather than its bytes, so a cache hit never reads the source. Any edit
//! that changes size or mtime changes the key and the next request simply
//! misses. Nothing is ever invalidated explicitly.
//!
//! ## No Upscaling
//!
//! Asking for a dimension larger than the original is a client error (400),
//! not a silent clamp. The response is either exactly what was asked for or
//! an error.
//!
//! ## Atomic Cache Writes
//!
//! Renditions are written to a temp file next to their final location and
//! renamed into place, so concurrent requests never observe a half-written
//! file. Duplicate work under a race is accepted; duplicate *bytes* are
//! guaranteed identical because resizing and encoding are deterministic.
//!
//! ## Optional Cache
//!
//! With `--no-cache` the same pipeline runs and the encoded bytes go straight
//! to the response, leaving the file system untouched.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod request;
pub mod server;
pub mod service;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
