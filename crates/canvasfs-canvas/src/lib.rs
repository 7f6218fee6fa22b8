//! Canvas LMS backend for canvasfs.
//!
//! [`CanvasClient`] implements [`canvasfs_kernel::RemoteApi`] over the
//! Canvas REST API (`/api/v1`), authenticating with a personal access
//! token. List endpoints are paginated through `Link` headers; a 404 from
//! any endpoint becomes `RemoteError::NotFound` and every other failure
//! becomes `RemoteError::Unavailable`.

mod client;
mod link;
mod wire;

pub use client::{CanvasClient, CanvasConfig, DEFAULT_API_URL};
pub use link::parse_next_link;
