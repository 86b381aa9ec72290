//! # meme-render-client
//!
//! Outbound HTTP for the meme bot:
//! - [`RenderClient`]: `POST <base>/memes/<id>/` multipart render call, failures classified as [`RenderError`].
//! - [`AvatarClient`]: avatar download by platform user id; failures are non-fatal.
//! - [`CatalogFetcher`]: offline refresh of the catalog document from `/memes/keys` and `/memes/<key>/info`.

mod avatar;
mod catalog_fetch;
mod endpoint;
mod error;
mod render;

pub use avatar::{AvatarClient, DEFAULT_AVATAR_URL_TEMPLATE};
pub use catalog_fetch::CatalogFetcher;
pub use error::{AvatarError, CatalogFetchError, RenderError};
pub use render::{MemeRequest, RenderClient};
