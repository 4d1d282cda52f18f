//! Google Places (New) and PageSpeed Insights clients with a details cache.

pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod pagespeed;
pub(crate) mod retry;
pub mod types;

pub use cache::{CachedRestaurant, DetailsCache};
pub use client::{NearbyOptions, PlacesClient, SearchOptions};
pub use error::PlacesError;
pub use pagespeed::PageSpeedClient;
