pub mod fixtures;
pub mod registry;
pub mod types;

pub use fixtures::{mock_facebook_pages, MOCK_VIDEO_TITLES};
pub use registry::Catalog;
pub use types::{Channel, ChannelProfile, FacebookPage};
