mod client;
pub mod types;

pub use client::{YouTubeClient, API_BASE};

use crate::channel::ChannelRecord;
use crate::error::YouTubeError;

/// Anything that can turn a channel id into a [`ChannelRecord`].
#[allow(async_fn_in_trait)]
pub trait ChannelSource {
    async fn fetch_record(&self, channel_id: &str) -> Result<ChannelRecord, YouTubeError>;
}

impl ChannelSource for YouTubeClient {
    async fn fetch_record(&self, channel_id: &str) -> Result<ChannelRecord, YouTubeError> {
        self.fetch_channel_record(channel_id).await
    }
}

/// Extracts the channel id from a channel URL such as
/// `https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw`. A bare id is
/// returned unchanged.
pub fn channel_id_from_url(input: &str) -> Option<&str> {
    let input = input.trim().trim_end_matches('/');
    let id = input.rsplit('/').next().unwrap_or(input);
    let id = id.split(['?', '#']).next().unwrap_or(id);

    (!id.is_empty()).then_some(id)
}
