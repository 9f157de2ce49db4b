//! Response payloads of the YouTube Data API v3.
//!
//! Every field is optional so that a response missing a block still decodes;
//! presence is checked when a [`ChannelRecord`](crate::channel::ChannelRecord)
//! is built, which reports the exact field that was absent.

use serde::Deserialize;

use crate::error::ChannelError;

// channels.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelItem {
    pub id: Option<String>,
    pub snippet: Option<Snippet>,
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<String>,
    pub view_count: Option<String>,
    pub video_count: Option<String>,
}

// search.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    pub id: Option<SearchItemId>,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub kind: Option<String>,
    pub video_id: Option<String>,
}

impl SearchListResponse {
    /// Id of the first search hit, which is the most viewed video when the
    /// search was ordered by view count.
    pub fn top_video_id(&self) -> Result<&str, ChannelError> {
        self.items
            .first()
            .ok_or_else(|| ChannelError::malformed("search.items[0]"))?
            .id
            .as_ref()
            .ok_or_else(|| ChannelError::malformed("search.items[0].id"))?
            .video_id
            .as_deref()
            .ok_or_else(|| ChannelError::malformed("search.items[0].id.videoId"))
    }
}

// videos.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoItem {
    pub id: Option<String>,
    pub snippet: Option<Snippet>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
    pub comment_count: Option<String>,
}

/// The part of `snippet` shared by channels, search hits and videos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: Option<String>,
    pub published_at: Option<String>,
}
