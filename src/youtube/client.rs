use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{ChannelListResponse, SearchListResponse, VideoListResponse};
use crate::channel::ChannelRecord;
use crate::error::{ChannelError, YouTubeError};

pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const SEARCH_MAX_RESULTS: &str = "10";

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelListResponse, YouTubeError> {
        self.get("channels", &[("part", "statistics,snippet"), ("id", channel_id)])
            .await
    }

    /// Searches the channel's videos ordered by view count, so the first hit
    /// is its most viewed video.
    #[tracing::instrument(skip(self), err)]
    pub async fn search_most_popular_video(
        &self,
        channel_id: &str,
    ) -> Result<SearchListResponse, YouTubeError> {
        self.get(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("order", "viewCount"),
                ("type", "video"),
                ("maxResults", SEARCH_MAX_RESULTS),
                ("safeSearch", "none"),
            ],
        )
        .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn fetch_video(&self, video_id: &str) -> Result<VideoListResponse, YouTubeError> {
        self.get("videos", &[("part", "statistics,snippet"), ("id", video_id)])
            .await
    }

    /// Runs the three requests a channel needs and builds its record.
    pub async fn fetch_channel_record(&self, channel_id: &str) -> Result<ChannelRecord, YouTubeError> {
        let channel = self.fetch_channel(channel_id).await?;
        if channel.items.is_empty() {
            return Err(ChannelError::malformed("channel.items[0]").into());
        }

        let search = self.search_most_popular_video(channel_id).await?;
        let video = self.fetch_video(search.top_video_id()?).await?;

        let record = ChannelRecord::from_payloads(channel_id, &channel, &search, &video)?;
        tracing::info!(
            "{}: fetched channel, most popular video is {}",
            record.name(),
            record.most_popular_vid_id()
        );

        Ok(record)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(YouTubeError::InvalidApiKey),
            status @ (StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN) => {
                let body = response.text().await?;

                if body.contains("quotaExceeded") {
                    tracing::error!("Quota exceeded - daily limit reached");
                    Err(YouTubeError::QuotaExceeded)
                } else if body.contains("keyInvalid") || status == StatusCode::FORBIDDEN {
                    Err(YouTubeError::InvalidApiKey)
                } else {
                    Err(YouTubeError::UnexpectedStatus { status, body })
                }
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(YouTubeError::UnexpectedStatus { status, body })
            }
        }
    }
}
