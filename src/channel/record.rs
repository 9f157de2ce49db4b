use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ChannelError;
use crate::youtube::types::{ChannelListResponse, SearchListResponse, VideoListResponse};

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// A channel together with a snapshot of its most viewed video, taken when
/// the channel was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    channel_id: String,
    name: String,
    creation_date: NaiveDate,
    subscriber_count: u64,
    view_count: u64,
    video_count: u64,

    most_popular_vid_id: String,
    most_popular_vid_title: String,
    most_popular_vid_date: NaiveDate,
    most_popular_vid_views: u64,
    most_popular_vid_likes: u64,
    most_popular_vid_dislikes: u64,
    most_popular_vid_comments: u64,
}

impl ChannelRecord {
    pub fn from_payloads(
        channel_id: impl Into<String>,
        channel: &ChannelListResponse,
        search: &SearchListResponse,
        video: &VideoListResponse,
    ) -> Result<Self, ChannelError> {
        let channel = channel
            .items
            .first()
            .ok_or_else(|| ChannelError::malformed("channel.items[0]"))?;
        let channel_snippet = required(channel.snippet.as_ref(), "channel.snippet")?;
        let channel_stats = required(channel.statistics.as_ref(), "channel.statistics")?;

        let most_popular_vid_id = search.top_video_id()?.to_string();

        let video = video
            .items
            .first()
            .ok_or_else(|| ChannelError::malformed("video.items[0]"))?;
        let video_snippet = required(video.snippet.as_ref(), "video.snippet")?;
        let video_stats = required(video.statistics.as_ref(), "video.statistics")?;

        Ok(Self {
            channel_id: channel_id.into(),
            name: required(channel_snippet.title.as_ref(), "channel.snippet.title")?.clone(),
            creation_date: parse_date(
                channel_snippet.published_at.as_deref(),
                "channel.snippet.publishedAt",
            )?,
            subscriber_count: parse_count(
                channel_stats.subscriber_count.as_deref(),
                "channel.statistics.subscriberCount",
            )?,
            view_count: parse_count(
                channel_stats.view_count.as_deref(),
                "channel.statistics.viewCount",
            )?,
            video_count: parse_count(
                channel_stats.video_count.as_deref(),
                "channel.statistics.videoCount",
            )?,

            most_popular_vid_id,
            most_popular_vid_title: required(video_snippet.title.as_ref(), "video.snippet.title")?
                .clone(),
            most_popular_vid_date: parse_date(
                video_snippet.published_at.as_deref(),
                "video.snippet.publishedAt",
            )?,
            most_popular_vid_views: parse_count(
                video_stats.view_count.as_deref(),
                "video.statistics.viewCount",
            )?,
            most_popular_vid_likes: parse_count(
                video_stats.like_count.as_deref(),
                "video.statistics.likeCount",
            )?,
            most_popular_vid_dislikes: parse_count(
                video_stats.dislike_count.as_deref(),
                "video.statistics.dislikeCount",
            )?,
            most_popular_vid_comments: parse_count(
                video_stats.comment_count.as_deref(),
                "video.statistics.commentCount",
            )?,
        })
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creation_date(&self) -> NaiveDate {
        self.creation_date
    }

    pub fn subscriber_count(&self) -> u64 {
        self.subscriber_count
    }

    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    pub fn video_count(&self) -> u64 {
        self.video_count
    }

    pub fn average_views_per_video(&self) -> Result<u64, ChannelError> {
        self.view_count
            .checked_div(self.video_count)
            .ok_or(ChannelError::DivisionByZero {
                metric: "average views per video",
            })
    }

    pub fn most_popular_vid_id(&self) -> &str {
        &self.most_popular_vid_id
    }

    pub fn most_popular_vid_title(&self) -> &str {
        &self.most_popular_vid_title
    }

    pub fn most_popular_vid_date(&self) -> NaiveDate {
        self.most_popular_vid_date
    }

    pub fn most_popular_vid_views(&self) -> u64 {
        self.most_popular_vid_views
    }

    pub fn most_popular_vid_likes(&self) -> u64 {
        self.most_popular_vid_likes
    }

    pub fn most_popular_vid_dislikes(&self) -> u64 {
        self.most_popular_vid_dislikes
    }

    pub fn most_popular_vid_comments(&self) -> u64 {
        self.most_popular_vid_comments
    }

    /// Percentage of likes among likes and dislikes, rounded to two decimals
    /// with ties going to the even digit.
    pub fn most_popular_vid_likes_ratio(&self) -> Result<f64, ChannelError> {
        let votes = self
            .most_popular_vid_likes
            .saturating_add(self.most_popular_vid_dislikes);
        if votes == 0 {
            return Err(ChannelError::DivisionByZero {
                metric: "likes ratio",
            });
        }

        let ratio = self.most_popular_vid_likes as f64 / votes as f64 * 100.;
        Ok((ratio * 100.).round_ties_even() / 100.)
    }
}

fn required<'a, T>(value: Option<&'a T>, field: &str) -> Result<&'a T, ChannelError> {
    value.ok_or_else(|| ChannelError::malformed(field))
}

fn parse_count(value: Option<&str>, field: &str) -> Result<u64, ChannelError> {
    value
        .and_then(|count| count.trim().parse().ok())
        .ok_or_else(|| ChannelError::malformed(field))
}

// Timestamps look like `2010-01-01T12:00:00Z`, only the date part is kept.
fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ChannelError> {
    value
        .and_then(|timestamp| timestamp.get(..DATE_LEN))
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .ok_or_else(|| ChannelError::malformed(field))
}
