use std::{ops::Add, str::FromStr};

use derive_more::Display;

use super::ChannelRecord;
use crate::error::ChannelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortKey {
    #[display(fmt = "name")]
    Name,
    #[display(fmt = "subscribers")]
    Subscribers,
    #[display(fmt = "views")]
    Views,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "abc" => Ok(Self::Name),
            "subscribers" | "subs" => Ok(Self::Subscribers),
            "views" => Ok(Self::Views),
            other => Err(format!(
                "unknown sort key `{other}`, expected one of: name, subscribers, views"
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    channels: u64,
    subscribers: u64,
    views: u64,
}

// Sums saturate at u64::MAX instead of overflowing.
impl Add for Totals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            channels: self.channels.saturating_add(other.channels),
            subscribers: self.subscribers.saturating_add(other.subscribers),
            views: self.views.saturating_add(other.views),
        }
    }
}

impl From<&ChannelRecord> for Totals {
    fn from(record: &ChannelRecord) -> Self {
        Self {
            channels: 1,
            subscribers: record.subscriber_count(),
            views: record.view_count(),
        }
    }
}

/// Every aggregate of a non-empty [`ChannelCollection`] at once.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub mean_subscriber_count: u64,
    pub mean_view_count: u64,
    pub total_subscriber_count: u64,
    pub total_view_count: u64,
    pub oldest_channel: ChannelRecord,
    pub newest_channel: ChannelRecord,
    pub most_viewed_popular_video: ChannelRecord,
    /// `None` when no channel has a defined likes ratio.
    pub highest_likes_ratio: Option<ChannelRecord>,
    pub lowest_likes_ratio: Option<ChannelRecord>,
    pub most_commented_popular_video: ChannelRecord,
}

/// Ordered list of tracked channels.
///
/// Name lookups use Unicode case folding (`ß` matches `SS`) and always address the first matching
/// record, so a duplicated name can only be reached once the earlier record
/// has been removed.
#[derive(Debug, Default)]
pub struct ChannelCollection {
    channels: Vec<ChannelRecord>,
}

impl ChannelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn add(&mut self, record: ChannelRecord) {
        tracing::info!("{}: added to channel list", record.name());
        self.channels.push(record);
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ChannelRecord> {
        self.position_of(name).map(|index| &self.channels[index])
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<ChannelRecord> {
        let removed = self
            .position_of(name)
            .map(|index| self.channels.remove(index));

        if let Some(record) = &removed {
            tracing::info!("{}: removed from channel list", record.name());
        }

        removed
    }

    /// Stable sort, equal keys keep their current relative order in both
    /// directions.
    pub fn sort_by(&mut self, key: SortKey, descending: bool) {
        self.channels.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Name => a.name().cmp(b.name()),
                SortKey::Subscribers => a.subscriber_count().cmp(&b.subscriber_count()),
                SortKey::Views => a.view_count().cmp(&b.view_count()),
            };

            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    pub fn list_view(&self) -> Vec<ChannelRecord> {
        self.channels.clone()
    }

    pub fn mean_subscriber_count(&self) -> Result<u64, ChannelError> {
        let totals = self.totals()?;
        Ok(totals.subscribers / totals.channels)
    }

    pub fn mean_view_count(&self) -> Result<u64, ChannelError> {
        let totals = self.totals()?;
        Ok(totals.views / totals.channels)
    }

    pub fn total_subscriber_count(&self) -> Result<u64, ChannelError> {
        Ok(self.totals()?.subscribers)
    }

    pub fn total_view_count(&self) -> Result<u64, ChannelError> {
        Ok(self.totals()?.views)
    }

    pub fn oldest_channel(&self) -> Result<&ChannelRecord, ChannelError> {
        self.channels
            .iter()
            .min_by_key(|record| record.creation_date())
            .ok_or(ChannelError::EmptyCollection)
    }

    pub fn newest_channel(&self) -> Result<&ChannelRecord, ChannelError> {
        self.channels
            .iter()
            .max_by_key(|record| record.creation_date())
            .ok_or(ChannelError::EmptyCollection)
    }

    pub fn most_viewed_popular_video(&self) -> Result<&ChannelRecord, ChannelError> {
        self.channels
            .iter()
            .max_by_key(|record| record.most_popular_vid_views())
            .ok_or(ChannelError::EmptyCollection)
    }

    pub fn most_commented_popular_video(&self) -> Result<&ChannelRecord, ChannelError> {
        self.channels
            .iter()
            .max_by_key(|record| record.most_popular_vid_comments())
            .ok_or(ChannelError::EmptyCollection)
    }

    /// Channels whose most popular video has no likes or dislikes are
    /// skipped.
    pub fn highest_likes_ratio(&self) -> Result<&ChannelRecord, ChannelError> {
        self.ensure_not_empty()?;
        self.rated()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(record, _)| record)
            .ok_or(ChannelError::DivisionByZero {
                metric: "likes ratio",
            })
    }

    pub fn lowest_likes_ratio(&self) -> Result<&ChannelRecord, ChannelError> {
        self.ensure_not_empty()?;
        self.rated()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(record, _)| record)
            .ok_or(ChannelError::DivisionByZero {
                metric: "likes ratio",
            })
    }

    pub fn stats(&self) -> Result<CollectionStats, ChannelError> {
        let totals = self.totals()?;

        Ok(CollectionStats {
            mean_subscriber_count: totals.subscribers / totals.channels,
            mean_view_count: totals.views / totals.channels,
            total_subscriber_count: totals.subscribers,
            total_view_count: totals.views,
            oldest_channel: self.oldest_channel()?.clone(),
            newest_channel: self.newest_channel()?.clone(),
            most_viewed_popular_video: self.most_viewed_popular_video()?.clone(),
            highest_likes_ratio: self.highest_likes_ratio().ok().cloned(),
            lowest_likes_ratio: self.lowest_likes_ratio().ok().cloned(),
            most_commented_popular_video: self.most_commented_popular_video()?.clone(),
        })
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|record| caseless::default_caseless_match_str(record.name(), name))
    }

    fn ensure_not_empty(&self) -> Result<(), ChannelError> {
        if self.channels.is_empty() {
            return Err(ChannelError::EmptyCollection);
        }
        Ok(())
    }

    fn totals(&self) -> Result<Totals, ChannelError> {
        self.ensure_not_empty()?;

        Ok(self
            .channels
            .iter()
            .map(Totals::from)
            .fold(Totals::default(), |acc, x| acc + x))
    }

    fn rated(&self) -> impl Iterator<Item = (&ChannelRecord, f64)> + '_ {
        self.channels.iter().filter_map(|record| {
            record
                .most_popular_vid_likes_ratio()
                .ok()
                .map(|ratio| (record, ratio))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::fixtures::{record, Payloads};

    fn names(collection: &ChannelCollection) -> Vec<String> {
        collection
            .list_view()
            .iter()
            .map(|record| record.name().to_string())
            .collect()
    }

    fn collection_of(records: Vec<ChannelRecord>) -> ChannelCollection {
        let mut collection = ChannelCollection::new();
        records.into_iter().for_each(|record| collection.add(record));
        collection
    }

    fn with_video(name: &str, views: u64, likes: u64, dislikes: u64, comments: u64) -> ChannelRecord {
        Payloads::new(name)
            .video_stats(views, likes, dislikes, comments)
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_appends_in_order() {
        let collection = collection_of(vec![
            record("b", 1, 1, "2010-01-01"),
            record("a", 1, 1, "2010-01-01"),
        ]);
        assert_eq!(collection.len(), 2);
        assert_eq!(names(&collection), ["b", "a"]);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let collection = collection_of(vec![record("TechChannel", 5, 1, "2010-01-01")]);

        let found = collection.find_by_name("TECHCHANNEL").unwrap();
        assert_eq!(found.subscriber_count(), 5);
        assert!(collection.find_by_name("Tech").is_none());
    }

    #[test]
    fn test_find_by_name_returns_first_duplicate() {
        let collection = collection_of(vec![
            record("dup", 1, 1, "2010-01-01"),
            record("Dup", 2, 1, "2010-01-01"),
        ]);
        assert_eq!(collection.find_by_name("DUP").unwrap().subscriber_count(), 1);
    }

    #[test]
    fn test_remove_by_name_is_case_insensitive() {
        let mut collection = collection_of(vec![
            record("TechChannel", 1, 1, "2010-01-01"),
            record("Other", 1, 1, "2010-01-01"),
        ]);

        let removed = collection.remove_by_name("techchannel").unwrap();
        assert_eq!(removed.name(), "TechChannel");
        assert_eq!(names(&collection), ["Other"]);
    }

    #[test]
    fn test_remove_missing_name_leaves_collection_unchanged() {
        let mut collection = collection_of(vec![record("a", 1, 1, "2010-01-01")]);
        let before = collection.list_view();

        assert!(collection.remove_by_name("missing").is_none());
        assert_eq!(collection.list_view(), before);
    }

    #[test]
    fn test_remove_only_first_duplicate() {
        let mut collection = collection_of(vec![
            record("dup", 1, 1, "2010-01-01"),
            record("x", 1, 1, "2010-01-01"),
            record("dup", 2, 1, "2010-01-01"),
        ]);

        assert_eq!(collection.remove_by_name("dup").unwrap().subscriber_count(), 1);
        assert_eq!(names(&collection), ["x", "dup"]);
        assert_eq!(collection.remove_by_name("dup").unwrap().subscriber_count(), 2);
        assert!(collection.remove_by_name("dup").is_none());
    }

    #[test]
    fn test_sort_by_subscribers_descending() {
        let mut collection = collection_of(vec![
            record("a", 10, 1, "2010-01-01"),
            record("b", 50, 1, "2010-01-01"),
            record("c", 30, 1, "2010-01-01"),
        ]);

        collection.sort_by(SortKey::Subscribers, true);
        let counts: Vec<u64> = collection
            .list_view()
            .iter()
            .map(ChannelRecord::subscriber_count)
            .collect();
        assert_eq!(counts, [50, 30, 10]);
    }

    #[test]
    fn test_sort_by_name_is_case_sensitive() {
        let mut collection = collection_of(vec![
            record("beta", 1, 1, "2010-01-01"),
            record("Zeta", 1, 1, "2010-01-01"),
            record("alpha", 1, 1, "2010-01-01"),
        ]);

        collection.sort_by(SortKey::Name, false);
        assert_eq!(names(&collection), ["Zeta", "alpha", "beta"]);

        collection.sort_by(SortKey::Name, true);
        assert_eq!(names(&collection), ["beta", "alpha", "Zeta"]);
    }

    #[test]
    fn test_sort_by_views_ascending() {
        let mut collection = collection_of(vec![
            record("a", 1, 300, "2010-01-01"),
            record("b", 1, 100, "2010-01-01"),
            record("c", 1, 200, "2010-01-01"),
        ]);

        collection.sort_by(SortKey::Views, false);
        assert_eq!(names(&collection), ["b", "c", "a"]);
    }

    #[test]
    fn test_two_pass_sort_is_stable() {
        let mut collection = collection_of(vec![
            record("c", 10, 1, "2010-01-01"),
            record("a", 20, 1, "2010-01-01"),
            record("b", 10, 1, "2010-01-01"),
        ]);

        collection.sort_by(SortKey::Name, false);
        collection.sort_by(SortKey::Subscribers, false);
        assert_eq!(names(&collection), ["b", "c", "a"]);

        collection.sort_by(SortKey::Name, false);
        collection.sort_by(SortKey::Subscribers, true);
        assert_eq!(names(&collection), ["a", "b", "c"]);
    }

    #[test]
    fn test_list_view_is_a_copy() {
        let collection = collection_of(vec![record("a", 1, 1, "2010-01-01")]);

        let mut view = collection.list_view();
        view.clear();
        view.push(record("intruder", 1, 1, "2010-01-01"));

        assert_eq!(names(&collection), ["a"]);
    }

    #[test]
    fn test_aggregates_on_empty_collection() {
        let collection = ChannelCollection::new();

        assert_eq!(collection.mean_subscriber_count(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.mean_view_count(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.total_subscriber_count(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.total_view_count(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.oldest_channel(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.newest_channel(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.most_viewed_popular_video(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.highest_likes_ratio(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.lowest_likes_ratio(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.most_commented_popular_video(), Err(ChannelError::EmptyCollection));
        assert_eq!(collection.stats(), Err(ChannelError::EmptyCollection));
    }

    #[test]
    fn test_end_to_end_statistics() {
        let collection = collection_of(vec![
            record("A", 100, 1000, "2010-01-01"),
            record("B", 200, 500, "2015-01-01"),
        ]);

        assert_eq!(collection.oldest_channel().unwrap().name(), "A");
        assert_eq!(collection.newest_channel().unwrap().name(), "B");
        assert_eq!(collection.mean_subscriber_count(), Ok(150));
        assert_eq!(collection.total_view_count(), Ok(1500));
        assert_eq!(collection.total_subscriber_count(), Ok(300));
        assert_eq!(collection.mean_view_count(), Ok(750));
    }

    #[test]
    fn test_means_are_floored() {
        let collection = collection_of(vec![
            record("a", 1, 10, "2010-01-01"),
            record("b", 2, 10, "2010-01-01"),
        ]);
        assert_eq!(collection.mean_subscriber_count(), Ok(1));
    }

    #[test]
    fn test_creation_date_ties() {
        let collection = collection_of(vec![
            record("first", 1, 1, "2010-01-01"),
            record("second", 1, 1, "2010-01-01"),
        ]);

        assert_eq!(collection.oldest_channel().unwrap().name(), "first");
        assert_eq!(collection.newest_channel().unwrap().name(), "second");
    }

    #[test]
    fn test_popular_video_extremes() {
        let collection = collection_of(vec![
            with_video("a", 500, 10, 0, 3),
            with_video("b", 900, 10, 0, 8),
            with_video("c", 900, 10, 0, 1),
        ]);

        assert_eq!(collection.most_viewed_popular_video().unwrap().name(), "c");
        assert_eq!(collection.most_commented_popular_video().unwrap().name(), "b");
    }

    #[test]
    fn test_likes_ratio_extremes() {
        let collection = collection_of(vec![
            with_video("half", 1, 50, 50, 0),
            with_video("unrated", 1, 0, 0, 0),
            with_video("loved", 1, 99, 1, 0),
            with_video("also-half", 1, 5, 5, 0),
        ]);

        assert_eq!(collection.highest_likes_ratio().unwrap().name(), "loved");
        assert_eq!(collection.lowest_likes_ratio().unwrap().name(), "half");
    }

    #[test]
    fn test_highest_likes_ratio_tie_picks_last() {
        let collection = collection_of(vec![
            with_video("first-loved", 1, 99, 1, 0),
            with_video("half", 1, 50, 50, 0),
            with_video("second-loved", 1, 990, 10, 0),
        ]);

        assert_eq!(collection.highest_likes_ratio().unwrap().name(), "second-loved");
    }

    #[test]
    fn test_name_lookup_uses_case_folding() {
        let mut collection = collection_of(vec![record("STRASSE", 1, 1, "2010-01-01")]);

        assert_eq!(collection.find_by_name("straße").unwrap().name(), "STRASSE");
        assert_eq!(collection.remove_by_name("Straße").unwrap().name(), "STRASSE");
        assert!(collection.is_empty());
    }

    #[test]
    fn test_totals_saturate() {
        let collection = collection_of(vec![
            record("a", u64::MAX, u64::MAX, "2010-01-01"),
            record("b", 1, 1, "2010-01-01"),
        ]);

        assert_eq!(collection.total_subscriber_count(), Ok(u64::MAX));
        assert_eq!(collection.total_view_count(), Ok(u64::MAX));
        assert_eq!(collection.mean_subscriber_count(), Ok(u64::MAX / 2));
    }

    #[test]
    fn test_likes_ratio_extremes_without_votes() {
        let collection = collection_of(vec![with_video("unrated", 1, 0, 0, 0)]);

        assert!(matches!(
            collection.highest_likes_ratio(),
            Err(ChannelError::DivisionByZero { .. })
        ));

        let stats = collection.stats().unwrap();
        assert!(stats.highest_likes_ratio.is_none());
        assert!(stats.lowest_likes_ratio.is_none());
    }

    #[test]
    fn test_stats_bundle() {
        let collection = collection_of(vec![
            record("A", 100, 1000, "2010-01-01"),
            record("B", 200, 500, "2015-01-01"),
        ]);

        let stats = collection.stats().unwrap();
        assert_eq!(stats.mean_subscriber_count, 150);
        assert_eq!(stats.total_view_count, 1500);
        assert_eq!(stats.oldest_channel.name(), "A");
        assert_eq!(stats.newest_channel.name(), "B");
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!("subs".parse::<SortKey>(), Ok(SortKey::Subscribers));
        assert_eq!("views".parse::<SortKey>(), Ok(SortKey::Views));
        assert!("likes".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Subscribers.to_string(), "subscribers");
    }
}
