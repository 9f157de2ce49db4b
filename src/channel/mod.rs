mod collection;
mod record;

pub use collection::{ChannelCollection, CollectionStats, SortKey};
pub use record::ChannelRecord;
