//! Text commands and their execution against a channel list.
//!
//! Parsing and execution never touch stdin or stdout, the interactive loop
//! lives in [`crate::shell`].

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context as _, Result};
use futures::{stream::FuturesUnordered, StreamExt as _};

use crate::channel::{ChannelCollection, ChannelRecord, CollectionStats, SortKey};
use crate::error::CommandError;
use crate::youtube::{channel_id_from_url, ChannelSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Channel ids, already extracted from the URLs that were typed.
    Add(Vec<String>),
    Show(String),
    Sort { key: SortKey, descending: bool },
    Delete(String),
    List,
    Stats,
    Export(PathBuf),
    Help,
    Quit,
}

impl Command {
    /// Whether the command may change the channel list or its order.
    pub fn mutates(&self) -> bool {
        matches!(self, Self::Add(_) | Self::Sort { .. } | Self::Delete(_))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb.to_lowercase().as_str() {
            "add" => {
                let ids = rest
                    .split_whitespace()
                    .map(|input| {
                        channel_id_from_url(input)
                            .map(str::to_string)
                            .ok_or_else(|| CommandError::InvalidChannel(input.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if ids.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "add",
                        expected: "at least one channel URL",
                    });
                }
                Ok(Self::Add(ids))
            }
            "show" => Ok(Self::Show(name_argument("show", rest)?)),
            "delete" | "remove" => Ok(Self::Delete(name_argument("delete", rest)?)),
            "sort" => {
                let mut args = rest.split_whitespace();
                let key: SortKey = args
                    .next()
                    .ok_or(CommandError::MissingArgument {
                        command: "sort",
                        expected: "a key: name, subscribers or views",
                    })?
                    .parse()
                    .map_err(CommandError::InvalidSortKey)?;

                // Names read A to Z by default, counts from most to least.
                let descending = match args.next().map(str::to_lowercase).as_deref() {
                    None => key != SortKey::Name,
                    Some("asc") => false,
                    Some("desc") => true,
                    Some(other) => return Err(CommandError::InvalidDirection(other.to_string())),
                };

                Ok(Self::Sort { key, descending })
            }
            "list" => Ok(Self::List),
            "stats" => Ok(Self::Stats),
            "export" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "export",
                        expected: "a file path",
                    });
                }
                Ok(Self::Export(PathBuf::from(rest)))
            }
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn name_argument(command: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a channel name",
        });
    }
    Ok(rest.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added {
        added: Vec<String>,
        /// Channel id and the reason it could not be added.
        failed: Vec<(String, String)>,
    },
    Details(ChannelRecord),
    NotFound(String),
    Removed(ChannelRecord),
    Sorted { key: SortKey, descending: bool },
    Listing(Vec<ChannelRecord>),
    Stats(CollectionStats),
    Exported { path: PathBuf, rows: usize },
    Help,
    Quit,
}

/// A channel list together with the source its records are fetched from.
pub struct Session<S> {
    source: S,
    channels: ChannelCollection,
}

impl<S: ChannelSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            channels: ChannelCollection::new(),
        }
    }

    pub fn channels(&self) -> &ChannelCollection {
        &self.channels
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::Add(ids) => self.add(ids).await,
            Command::Show(name) => match self.channels.find_by_name(&name) {
                Some(record) => Outcome::Details(record.clone()),
                None => Outcome::NotFound(name),
            },
            Command::Delete(name) => match self.channels.remove_by_name(&name) {
                Some(record) => Outcome::Removed(record),
                None => Outcome::NotFound(name),
            },
            Command::Sort { key, descending } => {
                self.channels.sort_by(key, descending);
                Outcome::Sorted { key, descending }
            }
            Command::List => Outcome::Listing(self.channels.list_view()),
            Command::Stats => Outcome::Stats(self.channels.stats()?),
            Command::Export(path) => {
                let rows = write_csv(self.channels.list_view().iter(), &path)
                    .with_context(|| format!("Failed to export to {}", path.display()))?;
                Outcome::Exported { path, rows }
            }
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        };

        Ok(outcome)
    }

    /// Fetches every channel concurrently, then appends the ones that
    /// succeeded in the order they were given.
    async fn add(&mut self, ids: Vec<String>) -> Outcome {
        let source = &self.source;
        let mut results = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| async move {
                let record = source.fetch_record(&id).await;
                (index, id, record)
            })
            .collect::<FuturesUnordered<_>>()
            .collect::<Vec<_>>()
            .await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut added = Vec::new();
        let mut failed = Vec::new();

        for (_, id, record) in results {
            match record {
                Ok(record) => {
                    added.push(record.name().to_string());
                    self.channels.add(record);
                }
                Err(error) => {
                    tracing::warn!("{id}: could not add channel: {error}");
                    failed.push((id, error.to_string()));
                }
            }
        }

        Outcome::Added { added, failed }
    }
}

fn write_csv<'a, I: Iterator<Item = &'a ChannelRecord>>(
    records: I,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut csv_writer = csv::Writer::from_writer(file);

    let mut rows = 0;
    for record in records {
        csv_writer.serialize(record)?;
        rows += 1;
    }
    csv_writer.flush()?;

    Ok(rows)
}
