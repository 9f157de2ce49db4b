use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::channel::{ChannelRecord, CollectionStats};
use crate::command::{Command, Outcome, Session};
use crate::youtube::ChannelSource;

const HELP: &str = "\
Commands:
  add <channel url>...                      add channels to the list
  show <name>                               statistics of one channel
  sort <name|subscribers|views> [asc|desc]  sort the list
  delete <name>                             remove a channel from the list
  list                                      print the list
  stats                                     statistics of the whole list
  export <path>                             write the list to a CSV file
  help                                      print this message
  quit                                      leave
";

const SEPARATOR: &str = "-----|------------------------|---------------|---------------|";

/// Reads commands line by line until `quit` or end of input.
pub async fn run<S, R, W>(session: &mut Session<S>, input: R, out: &mut W) -> Result<()>
where
    S: ChannelSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    write!(out, "{HELP}")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };
        let mutates = command.mutates();

        match session.execute(command).await {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => write!(out, "{}", render(&outcome))?,
            Err(error) => writeln!(out, "Error: {error:#}")?,
        }

        if mutates {
            write!(out, "{}", render_table(&session.channels().list_view()))?;
        }
    }

    Ok(())
}

pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added { added, failed } => {
            let mut text = String::new();
            for name in added {
                text += &format!("Added {name}\n");
            }
            for (id, reason) in failed {
                text += &format!("Could not add {id}: {reason}\n");
            }
            text
        }
        Outcome::Details(record) => render_details(record),
        Outcome::NotFound(name) => format!("{name} is not in your channel list\n"),
        Outcome::Removed(record) => format!("Removed {}\n", record.name()),
        Outcome::Sorted { key, descending } => format!(
            "Sorted by {key} ({})\n",
            if *descending { "descending" } else { "ascending" }
        ),
        Outcome::Listing(records) => render_table(records),
        Outcome::Stats(stats) => render_stats(stats),
        Outcome::Exported { path, rows } => {
            format!("Exported {rows} channel(s) to {}\n", path.display())
        }
        Outcome::Help => HELP.to_string(),
        Outcome::Quit => String::new(),
    }
}

fn render_table(records: &[ChannelRecord]) -> String {
    let mut text = String::from("\nYour current channel list:\n\n");
    text += " No. |          Name          |  Subscribers  |  Total Views  |\n";
    text += SEPARATOR;
    text += "\n";

    for (i, record) in records.iter().enumerate() {
        text += &format!(
            "{:<5}|{:<24}|{:<15}|{:<15}|\n",
            i + 1,
            record.name(),
            record.subscriber_count(),
            record.view_count()
        );
        text += SEPARATOR;
        text += "\n";
    }

    text
}

fn render_details(record: &ChannelRecord) -> String {
    let average = record
        .average_views_per_video()
        .map(|average| average.to_string())
        .unwrap_or_else(|_| "n/a".to_string());
    let ratio = record
        .most_popular_vid_likes_ratio()
        .map(|ratio| format!("{ratio}% likes"))
        .unwrap_or_else(|_| "no votes".to_string());

    format!(
        "\nChannel name: {}\n\
         Creation date: {}\n\
         Subscriber count: {}\n\
         View count: {}\n\
         Video count: {}\n\
         Average views per video: {average}\n\
         \n\
         Most popular video title: {}\n\
         Most popular video publish date: {}\n\
         Most popular video view count: {}\n\
         Most popular video likes/dislikes: {} / {} ({ratio})\n\
         Most popular video comment count: {}\n",
        record.name(),
        record.creation_date(),
        record.subscriber_count(),
        record.view_count(),
        record.video_count(),
        record.most_popular_vid_title(),
        record.most_popular_vid_date(),
        record.most_popular_vid_views(),
        record.most_popular_vid_likes(),
        record.most_popular_vid_dislikes(),
        record.most_popular_vid_comments(),
    )
}

fn render_likes_ratio(label: &str, record: Option<&ChannelRecord>) -> String {
    match record {
        Some(record) => format!(
            "{label} like ratio (based on most popular video): {} ({}% likes)\n",
            record.name(),
            record.most_popular_vid_likes_ratio().unwrap_or_default()
        ),
        None => format!("{label} like ratio (based on most popular video): n/a\n"),
    }
}

fn render_stats(stats: &CollectionStats) -> String {
    let mut text = format!(
        "\nMean subscribers: {}\n\
         Mean view count: {}\n\
         Total subscribers: {}\n\
         Total view count: {}\n\
         Oldest channel: {}\n\
         Newest channel: {}\n\
         Most popular video: {}\n",
        stats.mean_subscriber_count,
        stats.mean_view_count,
        stats.total_subscriber_count,
        stats.total_view_count,
        stats.oldest_channel.name(),
        stats.newest_channel.name(),
        stats.most_viewed_popular_video.most_popular_vid_title(),
    );
    text += &render_likes_ratio("Highest", stats.highest_likes_ratio.as_ref());
    text += &render_likes_ratio("Lowest", stats.lowest_likes_ratio.as_ref());
    text += &format!(
        "Most commented video (based on most popular video): {}\n",
        stats.most_commented_popular_video.most_popular_vid_title()
    );

    text
}
