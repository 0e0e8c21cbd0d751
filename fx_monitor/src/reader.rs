use crossbeam_channel::Sender;
use fx_common::MonitorError;
use fx_common::command::FeedMessage;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Message sent by the reader thread to the dispatcher thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderEvent {
    /// One decoded feed line.
    Message(FeedMessage),
    /// Input exhausted.
    End,
}

/// Line-oriented feed reader.
///
/// Decodes each line into a `FeedMessage` and forwards it to a channel. A line that
/// cannot be decoded is logged and skipped; only I/O failures and a closed channel end
/// the loop early.
pub struct FeedReader {
    /// Source of feed lines.
    pub(crate) input: Box<dyn BufRead + Send>,
    /// Human-readable source name for logs.
    pub(crate) source: String,
}

impl FeedReader {
    /// Reader over a file.
    pub fn open(path: &Path) -> Result<Self, MonitorError> {
        let file = File::open(path)?;
        Ok(Self {
            input: Box::new(BufReader::new(file)),
            source: path.display().to_string(),
        })
    }

    /// Reader over stdin.
    pub fn stdin() -> Self {
        Self {
            input: Box::new(BufReader::new(std::io::stdin())),
            source: String::from("stdin"),
        }
    }

    /// Reader over an arbitrary buffered source.
    #[cfg(test)]
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, source: &str) -> Self {
        Self {
            input: Box::new(reader),
            source: source.to_string(),
        }
    }

    /// Blocking loop that forwards every decoded line to `tx`, then `ReaderEvent::End`.
    pub(crate) fn read_loop_with_channel(self, tx: Sender<ReaderEvent>) -> Result<u64, MonitorError> {
        info!("Reading feed from {}", self.source);
        let mut forwarded = 0;

        for (index, line) in self.input.lines().enumerate() {
            let line = line?;
            match FeedMessage::parse_line(&line) {
                Ok(Some(message)) => {
                    tx.send(ReaderEvent::Message(message))
                        .map_err(|e| MonitorError::ChannelSend(e.to_string()))?;
                    forwarded += 1;
                }
                Ok(None) => debug!("Skipping line {}: no payload", index + 1),
                Err(e) => warn!("Skipping line {} of {}: {}", index + 1, self.source, e),
            }
        }

        info!("Feed {} exhausted after {} messages", self.source, forwarded);
        tx.send(ReaderEvent::End)
            .map_err(|e| MonitorError::ChannelSend(e.to_string()))?;
        Ok(forwarded)
    }
}
