//! JSON-lines front end of the fix2pose node
//!
//! Inbound events arrive one per line, tagged by stream
//! (`{"fix": {...}}`). Fused outputs leave the same way
//! (`{"pose": {...}}`, `{"transform": {...}}`).

use crate::common::msg::{PoseStamped, TransformStamped};
use crate::dispatch::InboundEvent;
use crate::error::{ConfigError, LineError};
use log::{debug, warn};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

pub const PARAMS_FILE_FLAG: &str = "--params-file";

/// One line of node output
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundMessage<'a> {
    Pose(&'a PoseStamped),
    Transform(&'a TransformStamped),
}

/// Counters for one pass over the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub events: u64,
    pub skipped: u64,
}

/// Parameter file from the command line: `--params-file <path>` as in a ROS
/// launch, or a bare path. `None` means run on defaults.
pub fn params_file_from_args<I>(args: I) -> Result<Option<PathBuf>, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if let Some(i) = args.iter().position(|a| a == PARAMS_FILE_FLAG) {
        return match args.get(i + 1) {
            Some(path) if !path.starts_with("--") => Ok(Some(PathBuf::from(path))),
            _ => Err(ConfigError::MissingArgument(PARAMS_FILE_FLAG)),
        };
    }
    Ok(args
        .into_iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from))
}

/// Decode one raw input line. Blank lines yield `None`.
pub fn decode_line(raw: &[u8]) -> Result<Option<InboundEvent>, LineError> {
    let line = std::str::from_utf8(raw)?.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Forward events from `input` until EOF or until the dispatcher goes away.
/// Lines that are not UTF-8 or not a known event are logged and skipped.
pub async fn read_events<R>(
    mut input: R,
    events: mpsc::Sender<InboundEvent>,
) -> io::Result<InputStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = InputStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        match decode_line(&buf) {
            Ok(Some(event)) => {
                if events.send(event).await.is_err() {
                    debug!("dispatcher stopped, no longer reading input");
                    break;
                }
                stats.events += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("skipping malformed input line: {}", e);
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

/// Write fused outputs as JSON lines until both channels close.
/// Returns the number of lines written.
pub async fn write_outputs<W>(
    mut output: W,
    mut poses: mpsc::UnboundedReceiver<PoseStamped>,
    mut transforms: mpsc::UnboundedReceiver<TransformStamped>,
) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut poses_open = true;
    let mut transforms_open = true;
    let mut written = 0;
    while poses_open || transforms_open {
        let mut line = tokio::select! {
            pose = poses.recv(), if poses_open => match pose {
                Some(pose) => serde_json::to_vec(&OutboundMessage::Pose(&pose))?,
                None => {
                    poses_open = false;
                    continue;
                }
            },
            tf = transforms.recv(), if transforms_open => match tf {
                Some(tf) => serde_json::to_vec(&OutboundMessage::Transform(&tf))?,
                None => {
                    transforms_open = false;
                    continue;
                }
            },
        };
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
        written += 1;
    }
    Ok(written)
}
