//! Interactive overwrite driver.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::counter::SharedCounter;
use crate::events::{Bus, Event, EventKind};

/// Reads integer lines from `input` and stores each into the counter.
///
/// - Malformed lines are discarded; the loop keeps waiting for the next one.
/// - End of stream ends this driver, not the process.
/// - Cancellation aborts a pending read at the select boundary.
///
/// Each successful overwrite publishes [`EventKind::CounterOverwritten`].
pub async fn run_overwrite<R>(
    counter: SharedCounter,
    input: R,
    bus: Bus,
    token: CancellationToken,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    match trimmed.parse::<i64>() {
                        Ok(value) => {
                            counter.store(value);
                            bus.publish(Event::now(EventKind::CounterOverwritten).with_value(value));
                        }
                        Err(_) => {
                            debug!(input = trimmed, "discarding malformed counter input");
                        }
                    }
                }
                Ok(None) => {
                    debug!("counter input reached end of stream");
                    break;
                }
                Err(error) => {
                    warn!(%error, "counter input read failed");
                    break;
                }
            },
            _ = token.cancelled() => break,
        }
    }
}
