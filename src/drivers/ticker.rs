//! Periodic incrementer driver.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::counter::SharedCounter;

/// Increments the counter by 1 every `period` until cancelled.
///
/// Runs in every instance, leader or follower. The only exit path is the
/// token; the sleep is the loop's sole suspension point.
pub async fn run_ticker(counter: SharedCounter, period: Duration, token: CancellationToken) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                counter.add(1);
            }
            _ = token.cancelled() => break,
        }
    }
}
