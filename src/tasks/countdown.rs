//! Countdown background task

use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::context::Context;

/// Count down once per second until `ctx` is done, returning the seconds left
pub async fn countdown(ctx: Context, seconds: u64) -> u64 {
    let mut remaining = seconds;

    loop {
        tokio::select! {
            biased;

            _ = ctx.done() => {
                info!("Context cancelled, leaving");
                return remaining;
            }
            _ = sleep(Duration::from_secs(1)) => {
                remaining = remaining.saturating_sub(1);
                info!("{} seconds remaining", remaining);
            }
        }
    }
}
