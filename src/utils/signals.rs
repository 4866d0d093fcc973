//! Signal handling for graceful shutdown

use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::stream::{BoxStream, Stream, StreamExt};
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Signals that ask the process to stop: interrupt, terminate and quit
pub const TERMINATION_SIGNALS: [i32; 3] = [SIGINT, SIGTERM, SIGQUIT];

/// Human readable name for a signal number
pub fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        SIGQUIT => "SIGQUIT",
        _ => "unknown",
    }
}

enum SignalSource {
    Os,
    Stream(BoxStream<'static, i32>),
}

/// Turns the first termination signal into a one-shot [`ShutdownNotice`]
pub struct SignalWatcher {
    source: SignalSource,
}

impl SignalWatcher {
    /// Watch the termination signals delivered to this process
    pub fn new() -> Self {
        Self {
            source: SignalSource::Os,
        }
    }

    /// Watch signal numbers produced by `stream` instead of the OS
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = i32> + Send + 'static,
    {
        Self {
            source: SignalSource::Stream(stream.boxed()),
        }
    }

    /// Register interest in [`TERMINATION_SIGNALS`] and start waiting.
    ///
    /// Registration happens before this returns, so a signal that arrives
    /// before the background task first runs is still delivered. The
    /// registration is never removed.
    pub fn watch(self) -> io::Result<ShutdownNotice> {
        let mut signals = match self.source {
            SignalSource::Os => Signals::new(TERMINATION_SIGNALS)?.boxed(),
            SignalSource::Stream(stream) => stream,
        };

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                if TERMINATION_SIGNALS.contains(&signal) {
                    info!("Received signal: {}", signal_name(signal));
                    let _ = tx.send(signal);
                    break;
                }
                debug!("Ignoring non-termination signal: {}", signal);
            }
        });

        Ok(ShutdownNotice { rx })
    }
}

impl Default for SignalWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once with the termination signal that arrived.
///
/// Resolves to `None` if the signal source ended without delivering one.
#[derive(Debug)]
pub struct ShutdownNotice {
    rx: oneshot::Receiver<i32>,
}

impl Future for ShutdownNotice {
    type Output = Option<i32>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}
