//! Contexts that are canceled by termination signals

use tracing::{debug, error, info};

use crate::{
    context::Context,
    utils::signals::{signal_name, SignalWatcher},
};

/// Derive a context from `parent` that is also canceled when the process
/// receives SIGINT, SIGTERM or SIGQUIT
pub fn with_signal_shutdown(parent: &Context) -> Context {
    with_shutdown_signals(parent, SignalWatcher::new())
}

/// Derive a context from `parent` that is also canceled when `watcher` sees a
/// termination signal, whichever comes first.
///
/// If the watcher cannot be registered the derived context only follows its
/// parent.
pub fn with_shutdown_signals(parent: &Context, watcher: SignalWatcher) -> Context {
    let (ctx, cancel) = parent.with_cancel();

    let notice = match watcher.watch() {
        Ok(notice) => notice,
        Err(e) => {
            error!("Failed to register termination signal handler: {}", e);
            return ctx;
        }
    };

    let derived = ctx.clone();
    tokio::spawn(async move {
        tokio::select! {
            signal = notice => {
                if let Some(signal) = signal {
                    info!("Cancelling context on {}", signal_name(signal));
                    cancel.cancel();
                }
            }
            _ = derived.done() => {
                debug!("Context finished before any termination signal");
            }
        }
    });

    ctx
}
