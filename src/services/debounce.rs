//! Coalesces bursts of input so only the last value of a burst is acted on.

use std::time::Duration;

use tokio::sync::mpsc;

pub const QUERY_DEBOUNCE: Duration = Duration::from_millis(150);

/// Spawns a debouncer. Values sent to the returned sender come out of the
/// receiver once no newer value arrived for `delay`. Closing the sender
/// flushes the pending value.
#[must_use]
pub fn debounce<T: Send + 'static>(
    delay: Duration,
) -> (mpsc::UnboundedSender<T>, mpsc::UnboundedReceiver<T>) {
    let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(mut latest) = in_rx.recv().await {
            let closed = loop {
                match tokio::time::timeout(delay, in_rx.recv()).await {
                    Ok(Some(next)) => latest = next,
                    Ok(None) => break true,
                    Err(_) => break false,
                }
            };

            if out_tx.send(latest).is_err() || closed {
                return;
            }
        }
    });

    (in_tx, out_rx)
}
