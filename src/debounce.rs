use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Forward only the last value of every burst from `input`.
///
/// A value is released once `delay` passes without a newer one arriving; each arrival
/// cancels the pending release and schedules a fresh one. When `input` closes, a pending
/// value is still released after its quiet period, then the output channel closes.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    delay: Duration,
) -> (mpsc::Receiver<T>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(1);

    let handle = tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            let Some(value) = pending.take() else {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                }
                continue;
            };

            tokio::select! {
                next = input.recv() => match next {
                    Some(newer) => pending = Some(newer),
                    None => {
                        sleep(delay).await;
                        let _ = tx.send(value).await;
                        break;
                    }
                },
                _ = sleep(delay) => {
                    if tx.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    (rx, handle)
}
