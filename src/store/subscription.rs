use crate::error::StoreResult;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Receiving half of a live query.
#[must_use = "a subscription is closed as soon as it is dropped"]
pub struct Subscription<T> {
    rx: UnboundedReceiver<StoreResult<T>>,
}

impl<T> Subscription<T> {
    /// Closes the channel. Items already queued are discarded.
    #[cfg(test)]
    pub fn cancel(mut self) {
        self.rx.close();
    }

    /// Next queued item without waiting, if any.
    #[cfg(test)]
    pub fn try_next_snapshot(&mut self) -> Option<StoreResult<T>> {
        self.rx.try_recv().ok()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = StoreResult<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

/// Producing half, held by the store.
pub(crate) struct SnapshotSender<T> {
    tx: UnboundedSender<StoreResult<T>>,
}

impl<T> Clone for SnapshotSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> SnapshotSender<T> {
    /// Returns false once the subscriber is gone.
    pub fn send(&self, snapshot: T) -> bool {
        self.tx.unbounded_send(Ok(snapshot)).is_ok()
    }

    /// Sends the terminal error and closes the channel.
    pub fn fail(&self, error: crate::error::StoreError) {
        let _ = self.tx.unbounded_send(Err(error));
        self.tx.close_channel();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub(crate) fn channel<T>() -> (SnapshotSender<T>, Subscription<T>) {
    let (tx, rx) = unbounded();
    (SnapshotSender { tx }, Subscription { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreErrorKind};
    use futures::executor::block_on;
    use futures::StreamExt;

    #[test]
    fn test_error_is_terminal() {
        let (tx, mut sub) = channel::<u32>();
        assert!(tx.send(1));
        tx.fail(StoreError::network("offline"));
        assert!(!tx.send(2));

        assert_eq!(block_on(sub.next()), Some(Ok(1)));
        let err = block_on(sub.next()).and_then(|r| r.err()).expect("terminal error");
        assert_eq!(err.kind, StoreErrorKind::Network);
        assert_eq!(block_on(sub.next()), None);
    }

    #[test]
    fn test_cancel_closes_producer() {
        let (tx, sub) = channel::<u32>();
        assert!(!tx.is_closed());
        sub.cancel();
        assert!(tx.is_closed());
        assert!(!tx.send(1));
    }

    #[test]
    fn test_drop_closes_producer() {
        let (tx, sub) = channel::<u32>();
        drop(sub);
        assert!(tx.is_closed());
    }
}
