//! Type-safe event streaming over unbounded channels.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sender half of an event stream feeding an Actor processor.
///
/// Create pairs with [`relay()`]; the receiver end is consumed by exactly one
/// processor loop. Sending never blocks; events emitted after the receiver is
/// gone are silently dropped, matching fire-and-forget UI semantics.
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Relay { sender }, receiver)
    }

    /// Emit an event. Dropped silently if no processor is listening anymore.
    pub fn send(&self, value: T) {
        let _ = self.sender.unbounded_send(value);
    }
}

impl<T> Default for Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A disconnected relay; useful as a placeholder before wiring.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

/// Create a `(Relay, stream)` pair, following the channel convention.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let (relay, mut stream) = relay::<u32>();
        relay.send(1);
        relay.send(2);
        relay.send(3);
        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
        assert_eq!(stream.next().await, Some(3));
    }

    #[tokio::test]
    async fn send_after_receiver_drop_is_silent() {
        let (relay, receiver) = relay::<&'static str>();
        drop(receiver);
        relay.send("lost");
    }
}
