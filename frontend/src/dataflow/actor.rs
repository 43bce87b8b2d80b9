//! Single-value reactive state container.

use std::future::Future;
use std::sync::Arc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state owned by a processor task.
///
/// The processor receives the underlying [`Mutable`] handle and is the only
/// place allowed to drive state transitions from relay streams. UI binds to
/// [`Actor::signal`]; domain methods on the owning struct may read or nudge
/// the value synchronously through the crate-visible `state` handle, which is
/// safe because everything runs on the browser event loop.
#[derive(Clone, Debug)]
pub struct Actor<T = ()>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) state: Mutable<T>,
    _task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));
        Self {
            state,
            _task_handle: task_handle,
        }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Derived signal without cloning the whole value.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
        U: PartialEq + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::{StreamExt, select};
    use zoon::SignalExt;

    #[tokio::test]
    async fn processor_applies_events_sequentially() {
        let (add_relay, mut add_stream) = relay::<i64>();
        let (reset_relay, mut reset_stream) = relay::<()>();

        let total = Actor::new(0_i64, async move |state| {
            loop {
                select! {
                    amount = add_stream.next() => {
                        match amount {
                            Some(amount) => {
                                let current = state.get_cloned();
                                state.set(current + amount);
                            }
                            None => break,
                        }
                    }
                    event = reset_stream.next() => {
                        match event {
                            Some(()) => state.set(0),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        add_relay.send(5);
        add_relay.send(7);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(total.signal().to_stream().next().await, Some(12));

        reset_relay.send(());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(total.signal().to_stream().next().await, Some(0));
    }
}
