//! Reactive collection container.

use futures::stream::Stream;
use std::future::Future;
use zoon::{MutableVec, Signal, SignalExt, SignalVecExt, Task};

/// Collection state owned by a processor task, emitting `VecDiff` updates.
#[derive(Clone, Debug)]
pub struct ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) vec: MutableVec<T>,
}

impl<T> ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial_items: Vec<T>, processor: F) -> Self
    where
        F: FnOnce(ActorVecHandle<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let vec = MutableVec::new_with_values(initial_items);
        let handle = ActorVecHandle {
            mutable_vec: vec.clone(),
        };
        Task::start(processor(handle));
        Self { vec }
    }

    /// Full collection on every change. Prefer [`ActorVec::signal_vec`] for UI.
    pub fn signal(&self) -> impl Signal<Item = Vec<T>> + use<T> {
        self.vec.signal_vec_cloned().to_signal_cloned()
    }

    /// Efficient per-item diff signal for `items_signal_vec` bindings.
    pub fn signal_vec(&self) -> impl zoon::SignalVec<Item = T> + use<T> {
        self.vec.signal_vec_cloned()
    }

    pub fn to_stream(&self) -> impl Stream<Item = Vec<T>> + use<T> {
        self.signal().to_stream()
    }

    /// Synchronous copy for event handlers; prefer signals everywhere else.
    pub fn snapshot(&self) -> Vec<T> {
        self.vec.lock_ref().to_vec()
    }
}

/// Mutation handle available inside the processor.
pub struct ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    mutable_vec: MutableVec<T>,
}

impl<T> ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn push_cloned(&self, item: T) {
        self.mutable_vec.lock_mut().push_cloned(item);
    }

    pub fn remove(&self, index: usize) -> Option<T> {
        let mut guard = self.mutable_vec.lock_mut();
        (index < guard.len()).then(|| guard.remove(index))
    }

    pub fn retain<F>(&self, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.mutable_vec.lock_mut().retain(f);
    }

    pub fn replace_cloned(&self, items: Vec<T>) {
        self.mutable_vec.lock_mut().replace_cloned(items);
    }

    pub fn clear(&self) {
        self.mutable_vec.lock_mut().clear();
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.mutable_vec.lock_ref().to_vec()
    }

    pub fn len(&self) -> usize {
        self.mutable_vec.lock_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutable_vec.lock_ref().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::{StreamExt, select};

    #[tokio::test]
    async fn push_and_retain_through_processor() {
        let (added_relay, mut added_stream) = relay::<String>();
        let (removed_relay, mut removed_stream) = relay::<String>();

        let items = ActorVec::new(vec!["seed".to_string()], async move |items| {
            loop {
                select! {
                    item = added_stream.next() => {
                        match item {
                            Some(item) => items.push_cloned(item),
                            None => break,
                        }
                    }
                    gone = removed_stream.next() => {
                        match gone {
                            Some(gone) => items.retain(|item| item != &gone),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        added_relay.send("one".to_string());
        added_relay.send("two".to_string());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(
            items.to_stream().next().await.unwrap(),
            vec!["seed", "one", "two"]
        );

        removed_relay.send("one".to_string());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(items.to_stream().next().await.unwrap(), vec!["seed", "two"]);
    }
}
