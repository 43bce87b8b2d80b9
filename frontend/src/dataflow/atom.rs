//! Local UI state wrapper over Actor+Relay.

use crate::dataflow::{Actor, Relay, relay};
use futures::StreamExt;
use zoon::Signal;

#[derive(Clone, Debug)]
enum AtomUpdate<T> {
    Set(T),
    SetNeq(T),
    Toggle,
}

/// Small reactive cell for component-local state: hover flags, open/closed
/// dialogs, input drafts. Domain state belongs in domain Actors instead.
#[derive(Clone, Debug)]
pub struct Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    actor: Actor<T>,
    setter: Relay<AtomUpdate<T>>,
}

impl<T> Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self
    where
        T: PartialEq + Toggleable,
    {
        let (setter, mut setter_stream) = relay();
        let actor = Actor::new(initial, async move |state| {
            while let Some(update) = setter_stream.next().await {
                match update {
                    AtomUpdate::Set(value) => state.set(value),
                    AtomUpdate::SetNeq(value) => state.set_neq(value),
                    AtomUpdate::Toggle => {
                        let toggled = state.get_cloned().toggled();
                        state.set(toggled);
                    }
                }
            }
        });
        Self { actor, setter }
    }

    pub fn set(&self, value: T) {
        self.setter.send(AtomUpdate::Set(value));
    }

    pub fn set_neq(&self, value: T)
    where
        T: PartialEq,
    {
        self.setter.send(AtomUpdate::SetNeq(value));
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.actor.signal()
    }

    /// Synchronous read for event handlers; prefer signals everywhere else.
    pub fn get_cloned(&self) -> T {
        self.actor.state.get_cloned()
    }
}

impl Atom<bool> {
    pub fn toggle(&self) {
        self.setter.send(AtomUpdate::Toggle);
    }
}

/// Types with a meaningful `Toggle` transition. Identity for everything but
/// `bool`, so `Atom::new` stays usable for any value type.
pub trait Toggleable: Sized {
    fn toggled(self) -> Self;
}

impl Toggleable for bool {
    fn toggled(self) -> Self {
        !self
    }
}

impl Toggleable for String {
    fn toggled(self) -> Self {
        self
    }
}

impl<T> Toggleable for Option<T> {
    fn toggled(self) -> Self {
        self
    }
}

impl Toggleable for f32 {
    fn toggled(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use zoon::SignalExt;

    #[tokio::test]
    async fn set_and_toggle() {
        let open = Atom::new(false);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        open.set(true);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(open.signal().to_stream().next().await, Some(true));

        open.toggle();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(open.signal().to_stream().next().await, Some(false));
    }
}
