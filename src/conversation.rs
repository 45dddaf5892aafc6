// src/conversation.rs

use std::sync::Mutex;

use crate::models::{Message, Sender};

type Observer = Box<dyn Fn(&Message) + Send + Sync>;

/// Append-only log of the conversation. Insertion order is display order;
/// messages are never reordered, edited, or removed.
pub struct ConversationStore {
    messages: Mutex<Vec<Message>>,
    observers: Mutex<Vec<Observer>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Appends a message stamped with the current time, notifies every
    /// observer synchronously, and returns a copy of the stored message.
    pub fn append(&self, text: impl Into<String>, sender: Sender) -> Message {
        let message = Message::new(text, sender);
        self.messages.lock().unwrap().push(message.clone());
        for observer in self.observers.lock().unwrap().iter() {
            observer(&message);
        }
        message
    }

    /// Registers an observer fired on every append. Observers accumulate;
    /// a later `subscribe` never replaces an earlier one.
    pub fn subscribe(&self, observer: impl Fn(&Message) + Send + Sync + 'static) {
        self.observers.lock().unwrap().push(Box::new(observer));
    }

    /// Snapshot of the log, oldest first.
    pub fn all(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let store = ConversationStore::new();
        store.append("hi", Sender::User);
        store.append("hello", Sender::Bot);
        store.append("how are you", Sender::User);

        let messages = store.all();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "hi");
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[2].text, "how are you");
    }

    #[test]
    fn append_returns_the_stored_message() {
        let store = ConversationStore::new();
        let message = store.append("hi", Sender::User);
        assert_eq!(message.text, "hi");
        assert_eq!(message.sender, Sender::User);
        assert_eq!(store.all()[0].text, message.text);
    }

    #[test]
    fn every_observer_fires_on_append() {
        let store = ConversationStore::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.append("hi", Sender::User);
        store.append("hello", Sender::Bot);

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observers_see_the_appended_message() {
        let store = ConversationStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store.subscribe(move |message| {
            sink.lock().unwrap().push(message.text.clone());
        });

        store.append("hi", Sender::User);
        assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[test]
    fn snapshot_is_independent_of_later_appends() {
        let store = ConversationStore::new();
        store.append("hi", Sender::User);
        let snapshot = store.all();
        store.append("hello", Sender::Bot);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
