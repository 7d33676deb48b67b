//! Property change notification for observers of a record.

use std::fmt;

/// Name announced after every batch of changes.
pub const VALIDITY_PROPERTY: &str = "IsValid";

type Subscriber = Box<dyn Fn(&str)>;

/// Subscriber list a record can embed to announce property changes.
///
/// Every batch ends with [`VALIDITY_PROPERTY`] since any change may alter
/// the record's validity.
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Vec<Subscriber>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&str) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Announce each changed property in turn, then the validity property.
    pub fn notify_changed<'a>(&self, properties: impl IntoIterator<Item = &'a str>) {
        for property in properties {
            self.emit(property);
        }
        self.emit(VALIDITY_PROPERTY);
    }

    fn emit(&self, property: &str) {
        tracing::trace!(property, "property changed");
        for subscriber in &self.subscribers {
            subscriber(property);
        }
    }
}

/// Subscribers are not carried over to clones.
impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn announces_each_property_then_validity() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        let sink = Rc::clone(&seen);
        notifier.subscribe(move |name| sink.borrow_mut().push(name.to_string()));

        notifier.notify_changed(["FirstProperty", "SecondProperty"]);
        assert_eq!(
            *seen.borrow(),
            vec!["FirstProperty", "SecondProperty", "IsValid"]
        );
    }

    #[test]
    fn every_subscriber_is_called() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();
        for _ in 0..2 {
            let count = Rc::clone(&count);
            notifier.subscribe(move |_| *count.borrow_mut() += 1);
        }

        notifier.notify_changed([]);
        assert_eq!(*count.borrow(), 2);
        assert_eq!(notifier.clone().subscriber_count(), 0);
    }
}
