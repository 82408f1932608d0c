use crate::client::token_storage::TokenStore;
use crate::common::CurrentUser;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener = Arc<dyn Fn(Option<&CurrentUser>) + Send + Sync>;

struct Inner {
    current: Option<CurrentUser>,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Broadcasts the current user to any number of listeners.
///
/// Holds exactly one value, the latest. A new listener is called with it
/// immediately, then once per later publication, synchronously and in the
/// order `publish` was called. Nothing is queued or coalesced.
///
/// Listeners run outside the state lock and may read `latest()`, but must
/// not publish.
pub struct AuthState {
    inner: Arc<Mutex<Inner>>,
    delivery: Mutex<()>,
}

impl AuthState {
    /// Seed the current user from the stored email.
    pub fn new(tokens: &TokenStore) -> Self {
        Self::with_user(tokens.user_email().map(CurrentUser::new))
    }

    pub fn with_user(current: Option<CurrentUser>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current,
                next_id: 0,
                listeners: Vec::new(),
            })),
            delivery: Mutex::new(()),
        }
    }

    pub fn latest(&self) -> Option<CurrentUser> {
        self.lock().current.clone()
    }

    /// Replace the current value and call every listener with it before
    /// returning.
    pub fn publish(&self, user: Option<CurrentUser>) {
        let _delivery = self.delivery.lock().unwrap_or_else(|e| e.into_inner());

        let listeners: Vec<Listener> = {
            let mut inner = self.lock();
            inner.current = user.clone();
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        tracing::debug!(
            user = ?user.as_ref().map(|u| u.email.as_str()),
            listeners = listeners.len(),
            "Auth state published"
        );

        for listener in &listeners {
            listener(user.as_ref());
        }
    }

    /// Register `listener`, call it with the latest value, and keep calling
    /// it until the returned handle is dropped.
    pub fn subscribe(
        &self,
        listener: impl Fn(Option<&CurrentUser>) + Send + Sync + 'static,
    ) -> Subscription {
        let _delivery = self.delivery.lock().unwrap_or_else(|e| e.into_inner());

        let listener: Listener = Arc::new(listener);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.current.clone())
        };

        listener(current.as_ref());

        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle for an [`AuthState`] listener. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut inner = state.lock().unwrap_or_else(|e| e.into_inner());
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Seen = Arc<Mutex<Vec<Option<CurrentUser>>>>;

    fn user(email: &str) -> Option<CurrentUser> {
        Some(CurrentUser::new(email))
    }

    fn record(state: &AuthState) -> (Subscription, Seen) {
        let seen: Seen = Arc::default();
        let sink = seen.clone();
        let sub = state.subscribe(move |u| sink.lock().unwrap().push(u.cloned()));
        (sub, seen)
    }

    #[test]
    fn test_initial_value_comes_from_stored_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::open(dir.path(), "http://localhost:8080").unwrap();
        assert_eq!(AuthState::new(&store).latest(), None);

        store.set_session("a", "r", "u@x.com").unwrap();
        assert_eq!(AuthState::new(&store).latest(), user("u@x.com"));
    }

    #[test]
    fn test_new_subscriber_gets_latest_value_first() {
        let state = AuthState::with_user(None);
        state.publish(user("a@x.com"));
        state.publish(user("b@x.com"));

        let (_sub, seen) = record(&state);
        assert_eq!(*seen.lock().unwrap(), vec![user("b@x.com")]);
    }

    #[test]
    fn test_publications_are_delivered_in_order_without_coalescing() {
        let state = AuthState::with_user(user("a@x.com"));
        let (_first, first) = record(&state);
        let (_second, second) = record(&state);

        state.publish(None);
        state.publish(user("b@x.com"));

        for seen in [first, second] {
            assert_eq!(
                *seen.lock().unwrap(),
                vec![user("a@x.com"), None, user("b@x.com")]
            );
        }
    }

    #[test]
    fn test_listener_runs_before_publish_returns() {
        let state = AuthState::with_user(None);
        let (_sub, seen) = record(&state);

        state.publish(user("a@x.com"));

        assert_eq!(seen.lock().unwrap().last(), Some(&user("a@x.com")));
    }

    #[test]
    fn test_idle_subscriber_holds_nothing() {
        let state = AuthState::with_user(None);
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let _sub = state.subscribe(move |_| *counter.lock().unwrap() += 1);

        for i in 0..1000 {
            state.publish(user(&format!("u{}@x.com", i)));
        }

        assert_eq!(*calls.lock().unwrap(), 1001);
        assert_eq!(state.lock().listeners.len(), 1);
        assert_eq!(state.latest(), user("u999@x.com"));
    }

    #[test]
    fn test_dropped_subscriptions_are_removed() {
        let state = AuthState::with_user(None);
        let (sub, seen) = record(&state);
        drop(sub);

        state.publish(user("a@x.com"));

        assert!(state.lock().listeners.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![None]);
        assert_eq!(state.latest(), user("a@x.com"));
    }

    #[test]
    fn test_listener_may_read_latest() {
        let state = Arc::new(AuthState::with_user(None));
        let observed: Seen = Arc::default();
        let (reader, sink) = (Arc::downgrade(&state), observed.clone());
        let _sub = state.subscribe(move |_| {
            if let Some(state) = reader.upgrade() {
                sink.lock().unwrap().push(state.latest());
            }
        });

        state.publish(user("a@x.com"));

        assert_eq!(*observed.lock().unwrap(), vec![None, user("a@x.com")]);
    }

    #[test]
    fn test_publish_from_another_thread() {
        let state = Arc::new(AuthState::with_user(None));
        let (_sub, seen) = record(&state);

        let publisher = state.clone();
        std::thread::spawn(move || publisher.publish(user("late@x.com")))
            .join()
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![None, user("late@x.com")]);
    }
}
