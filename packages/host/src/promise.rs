//! Single-settlement pending operations.
//!
//! A [`Pending`] stands for one asynchronous host call that settles exactly
//! once: either with a success payload (a list of values, usually exactly
//! one) or with a [`HostError`]. A consumer registers one success adapter and
//! one failure adapter via [`Pending::subscribe`]; when the host settles, the
//! matching adapter fires and is consumed, while the other adapter stays
//! registered until the [`Subscription`] is released. Release happens on drop,
//! so a waiting caller cleans up on every exit path.
//!
//! There is no timeout or cancellation here: a pending operation the host
//! never settles leaves its subscriber waiting forever. That is a documented
//! property of the boundary, not something this module papers over.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::HostError;

type ResolveFn<T> = Box<dyn FnOnce(Vec<T>) + Send>;
type RejectFn = Box<dyn FnOnce(HostError) + Send>;

enum Outcome<T> {
    Resolved(Vec<T>),
    Rejected(HostError),
}

/// What to invoke after the state lock is dropped. Adapters are never called
/// while the lock is held.
enum Deliver<T> {
    Resolve(ResolveFn<T>, Vec<T>),
    Reject(RejectFn, HostError),
    Nothing,
}

struct State<T> {
    outcome: Option<Outcome<T>>,
    delivered: bool,
    on_resolve: Option<ResolveFn<T>>,
    on_reject: Option<RejectFn>,
}

impl<T> State<T> {
    fn new() -> Self {
        State {
            outcome: None,
            delivered: false,
            on_resolve: None,
            on_reject: None,
        }
    }
}

// State transitions never run foreign code under the lock, so a poisoned
// mutex can only mean a panic in this module; recovering the guard is safe.
fn lock<T>(state: &Mutex<State<T>>) -> MutexGuard<'_, State<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One pending host operation. Cloning shares the same settlement state.
pub struct Pending<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Pending {
            state: Arc::clone(&self.state),
        }
    }
}

/// The host-side half of a [`Pending`]. Consumed on settlement, so settling
/// twice is unrepresentable. Dropping a `Settler` without settling leaves the
/// operation pending forever.
pub struct Settler<T> {
    state: Arc<Mutex<State<T>>>,
}

/// Registration of one adapter pair against a [`Pending`]. Dropping it
/// unregisters both adapter slots, fired or not.
pub struct Subscription<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Create a pending operation together with its settler.
    pub fn channel() -> (Pending<T>, Settler<T>) {
        let state = Arc::new(Mutex::new(State::new()));
        (
            Pending {
                state: Arc::clone(&state),
            },
            Settler { state },
        )
    }

    /// An operation that has already resolved with `values`.
    pub fn resolved(values: Vec<T>) -> Pending<T> {
        let (pending, settler) = Pending::channel();
        settler.resolve(values);
        pending
    }

    /// An operation that has already resolved with exactly one value.
    pub fn resolved_one(value: T) -> Pending<T> {
        Pending::resolved(vec![value])
    }

    /// An operation that has already rejected with `err`.
    pub fn rejected(err: HostError) -> Pending<T> {
        let (pending, settler) = Pending::channel();
        settler.reject(err);
        pending
    }

    /// Register one success adapter and one failure adapter.
    ///
    /// Exactly one of the two fires, immediately if the operation already
    /// settled. The non-firing adapter stays registered (keeping whatever it
    /// owns alive) until the returned [`Subscription`] is dropped. A
    /// `Pending` supports a single subscriber; subscribing again replaces
    /// any adapters still registered.
    pub fn subscribe(
        &self,
        on_resolve: impl FnOnce(Vec<T>) + Send + 'static,
        on_reject: impl FnOnce(HostError) + Send + 'static,
    ) -> Subscription<T> {
        let deliver = {
            let mut st = lock(&self.state);
            if st.delivered {
                Deliver::Nothing
            } else if let Some(outcome) = st.outcome.take() {
                st.delivered = true;
                match outcome {
                    Outcome::Resolved(values) => {
                        st.on_reject = Some(Box::new(on_reject));
                        Deliver::Resolve(Box::new(on_resolve), values)
                    }
                    Outcome::Rejected(err) => {
                        st.on_resolve = Some(Box::new(on_resolve));
                        Deliver::Reject(Box::new(on_reject), err)
                    }
                }
            } else {
                st.on_resolve = Some(Box::new(on_resolve));
                st.on_reject = Some(Box::new(on_reject));
                Deliver::Nothing
            }
        };
        match deliver {
            Deliver::Resolve(f, values) => f(values),
            Deliver::Reject(f, err) => f(err),
            Deliver::Nothing => {}
        }
        Subscription {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + 'static> Settler<T> {
    /// Resolve with a success payload.
    pub fn resolve(self, values: Vec<T>) {
        self.settle(Outcome::Resolved(values));
    }

    /// Resolve with a success payload of exactly one value.
    pub fn resolve_one(self, value: T) {
        self.resolve(vec![value]);
    }

    /// Reject with a failure.
    pub fn reject(self, err: HostError) {
        self.settle(Outcome::Rejected(err));
    }

    fn settle(self, outcome: Outcome<T>) {
        let deliver = {
            let mut st = lock(&self.state);
            if st.delivered || st.outcome.is_some() {
                return;
            }
            match outcome {
                Outcome::Resolved(values) => match st.on_resolve.take() {
                    Some(f) => {
                        st.delivered = true;
                        Deliver::Resolve(f, values)
                    }
                    None => {
                        st.outcome = Some(Outcome::Resolved(values));
                        Deliver::Nothing
                    }
                },
                Outcome::Rejected(err) => match st.on_reject.take() {
                    Some(f) => {
                        st.delivered = true;
                        Deliver::Reject(f, err)
                    }
                    None => {
                        st.outcome = Some(Outcome::Rejected(err));
                        Deliver::Nothing
                    }
                },
            }
        };
        match deliver {
            Deliver::Resolve(f, values) => f(values),
            Deliver::Reject(f, err) => f(err),
            Deliver::Nothing => {}
        }
    }
}

impl<T> Subscription<T> {
    /// Unregister both adapter slots. Equivalent to dropping.
    pub fn release(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut st = lock(&self.state);
        st.on_resolve = None;
        st.on_reject = None;
    }
}
