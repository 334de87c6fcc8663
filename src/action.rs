//! The tagged action variant and the deferred (thunk) form.
//!
//! An action is either a plain record or a deferred computation that
//! drives further dispatches. The distinction is made at the construction
//! site via an explicit tag, never discovered by inspecting a value's
//! shape at run time.

use std::fmt;

/// The dispatch half of a store runtime: forwards one action.
///
/// Forwarding is a plain synchronous pass-through; wrappers built by this
/// crate preserve the exact order in which actions are issued.
pub type DispatchFn<'a, A, St = (), Ctx = ()> = dyn FnMut(Action<A, St, Ctx>) + 'a;

/// The read half of a store runtime: returns the current state.
pub type GetStateFn<'a, St> = dyn Fn() -> St + 'a;

/// An action addressed to a store: a plain record or a deferred thunk.
///
/// # Type Parameters
///
/// - `A`: the plain record type (a domain enum/struct, or
///   [`serde_json::Value`] for heterogeneous action shapes).
/// - `St`: the state type returned by the store's `get_state`.
/// - `Ctx`: the third argument the store runtime passes to thunks
///   (an extra argument, or a bound selector set after collection
///   decoration).
pub enum Action<A, St = (), Ctx = ()> {
    /// A plain action record.
    Plain(A),
    /// A deferred action, run by the store's dispatch loop.
    Deferred(Thunk<A, St, Ctx>),
}

impl<A, St, Ctx> Action<A, St, Ctx> {
    /// Build a deferred action from a thunk body.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyfold::Action;
    ///
    /// let action: Action<&'static str, u32> = Action::deferred(|dispatch, get_state, _ctx| {
    ///     if get_state() == 0 {
    ///         dispatch(Action::Plain("INIT"));
    ///     }
    /// });
    /// assert!(action.is_deferred());
    /// ```
    pub fn deferred<F>(body: F) -> Self
    where
        F: FnOnce(&mut DispatchFn<'_, A, St, Ctx>, &GetStateFn<'_, St>, &Ctx) + 'static,
    {
        Action::Deferred(Thunk::new(body))
    }

    /// Whether this action is a deferred thunk.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Action::Deferred(_))
    }

    /// The plain record, if this action is one.
    pub fn as_plain(&self) -> Option<&A> {
        match self {
            Action::Plain(record) => Some(record),
            Action::Deferred(_) => None,
        }
    }

    /// Consume the action, returning the plain record if it is one.
    pub fn into_plain(self) -> Option<A> {
        match self {
            Action::Plain(record) => Some(record),
            Action::Deferred(_) => None,
        }
    }
}

impl<A: fmt::Debug, St, Ctx> fmt::Debug for Action<A, St, Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Plain(record) => f.debug_tuple("Plain").field(record).finish(),
            Action::Deferred(_) => f.write_str("Deferred(<thunk>)"),
        }
    }
}

/// A deferred action: a one-shot computation over `(dispatch, get_state,
/// ctx)` that may issue zero or more further actions.
///
/// Thunks are consumed by [`run`](Thunk::run). They carry no ordering or
/// atomicity guarantee across any asynchronous boundary an implementation
/// may schedule work over; whatever is eventually dispatched flows through
/// the provided dispatch function.
pub struct Thunk<A, St = (), Ctx = ()> {
    body: Box<dyn FnOnce(&mut DispatchFn<'_, A, St, Ctx>, &GetStateFn<'_, St>, &Ctx)>,
}

impl<A, St, Ctx> Thunk<A, St, Ctx> {
    /// Wrap a thunk body.
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&mut DispatchFn<'_, A, St, Ctx>, &GetStateFn<'_, St>, &Ctx) + 'static,
    {
        Self {
            body: Box::new(body),
        }
    }

    /// Run the thunk against a store runtime.
    pub fn run(
        self,
        dispatch: &mut DispatchFn<'_, A, St, Ctx>,
        get_state: &GetStateFn<'_, St>,
        ctx: &Ctx,
    ) {
        (self.body)(dispatch, get_state, ctx)
    }
}

impl<A, St, Ctx> fmt::Debug for Thunk<A, St, Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}
