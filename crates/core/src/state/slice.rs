use serde::Serialize;

use super::policy::{FailurePolicy, FetchOutcome};

/// Identifies one fetch issued against a slice. Tokens are monotonic per
/// slice; only the latest one may settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// An independently managed `{ data, loading, error }` unit of state.
///
/// `loading` is set by [`Slice::begin`] and cleared by whichever of
/// [`Slice::succeed`], [`Slice::fail`] or [`Slice::cancel`] runs for the
/// current token. Settling with an outdated token changes nothing.
#[derive(Debug, Clone, Serialize)]
pub struct Slice<T> {
    data: T,
    loading: bool,
    error: Option<String>,
    #[serde(skip)]
    latest: u64,
}

impl<T: Default> Default for Slice<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Slice<T> {
    pub fn new(initial: T) -> Self {
        Self {
            data: initial,
            loading: false,
            error: None,
            latest: 0,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Direct access for in-place mutations that are not fetch results
    /// (simulated headlines, price ticks).
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a fetch as in flight and hand out its token.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Invalidate any in-flight fetch, e.g. when its view goes away.
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.loading = false;
    }

    pub fn succeed(&mut self, token: RequestToken, data: T) -> FetchOutcome {
        if !self.is_current(token) {
            return FetchOutcome::Superseded;
        }
        self.loading = false;
        self.data = data;
        FetchOutcome::Fresh
    }

    /// Record a failure and apply `policy`. `fallback` is only invoked for
    /// [`FailurePolicy::Fallback`].
    pub fn fail(
        &mut self,
        token: RequestToken,
        message: impl Into<String>,
        policy: FailurePolicy,
        fallback: impl FnOnce() -> T,
    ) -> FetchOutcome {
        if !self.is_current(token) {
            return FetchOutcome::Superseded;
        }
        self.loading = false;
        self.error = Some(message.into());
        match policy {
            FailurePolicy::ServeStale => FetchOutcome::Stale,
            FailurePolicy::Fallback => {
                self.data = fallback();
                FetchOutcome::Fallback
            }
        }
    }

    /// `succeed` or `fail` depending on `result`.
    pub fn settle<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<T, E>,
        policy: FailurePolicy,
        fallback: impl FnOnce() -> T,
    ) -> FetchOutcome {
        match result {
            Ok(data) => self.succeed(token, data),
            Err(e) => self.fail(token, e.to_string(), policy, fallback),
        }
    }
}
