use serde::Serialize;
use std::fmt;

/// Identifies one asynchronous request. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out tokens for one kind of request and remembers which one is current.
///
/// Issuing a new token supersedes the previous one, so a completion can check
/// [`RequestTracker::is_current`] and drop itself when the user has moved on.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    current: Option<RequestToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        self.current = Some(token);
        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Marks the current request finished; later completions with its token are stale
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if self.is_current(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }
}
