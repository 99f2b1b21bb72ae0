//! Per-domain panels. Each owns its form fields and one request lifecycle.

pub mod account;
pub mod order;
pub mod payment;

pub use account::AccountPanel;
pub use order::OrderPanel;
pub use payment::PaymentPanel;

use tracing::debug;

use crate::domain::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

/// Identifies one submission. Only the latest token may settle a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Request state plus the generation counter that lets a newer submission
/// supersede an older one still in flight.
#[derive(Debug)]
pub struct RequestSlot<T> {
    state: RequestState<T>,
    generation: u64,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            generation: 0,
        }
    }
}

impl<T> RequestSlot<T> {
    #[cfg(test)]
    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.state = RequestState::Loading;
        RequestToken(self.generation)
    }

    /// Applies a response. `Ok(None)` means the token was superseded and the
    /// outcome, success or failure, was dropped.
    pub fn settle(&mut self, token: RequestToken, outcome: Result<T, Error>) -> Result<Option<&T>, Error> {
        if token.0 != self.generation {
            debug!(token = token.0, current = self.generation, "discarding superseded response");
            return Ok(None);
        }

        match outcome {
            Ok(value) => {
                self.state = RequestState::Success(value);
                Ok(self.value())
            }
            Err(e) => {
                self.state = RequestState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Records a failure that happened before any request was sent.
    pub fn reject(&mut self, error: Error) -> Error {
        self.state = RequestState::Error(error.to_string());
        error
    }
}

pub(crate) fn required(value: &str, label: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", label)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superseded_response_is_discarded() {
        let mut slot = RequestSlot::<u32>::default();
        let first = slot.begin();
        let second = slot.begin();

        assert_eq!(slot.settle(first, Ok(1)).unwrap(), None);
        assert!(slot.is_loading());

        assert_eq!(slot.settle(second, Ok(2)).unwrap(), Some(&2));
        assert_eq!(slot.state(), &RequestState::Success(2));
    }

    #[test]
    fn superseded_failure_is_not_surfaced() {
        let mut slot = RequestSlot::<u32>::default();
        let stale = slot.begin();
        let fresh = slot.begin();

        let outcome = slot.settle(stale, Err(Error::validation("late failure")));
        assert!(matches!(outcome, Ok(None)));

        slot.settle(fresh, Ok(7)).unwrap();
        assert_eq!(slot.value(), Some(&7));
    }

    #[test]
    fn current_failure_lands_in_error_state() {
        let mut slot = RequestSlot::<u32>::default();
        let token = slot.begin();
        let err = slot
            .settle(token, Err(Error::validation("backend down")))
            .unwrap_err();
        assert_eq!(err.to_string(), "backend down");
        assert_eq!(slot.state(), &RequestState::Error("backend down".to_string()));
    }

    #[test]
    fn required_fields() {
        assert!(required("alice", "User ID").is_ok());
        assert_eq!(
            required("  ", "User ID").unwrap_err().to_string(),
            "User ID is required"
        );
    }
}
