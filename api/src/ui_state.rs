//! State of the matching form.
//!
//! A page is always in exactly one of four states. Submitting is only allowed
//! from a settled state with some input, and only an in-flight submission can
//! be resolved.

use aid_matcher::{AidMatch, MatchReport};
use thiserror::Error;

pub const FAILURE_ALERT: &str = "Analysis failed, please try again!";

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Success(Vec<AidMatch>),
    Error(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransitionError {
    #[error("describe your situation or attach a photo first")]
    EmptyInput,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("no submission in flight")]
    NotSubmitting,
}

impl FormState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FormState::Submitting)
    }

    /// Whether the submit button is enabled for the given input.
    pub fn can_submit(&self, has_input: bool) -> bool {
        has_input && !self.is_loading()
    }

    pub fn submit(self, has_input: bool) -> Result<FormState, TransitionError> {
        match self {
            FormState::Submitting => Err(TransitionError::InFlight),
            _ if !has_input => Err(TransitionError::EmptyInput),
            _ => Ok(FormState::Submitting),
        }
    }

    /// Settle an in-flight submission. Every failure collapses to one alert.
    pub fn resolve<E>(self, outcome: Result<MatchReport, E>) -> Result<FormState, TransitionError> {
        match self {
            FormState::Submitting => Ok(match outcome {
                Ok(report) => FormState::Success(report.matches),
                Err(_) => FormState::Error(FAILURE_ALERT.to_string()),
            }),
            _ => Err(TransitionError::NotSubmitting),
        }
    }

    pub fn matches(&self) -> &[AidMatch] {
        match self {
            FormState::Success(matches) => matches,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MatchReport {
        MatchReport {
            matches: vec![AidMatch {
                id: "1".to_string(),
                name: "X".to_string(),
                ..Default::default()
            }],
        }
    }

    fn settled() -> Vec<FormState> {
        vec![
            FormState::Idle,
            FormState::Success(Vec::new()),
            FormState::Error(FAILURE_ALERT.to_string()),
        ]
    }

    #[test]
    fn settled_states_submit_with_input() {
        for state in settled() {
            assert!(state.can_submit(true));
            assert_eq!(state.submit(true), Ok(FormState::Submitting));
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        for state in settled() {
            assert!(!state.can_submit(false));
            assert_eq!(state.submit(false), Err(TransitionError::EmptyInput));
        }
    }

    #[test]
    fn in_flight_submission_blocks_another() {
        let state = FormState::Submitting;
        assert!(state.is_loading());
        assert!(!state.can_submit(true));
        assert_eq!(state.submit(true), Err(TransitionError::InFlight));
    }

    #[test]
    fn submitting_resolves_to_success_or_error() {
        let ok = FormState::Submitting.resolve::<()>(Ok(report())).unwrap();
        assert_eq!(ok.matches().len(), 1);

        let failed = FormState::Submitting.resolve(Err("timeout")).unwrap();
        assert_eq!(failed, FormState::Error(FAILURE_ALERT.to_string()));
        assert!(failed.matches().is_empty());
    }

    #[test]
    fn settled_states_cannot_resolve() {
        for state in settled() {
            assert_eq!(
                state.resolve::<()>(Ok(MatchReport::default())),
                Err(TransitionError::NotSubmitting)
            );
        }
    }
}
