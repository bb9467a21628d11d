//! The four form actions wired to a store: restore on load, compute, save
//! and clear.

use serde::Serialize;
use thiserror::Error;

use crate::core::{
    InputRecord, ProjectionError, ProjectionInput, ProjectionResult, ProjectionView,
    render_projection, run_projection,
};
use crate::store::{InputStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode projection: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub record: InputRecord,
    pub result: ProjectionResult,
    pub view: ProjectionView,
}

impl Projection {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: InputStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last saved form, or an empty one.
    pub fn restore(&self) -> InputRecord {
        self.store.load().unwrap_or_default()
    }

    /// Projects the form and persists it. Invalid ages abort before anything
    /// is computed or saved.
    pub fn compute(&mut self, record: InputRecord) -> Result<Projection, SessionError> {
        let input = ProjectionInput::try_from(&record)?;
        let result = run_projection(&input)?;
        let view = render_projection(&input, &result);
        self.store.save(&record)?;
        log::debug!(
            "projected {} months, future value {:.2}",
            result.months,
            result.future_value
        );
        Ok(Projection {
            record,
            result,
            view,
        })
    }

    pub fn save(&mut self, record: &InputRecord) -> Result<(), SessionError> {
        self.store.save(record)?;
        Ok(())
    }

    /// Erases the saved record and returns the blank form.
    pub fn clear(&mut self) -> Result<InputRecord, SessionError> {
        self.store.clear()?;
        Ok(InputRecord::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample_record() -> InputRecord {
        InputRecord {
            age_now: "30".to_string(),
            age_retire: "60".to_string(),
            pv: String::new(),
            pmt: "R$ 1.000,00".to_string(),
            income_goal: String::new(),
        }
    }

    #[test]
    fn compute_persists_record_on_success() {
        let mut session = Session::new(MemoryStore::new());
        let projection = session.compute(sample_record()).expect("valid record");

        assert_eq!(projection.result.months, 360);
        assert_eq!(projection.view.months, "360");
        assert_eq!(session.restore(), sample_record());
    }

    #[test]
    fn projection_encodes_as_camel_case_json() {
        let mut session = Session::new(MemoryStore::new());
        let projection = session.compute(sample_record()).expect("valid record");
        let json = projection.to_json().expect("projection should encode");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["result"]["months"], 360);
        assert!(value["result"]["requiredContribution"].is_null());
        assert_eq!(value["record"]["age_now"], "30");
    }

    #[test]
    fn encode_failures_surface_as_session_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated JSON");
        let err = SessionError::from(source);
        assert!(matches!(err, SessionError::Encode(_)));
        assert!(err.to_string().starts_with("failed to encode projection"));
    }

    #[test]
    fn compute_with_invalid_ages_saves_nothing() {
        let mut session = Session::new(MemoryStore::new());
        let mut record = sample_record();
        record.age_retire = "30".to_string();

        let err = session.compute(record).expect_err("equal ages must fail");
        assert!(matches!(err, SessionError::Projection(_)));
        assert_eq!(session.store().load(), None);
    }

    #[test]
    fn restore_defaults_to_blank_form() {
        let session = Session::new(MemoryStore::new());
        assert!(session.restore().is_empty());
    }

    #[test]
    fn explicit_save_then_clear() {
        let mut session = Session::new(MemoryStore::new());
        let mut partial = InputRecord::default();
        partial.age_now = "41".to_string();

        session.save(&partial).expect("save");
        assert_eq!(session.restore(), partial);

        let blank = session.clear().expect("clear");
        assert!(blank.is_empty());
        assert!(session.restore().is_empty());
    }
}
