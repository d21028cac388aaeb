//! Resolución por lotes de identificadores externos (p.ej. emails) a ids
//! internos del servicio (p.ej. ids de usuario del chat).
//!
//! Cada identificador se resuelve con exactamente una llamada al
//! colaborador, en orden, sin cache ni deduplicación. Un fallo individual no
//! aborta el lote: queda registrado como `LookupOutcome::Failed` y el lote
//! sólo es `ok` si no hubo ninguno.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::StepError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// El servicio respondió pero no conoce el identificador.
    #[error("{0}")] NotFound(String),
    /// Error de red / respuesta ilegible.
    #[error("{0}")] Transport(String),
}

/// Colaborador que resuelve un identificador.
pub trait IdentityLookup {
    fn lookup(&self, identifier: &str) -> Result<String, LookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Resolved { identifier: String, internal_id: String },
    Failed { identifier: String, error: String },
}

impl LookupOutcome {
    fn from_lookup(identifier: &str, res: Result<String, LookupError>) -> Self {
        match res {
            Ok(internal_id) => LookupOutcome::Resolved { identifier: identifier.to_string(),
                                                         internal_id },
            Err(LookupError::NotFound(reason)) => {
                LookupOutcome::Failed { identifier: identifier.to_string(),
                                        error: format!("Could not find user for email '{identifier}': {reason}") }
            }
            Err(LookupError::Transport(cause)) => {
                LookupOutcome::Failed { identifier: identifier.to_string(),
                                        error: format!("An error occurred while looking up '{identifier}': {cause}") }
            }
        }
    }
}

/// Resultado de un lote: un outcome por identificador de entrada, en orden.
///
/// Invariante: `successful_count() + failed_count() == len()`. Se serializa
/// como la lista de outcomes, para viajar en el output de un step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityLookupBatch {
    outcomes: Vec<LookupOutcome>,
}

impl IdentityLookupBatch {
    pub fn outcomes(&self) -> &[LookupOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn ok(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn successful_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, LookupOutcome::Resolved { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.successful_count()
    }

    /// identificador -> id interno de los resueltos. Identificadores
    /// repetidos colapsan en una sola entrada.
    pub fn resolved(&self) -> IndexMap<String, String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                LookupOutcome::Resolved { identifier, internal_id } => Some((identifier.clone(), internal_id.clone())),
                LookupOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Mensajes de error en el orden de entrada.
    pub fn errors(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                LookupOutcome::Failed { error, .. } => Some(error.clone()),
                LookupOutcome::Resolved { .. } => None,
            })
            .collect()
    }

    /// Compuerta para acciones masivas: ids internos si todo resolvió, o un
    /// único error agregado atribuido a `step`.
    pub fn into_result(self, step: &str) -> Result<Vec<String>, StepError> {
        if self.ok() {
            return Ok(self.resolved().into_values().collect());
        }
        Err(aggregate_lookup_error(step, &self.errors()))
    }
}

/// Error único que resume todos los fallos de un lote.
pub fn aggregate_lookup_error(step: &str, errors: &[String]) -> StepError {
    StepError::new(step, "Failed to look up user IDs").with_cause(format!("{errors:?}"))
}

pub struct IdentityResolver<'a> {
    lookup: &'a dyn IdentityLookup,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(lookup: &'a dyn IdentityLookup) -> Self {
        Self { lookup }
    }

    pub fn resolve(&self, identifiers: &[String]) -> IdentityLookupBatch {
        let outcomes = identifiers.iter()
                                  .map(|id| {
                                      let res = self.lookup.lookup(id);
                                      if let Err(e) = &res {
                                          log::debug!("identity lookup failed for '{id}': {e}");
                                      }
                                      LookupOutcome::from_lookup(id, res)
                                  })
                                  .collect();
        IdentityLookupBatch { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct TableLookup {
        table: HashMap<&'static str, Result<&'static str, LookupError>>,
        calls: RefCell<Vec<String>>,
    }

    impl TableLookup {
        fn new(entries: Vec<(&'static str, Result<&'static str, LookupError>)>) -> Self {
            Self { table: entries.into_iter().collect(),
                   calls: RefCell::new(vec![]) }
        }
    }

    impl IdentityLookup for TableLookup {
        fn lookup(&self, identifier: &str) -> Result<String, LookupError> {
            self.calls.borrow_mut().push(identifier.to_string());
            match self.table.get(identifier) {
                Some(Ok(id)) => Ok(id.to_string()),
                Some(Err(e)) => Err(e.clone()),
                None => Err(LookupError::NotFound("users_not_found".into())),
            }
        }
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_is_ok_without_calls() {
        let lookup = TableLookup::new(vec![]);
        let batch = IdentityResolver::new(&lookup).resolve(&[]);
        assert!(batch.ok());
        assert!(batch.resolved().is_empty());
        assert!(lookup.calls.borrow().is_empty());
        assert_eq!(batch.into_result("invite"), Ok(vec![]));
    }

    #[test]
    fn mixed_batch_is_lossless_and_not_ok() {
        let lookup = TableLookup::new(vec![("a@x.com", Ok("U1")),
                                           ("net@x.com", Err(LookupError::Transport("connection reset".into())))]);
        let input = ids(&["a@x.com", "bad@x.com", "net@x.com"]);
        let batch = IdentityResolver::new(&lookup).resolve(&input);

        assert_eq!(batch.successful_count() + batch.failed_count(), input.len());
        assert_eq!(batch.successful_count(), 1);
        assert!(!batch.ok());
        assert_eq!(batch.resolved().get("a@x.com").map(String::as_str), Some("U1"));
        assert_eq!(batch.errors(),
                   vec!["Could not find user for email 'bad@x.com': users_not_found".to_string(),
                        "An error occurred while looking up 'net@x.com': connection reset".to_string()]);
        // nunca aborta: una llamada por identificador, en orden
        assert_eq!(*lookup.calls.borrow(), input);
    }

    #[test]
    fn duplicates_are_looked_up_each_time() {
        let lookup = TableLookup::new(vec![("a@x.com", Ok("U1"))]);
        let batch = IdentityResolver::new(&lookup).resolve(&ids(&["a@x.com", "a@x.com"]));
        assert_eq!(lookup.calls.borrow().len(), 2);
        assert_eq!(batch.successful_count(), 2);
        assert_eq!(batch.resolved().len(), 1);
    }

    #[test]
    fn into_result_aggregates_every_error() {
        let lookup = TableLookup::new(vec![]);
        let batch = IdentityResolver::new(&lookup).resolve(&ids(&["x@y.com", "z@y.com"]));
        let err = batch.into_result("invite_members").unwrap_err();
        assert_eq!(err.step, "invite_members");
        let text = err.to_string();
        assert!(text.starts_with("Failed to look up user IDs: "));
        assert!(text.contains("x@y.com") && text.contains("z@y.com"));
    }

    #[test]
    fn batch_carried_as_json_keeps_its_gate() {
        let lookup = TableLookup::new(vec![("a@x.com", Ok("U1"))]);
        let batch = IdentityResolver::new(&lookup).resolve(&ids(&["a@x.com", "ghost@x.com"]));

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value[0]["status"], "resolved");
        assert_eq!(value[1]["status"], "failed");

        let carried: IdentityLookupBatch = serde_json::from_value(value).unwrap();
        assert_eq!(carried, batch);
        let err = carried.into_result("invite_members").unwrap_err();
        assert!(err.to_string().contains("ghost@x.com"));
    }
}
