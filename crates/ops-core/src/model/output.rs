//! Payload de éxito de un step y acumulado de payloads de un run.
//!
//! Un `StepOutput` es un mapa clave/valor JSON (por ejemplo `{"gid": "..."}`)
//! que el step siguiente, o el ensamblado final del playbook, consume. Vive
//! sólo durante el run; nunca se persiste.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepOutput(Map<String, Value>);

impl StepOutput {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Variante encadenable de `insert`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Outputs de los steps ya terminados, en orden de ejecución y
/// direccionables por id de step.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RunOutputs(IndexMap<String, StepOutput>);

impl RunOutputs {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, step_id: &str, output: StepOutput) {
        self.0.insert(step_id.to_string(), output);
    }

    pub fn get(&self, step_id: &str) -> Option<&StepOutput> {
        self.0.get(step_id)
    }

    /// Busca `key` en el output del step `step_id` como string.
    pub fn get_str(&self, step_id: &str, key: &str) -> Option<&str> {
        self.get(step_id).and_then(|o| o.get_str(key))
    }

    /// Output del último step terminado.
    pub fn last(&self) -> Option<&StepOutput> {
        self.0.last().map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
