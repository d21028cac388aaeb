use std::fmt;

/// Valor resuelto desde el secret store. `Debug` no muestra el contenido,
/// así que un `{:?}` accidental en un log no filtra credenciales.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Acceso explícito al valor en claro.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_value() {
        let s = SecretValue::new("uid/key");
        assert_eq!(format!("{s:?}"), "SecretValue(***)");
        assert_eq!(s.expose(), "uid/key");
    }
}
