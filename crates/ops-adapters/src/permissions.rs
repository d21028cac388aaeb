//! Conjunto de permisos de grupo leído desde el secret store.
//!
//! El secreto es una lista separada por comas. El parseo nunca falla: un
//! secreto vacío o sin entradas útiles da un conjunto vacío. Qué hacer con
//! un conjunto vacío lo decide `EmptyPermissionPolicy` en el step que aplica
//! los permisos.
use std::collections::BTreeSet;

pub const SEPARATOR: char = ',';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// Permisos ordenados, listos para enviarse al backend.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

pub fn parse_permissions(raw: &str) -> PermissionSet {
    raw.trim()
       .replace('\n', "")
       .split(SEPARATOR)
       .map(str::trim)
       .filter(|p| !p.is_empty())
       .map(str::to_string)
       .fold(PermissionSet::default(), |mut set, p| {
           set.0.insert(p);
           set
       })
}

/// Qué hacer cuando el secreto de permisos no produce ninguno.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPermissionPolicy {
    /// Falla el step: aplicar un conjunto vacío dejaría al grupo sin permisos.
    #[default]
    Reject,
    /// Aplica el conjunto vacío tal cual.
    Allow,
}
