//! Hash helpers – abstracción para permitir cambiar de algoritmo sin tocar resto del core.

use blake3::Hasher;

use crate::constants::ENGINE_VERSION;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash estable de la forma de un pipeline: versión del engine + nombre del
/// playbook + ids de steps en orden.
pub fn definition_hash(playbook: &str, step_ids: &[&str]) -> String {
    let canonical = serde_json::json!({
        "engine_version": ENGINE_VERSION,
        "playbook": playbook,
        "steps": step_ids,
    });
    hash_str(&canonical.to_string())
}
