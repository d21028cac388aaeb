//! Constantes del motor core.

/// Versión lógica del motor. Entra en el `definition_hash` de cada
/// `FlowDefinition`, de modo que un cambio incompatible del engine produce
/// hashes distintos aunque la lista de steps no cambie.
pub const ENGINE_VERSION: &str = "P1.0";

/// Canal usado cuando un playbook no tiene destino de notificación propio.
pub const LOG_CHANNEL: &str = "log";
