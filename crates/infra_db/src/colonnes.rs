//! Text codes stored in enum columns
//!
//! Enum columns hold the same code the domain type serializes to, so a
//! stored `statut` reads `done` and a stored `type` reads `ATELIER`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use core_kernel::PortError;

pub(crate) fn vers_code<T: Serialize>(valeur: &T) -> Result<String, PortError> {
    match serde_json::to_value(valeur) {
        Ok(Value::String(code)) => Ok(code),
        Ok(autre) => Err(PortError::transformation(format!(
            "Valeur non textuelle pour une colonne d'énumération: {}",
            autre
        ))),
        Err(e) => Err(PortError::transformation(e.to_string())),
    }
}

pub(crate) fn vers_codes<T: Serialize>(valeurs: &[T]) -> Result<Vec<String>, PortError> {
    valeurs.iter().map(vers_code).collect()
}

pub(crate) fn depuis_code<T: DeserializeOwned>(colonne: &str, code: &str) -> Result<T, PortError> {
    serde_json::from_value(Value::String(code.to_string())).map_err(|_| {
        PortError::transformation(format!("Code '{}' invalide pour la colonne {}", code, colonne))
    })
}
