//! Access tokens and the `Utilisateur` they carry

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{Role, Structure, TypeUtilisateur, Utilisateur};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the utilisateur
    pub sub: Uuid,
    pub prenom: String,
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub type_utilisateur: TypeUtilisateur,
    pub structure: Structure,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl From<Claims> for Utilisateur {
    fn from(claims: Claims) -> Self {
        Utilisateur {
            id: claims.sub,
            prenom: claims.prenom,
            nom: claims.nom,
            email: claims.email,
            type_utilisateur: claims.type_utilisateur,
            structure: claims.structure,
            roles: claims.roles,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Jeton d'authentification absent")]
    JetonAbsent,
    #[error("Jeton d'authentification invalide")]
    JetonInvalide,
    #[error("Jeton d'authentification expiré")]
    JetonExpire,
}

/// Signs a token for `utilisateur`, valid `expiration_secs` seconds
pub fn create_token(
    utilisateur: &Utilisateur,
    secret: &str,
    expiration_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: utilisateur.id,
        prenom: utilisateur.prenom.clone(),
        nom: utilisateur.nom.clone(),
        email: utilisateur.email.clone(),
        type_utilisateur: utilisateur.type_utilisateur,
        structure: utilisateur.structure,
        roles: utilisateur.roles.clone(),
        exp: (now + Duration::seconds(expiration_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::JetonInvalide)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Utilisateur, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::JetonExpire,
        _ => AuthError::JetonInvalide,
    })?;

    Ok(token_data.claims.into())
}

/// Extracts the token of an `Authorization: Bearer …` header value
pub fn bearer(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::JetonAbsent)
}
