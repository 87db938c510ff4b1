//! Custom Test Assertions
//!
//! Assertions on handler outcomes that print the actual error when they fail.

use core_kernel::{DomainError, DomainResult};

pub fn assert_droits_insuffisants<T: std::fmt::Debug>(resultat: &DomainResult<T>) {
    assert!(
        matches!(resultat, Err(DomainError::DroitsInsuffisants)),
        "DroitsInsuffisants attendu, obtenu {:?}",
        resultat
    );
}

pub fn assert_non_trouve<T: std::fmt::Debug>(resultat: &DomainResult<T>, entite_attendue: &str) {
    match resultat {
        Err(DomainError::NonTrouve { entite, .. }) => assert_eq!(
            entite, entite_attendue,
            "NonTrouve sur la mauvaise entité"
        ),
        autre => panic!("NonTrouve({}) attendu, obtenu {:?}", entite_attendue, autre),
    }
}

pub fn assert_mauvaise_commande<T: std::fmt::Debug>(resultat: &DomainResult<T>, message_attendu: &str) {
    match resultat {
        Err(DomainError::MauvaiseCommande(message)) => assert_eq!(message, message_attendu),
        autre => panic!("MauvaiseCommande attendue, obtenu {:?}", autre),
    }
}

/// Asserts the error code exposed to API clients
pub fn assert_code_erreur<T: std::fmt::Debug>(resultat: &DomainResult<T>, code: &str) {
    match resultat {
        Err(e) => assert_eq!(e.code(), code, "code inattendu pour {:?}", e),
        Ok(valeur) => panic!("erreur {} attendue, obtenu Ok({:?})", code, valeur),
    }
}
