//! Tests for the domain error set

use core_kernel::{DomainError, JeuneId, PortError};

#[test]
fn test_non_trouve_message() {
    let error = DomainError::non_trouve("Jeune", "ABCDE");

    assert_eq!(error.to_string(), "Jeune ABCDE non trouvé(e)");
    assert_eq!(error.code(), "NON_TROUVE");
    assert_eq!(error.status_code(), 404);
    assert!(error.is_non_trouve());
}

#[test]
fn test_droits_insuffisants() {
    let error = DomainError::DroitsInsuffisants;

    assert_eq!(
        error.to_string(),
        "Vous n'avez pas le droit d'effectuer cette action"
    );
    assert_eq!(error.code(), "DROITS_INSUFFISANTS");
    assert_eq!(error.status_code(), 403);
}

#[test]
fn test_mauvaise_commande_garde_le_message() {
    let error = DomainError::mauvaise_commande("Impossible de supprimer une action terminée.");

    assert_eq!(error.to_string(), "Impossible de supprimer une action terminée.");
    assert_eq!(error.status_code(), 400);
}

#[test]
fn test_pas_de_rappel_message() {
    let error = DomainError::pas_de_rappel("42", "le rappel est désactivé");

    assert_eq!(
        error.to_string(),
        "Pas de rappel à envoyer pour l'action 42 car le rappel est désactivé"
    );
    assert_eq!(error.code(), "PAS_DE_RAPPEL");
}

#[test]
fn test_jeune_non_lie_au_conseiller() {
    let id_jeune = JeuneId::new();
    let error = DomainError::jeune_non_lie_au_conseiller("conseiller-1", id_jeune);

    assert_eq!(error.code(), "JEUNE_NON_LIE_AU_CONSEILLER");
    assert!(error.to_string().contains(&id_jeune.to_string()));
}

#[test]
fn test_conflits_en_409() {
    assert_eq!(DomainError::EmailExisteDeja("a@b.fr".into()).status_code(), 409);
    assert_eq!(DomainError::DossierExisteDeja("123".into()).status_code(), 409);
    assert_eq!(DomainError::FavoriExisteDeja("offre".into()).code(), "EXISTE_DEJA");
}

#[test]
fn test_erreur_de_port_remontee_en_erreur_de_depot() {
    fn lookup() -> Result<(), DomainError> {
        Err(PortError::connection("refused"))?;
        Ok(())
    }

    let error = lookup().unwrap_err();
    assert!(matches!(error, DomainError::Repository(_)));
    assert_eq!(error.code(), "ERREUR_TECHNIQUE");
    assert_eq!(error.status_code(), 500);
}

#[test]
fn test_port_non_trouve_en_404() {
    let error: DomainError = PortError::not_found("Action", "1").into();
    assert_eq!(error.status_code(), 404);
}
