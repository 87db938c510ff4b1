//! Tests for the action aggregate: creation, statut lifecycle, reminders,
//! deletion and qualification rules

use chrono::{DateTime, Duration, NaiveDate, Utc};

use core_kernel::temporal::{a_l_heure, to_paris};
use core_kernel::{ActionId, ConseillerId, DomainError, JeuneId, Structure};
use domain_action::{
    Action, CodeQualification, EtatQualification, FiltreActions, MiseAJourAction,
    NouvelleAction, StatutAction, TriActions, TypeCreateur,
};
use domain_beneficiaire::{Conseiller, Jeune, NouveauJeune};

fn paris(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    a_l_heure(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min)
}

fn maintenant() -> DateTime<Utc> {
    paris(2024, 4, 2, 10, 0)
}

fn un_jeune() -> Jeune {
    let conseiller = Conseiller {
        id: ConseillerId::new(),
        prenom: "Nils".to_string(),
        nom: "Tavernier".to_string(),
        email: None,
        structure: Structure::Milo,
        agence: None,
        date_derniere_connexion: None,
    };
    Jeune::creer(
        NouveauJeune {
            id: JeuneId::new(),
            prenom: "Kenji".to_string(),
            nom: "Girac".to_string(),
            email: None,
            structure: Structure::Milo,
            id_partenaire: None,
        },
        &conseiller,
        maintenant(),
    )
}

fn une_nouvelle_action(type_createur: TypeCreateur) -> NouvelleAction {
    NouvelleAction {
        id: ActionId::new(),
        contenu: "Préparer un CV".to_string(),
        description: None,
        statut: None,
        type_createur,
        date_echeance: paris(2024, 4, 10, 0, 0),
        rappel: None,
    }
}

fn une_action() -> Action {
    Action::creer(une_nouvelle_action(TypeCreateur::Jeune), &un_jeune(), maintenant()).unwrap()
}

mod creation_tests {
    use super::*;

    #[test]
    fn test_valeurs_par_defaut() {
        let action = une_action();

        assert_eq!(action.statut, StatutAction::PasCommencee);
        assert!(action.rappel);
        assert_eq!(action.description, "");
        assert!(action.date_fin_reelle.is_none());
        assert!(action.date_debut.is_none());
        assert_eq!(action.etat(), EtatQualification::NonQualifiable);
    }

    #[test]
    fn test_echeance_a_9h30_heure_de_paris() {
        let action = une_action();
        assert_eq!(action.date_echeance, paris(2024, 4, 10, 9, 30));
    }

    #[test]
    fn test_createur_conseiller_vient_du_jeune() {
        let jeune = un_jeune();
        let action =
            Action::creer(une_nouvelle_action(TypeCreateur::Conseiller), &jeune, maintenant()).unwrap();

        let conseiller = jeune.conseiller.unwrap();
        assert_eq!(action.createur.id, conseiller.id.into_uuid());
        assert_eq!(action.createur.prenom, "Nils");
    }

    #[test]
    fn test_createur_conseiller_exige_un_conseiller() {
        let mut jeune = un_jeune();
        jeune.conseiller = None;

        let result = Action::creer(une_nouvelle_action(TypeCreateur::Conseiller), &jeune, maintenant());
        assert!(matches!(result, Err(DomainError::MauvaiseCommande(_))));
    }

    #[test]
    fn test_creee_terminee_fixe_la_date_de_fin_reelle() {
        let mut nouvelle = une_nouvelle_action(TypeCreateur::Jeune);
        nouvelle.statut = Some(StatutAction::Terminee);

        let action = Action::creer(nouvelle, &un_jeune(), maintenant()).unwrap();
        assert_eq!(action.date_fin_reelle, Some(maintenant()));
        assert_eq!(action.etat(), EtatQualification::AQualifier);
    }
}

mod statut_tests {
    use super::*;

    #[test]
    fn test_terminer_puis_reprendre() {
        let mut action = une_action();
        let plus_tard = maintenant() + Duration::hours(2);

        action.mettre_a_jour_statut(StatutAction::Terminee, plus_tard).unwrap();
        assert_eq!(action.date_fin_reelle, Some(plus_tard));
        assert_eq!(action.date_derniere_actualisation, plus_tard);

        action.mettre_a_jour_statut(StatutAction::EnCours, plus_tard).unwrap();
        assert!(action.date_fin_reelle.is_none());
        assert_eq!(action.date_debut, Some(plus_tard));
    }

    #[test]
    fn test_lecture_du_statut() {
        assert_eq!("in_progress".parse::<StatutAction>().unwrap(), StatutAction::EnCours);
        assert!("pending".parse::<StatutAction>().is_err());
    }

    #[test]
    fn test_mise_a_jour_signale_le_changement_d_echeance() {
        let mut action = une_action();

        let meme_jour = action
            .mettre_a_jour(
                MiseAJourAction {
                    date_echeance: Some(paris(2024, 4, 10, 18, 0)),
                    ..Default::default()
                },
                maintenant(),
            )
            .unwrap();
        assert!(!meme_jour);

        let autre_jour = action
            .mettre_a_jour(
                MiseAJourAction {
                    date_echeance: Some(paris(2024, 4, 12, 0, 0)),
                    contenu: Some("Envoyer le CV".to_string()),
                    ..Default::default()
                },
                maintenant(),
            )
            .unwrap();
        assert!(autre_jour);
        assert_eq!(action.contenu, "Envoyer le CV");
    }
}

mod rappel_tests {
    use super::*;

    #[test]
    fn test_planifier_si_echeance_a_plus_de_3_jours() {
        let action = une_action();
        // échéance 10/04, now 02/04
        assert!(action.doit_planifier_une_notification_de_rappel(maintenant()));
        // now 07/04: 07 + 3 = 10, not strictly before
        assert!(!action.doit_planifier_une_notification_de_rappel(paris(2024, 4, 7, 8, 0)));
    }

    #[test]
    fn test_pas_de_planification_sans_rappel_ou_si_terminee() {
        let mut action = une_action();
        action.rappel = false;
        assert!(!action.doit_planifier_une_notification_de_rappel(maintenant()));

        let mut annulee = une_action();
        annulee.mettre_a_jour_statut(StatutAction::Annulee, maintenant()).unwrap();
        assert!(!annulee.doit_planifier_une_notification_de_rappel(maintenant()));
    }

    #[test]
    fn test_envoyer_exactement_3_jours_avant() {
        let action = une_action();
        assert!(action
            .doit_envoyer_une_notification_de_rappel(paris(2024, 4, 7, 8, 0))
            .is_ok());
    }

    #[test]
    fn test_envoyer_raisons() {
        let action = une_action();
        let err = action
            .doit_envoyer_une_notification_de_rappel(paris(2024, 4, 5, 8, 0))
            .unwrap_err();
        assert!(err.to_string().contains("n'arrive pas à échéance dans 3 jours"));

        let mut sans_rappel = une_action();
        sans_rappel.rappel = false;
        let err = sans_rappel
            .doit_envoyer_une_notification_de_rappel(paris(2024, 4, 7, 8, 0))
            .unwrap_err();
        assert!(err.to_string().contains("le rappel est désactivé"));

        let mut terminee = une_action();
        terminee.mettre_a_jour_statut(StatutAction::Terminee, maintenant()).unwrap();
        let err = terminee
            .doit_envoyer_une_notification_de_rappel(paris(2024, 4, 7, 8, 0))
            .unwrap_err();
        assert!(err.to_string().contains("le statut est done"));
    }

    #[test]
    fn test_date_du_rappel() {
        let action = une_action();
        let rappel = to_paris(action.date_du_rappel());
        assert_eq!(rappel.date_naive(), NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());
    }
}

mod suppression_tests {
    use super::*;

    #[test]
    fn test_action_commentee_non_supprimable() {
        let err = une_action().verifier_suppression(true).unwrap_err();
        assert_eq!(err.to_string(), "Impossible de supprimer une action avec un commentaire.");
    }

    #[test]
    fn test_action_terminee_non_supprimable() {
        let mut action = une_action();
        action.mettre_a_jour_statut(StatutAction::Terminee, maintenant()).unwrap();
        let err = action.verifier_suppression(false).unwrap_err();
        assert_eq!(err.to_string(), "Impossible de supprimer une action terminée.");
    }

    #[test]
    fn test_action_en_cours_supprimable() {
        assert!(une_action().verifier_suppression(false).is_ok());
    }
}

mod qualification_tests {
    use super::*;

    fn une_action_terminee() -> Action {
        let mut action = une_action();
        action.mettre_a_jour_statut(StatutAction::Terminee, maintenant()).unwrap();
        action
    }

    #[test]
    fn test_qualifier_exige_terminee() {
        let mut action = une_action();
        let result = action.qualifier(CodeQualification::Emploi, None, None, None, None, maintenant());
        assert!(matches!(result, Err(DomainError::MauvaiseCommande(_))));
    }

    #[test]
    fn test_qualifier_avec_les_heures_par_defaut() {
        let mut action = une_action_terminee();
        action
            .qualifier(CodeQualification::Formation, None, None, None, None, maintenant())
            .unwrap();

        let qualification = action.qualification.clone().unwrap();
        assert_eq!(qualification.heures, 3);
        assert_eq!(action.etat(), EtatQualification::Qualifiee);
    }

    #[test]
    fn test_action_qualifiee_reste_qualifiable() {
        let mut action = une_action_terminee();
        action
            .qualifier(CodeQualification::Sante, Some(4), None, None, None, maintenant())
            .unwrap();

        let result = action.qualifier(
            CodeQualification::NonQualifiable,
            None,
            None,
            None,
            None,
            maintenant(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_qualifier_refuse_fin_avant_debut() {
        let mut action = une_action_terminee();
        let result = action.qualifier(
            CodeQualification::Emploi,
            None,
            None,
            Some(maintenant()),
            Some(maintenant() - Duration::days(1)),
            maintenant(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_statut_fige_apres_qualification() {
        let mut action = une_action_terminee();
        action
            .qualifier(CodeQualification::Emploi, None, None, None, None, maintenant())
            .unwrap();
        assert!(action.mettre_a_jour_statut(StatutAction::EnCours, maintenant()).is_err());
    }
}

mod listing_tests {
    use super::*;

    #[test]
    fn test_tri_statut_terminees_en_dernier() {
        let mut terminee = une_action();
        terminee
            .mettre_a_jour_statut(StatutAction::Terminee, maintenant() + Duration::hours(5))
            .unwrap();
        let mut recente = une_action();
        recente.date_derniere_actualisation = maintenant() + Duration::hours(1);
        let ancienne = une_action();

        let mut actions = vec![terminee.clone(), ancienne.clone(), recente.clone()];
        actions.sort_by(|a, b| TriActions::Statut.comparer(a, b));

        assert_eq!(actions[0].id, recente.id);
        assert_eq!(actions[1].id, ancienne.id);
        assert_eq!(actions[2].id, terminee.id);
    }

    #[test]
    fn test_filtre_etats() {
        let mut terminee = une_action();
        terminee.mettre_a_jour_statut(StatutAction::Terminee, maintenant()).unwrap();
        let en_cours = une_action();

        let filtre = FiltreActions {
            etats: vec![EtatQualification::AQualifier],
            ..Default::default()
        };
        assert!(filtre.accepte(&terminee));
        assert!(!filtre.accepte(&en_cours));
    }
}
