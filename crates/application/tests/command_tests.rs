//! Command Handler Tests
//!
//! End-to-end runs of `CommandHandler::execute` against the in-memory
//! adapters, covering authorization, persistence, side effects
//! (notifications, reminders) and engagement events.

use application::commands::*;
use application::testing::ContexteEnMemoire;
use application::CommandHandler;
use serde_json::json;

use core_kernel::{ActionId, ConseillerId, JeuneId, ListeDeDiffusionId, Structure, SuggestionId};
use domain_action::{
    ActionRepository, CodeQualification, CommentaireRepository, StatutAction, TypeCreateur,
};
use domain_beneficiaire::{
    Conseiller, ConseillerRepository, InformationsSuggestion, Jeune, JeuneRepository,
    ListeDeDiffusion, ListeDeDiffusionRepository, MiseAJourPreferences, Preferences, Suggestion,
    SuggestionRepository, TypeRecherche, TypeTransfert,
};
use domain_notification::{
    id_job_rappel_action, CodeEvenement, ContenuNotifierBeneficiaires, JobType, TypeNotification,
};
use test_utils::{
    assert_code_erreur, assert_droits_insuffisants, assert_mauvaise_commande, assert_non_trouve,
    ActionBuilder, ConseillerBuilder, DatesFixtures, JeuneBuilder, UtilisateurFixtures,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// A conseiller with one jeune, both persisted
async fn un_portefeuille() -> (ContexteEnMemoire, Conseiller, Jeune) {
    let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
    let conseiller = ConseillerBuilder::new().build();
    let jeune = JeuneBuilder::new().with_conseiller(&conseiller).build();
    memoire.conseillers.save(&conseiller).await.unwrap();
    memoire.jeunes.save(&jeune).await.unwrap();
    (memoire, conseiller, jeune)
}

async fn codes_evenements(memoire: &ContexteEnMemoire) -> Vec<CodeEvenement> {
    memoire
        .evenements
        .evenements()
        .await
        .into_iter()
        .map(|e| e.code)
        .collect()
}

// ============================================================================
// JEUNES
// ============================================================================

mod jeunes {
    use super::*;

    fn creer_jeune(id_conseiller: ConseillerId, email: &str) -> CreerJeuneCommand {
        CreerJeuneCommand {
            id_conseiller,
            prenom: "Kenji".to_string(),
            nom: "Girac".to_string(),
            email: Some(email.to_string()),
            structure: Structure::Milo,
            id_partenaire: Some("1234".to_string()),
        }
    }

    #[tokio::test]
    async fn test_creer_jeune() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let handler = CreerJeuneCommandHandler::new(&memoire.contexte());

        let jeune = handler
            .execute(
                creer_jeune(conseiller.id, "Kenji.Girac@Mail.fr"),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        assert!(!jeune.is_activated);
        assert_eq!(jeune.email.as_deref(), Some("kenji.girac@mail.fr"));
        assert_eq!(jeune.id_conseiller(), Some(conseiller.id));
        assert!(memoire.jeunes.get(jeune.id).await.unwrap().is_some());
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::CompteJeuneCree]);
    }

    #[tokio::test]
    async fn test_creer_jeune_email_existant() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let existant = JeuneBuilder::new().with_email("deja@mail.fr").build();
        memoire.jeunes.save(&existant).await.unwrap();
        let handler = CreerJeuneCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                creer_jeune(conseiller.id, "deja@mail.fr"),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_code_erreur(&resultat, "EMAIL_EXISTE_DEJA");
        assert!(codes_evenements(&memoire).await.is_empty());
    }

    #[tokio::test]
    async fn test_creer_jeune_dossier_existant() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let existant = JeuneBuilder::new().with_id_partenaire("1234").build();
        memoire.jeunes.save(&existant).await.unwrap();
        let handler = CreerJeuneCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                creer_jeune(conseiller.id, "nouveau@mail.fr"),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_code_erreur(&resultat, "DOSSIER_EXISTE_DEJA");
    }

    #[tokio::test]
    async fn test_creer_jeune_prenom_vide() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let handler = CreerJeuneCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                CreerJeuneCommand {
                    prenom: String::new(),
                    ..creer_jeune(conseiller.id, "kenji@mail.fr")
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "prenom: le prénom est obligatoire");
    }

    #[tokio::test]
    async fn test_creer_jeune_pour_un_autre_conseiller() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let handler = CreerJeuneCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                creer_jeune(conseiller.id, "kenji@mail.fr"),
                &UtilisateurFixtures::conseiller(ConseillerId::new()),
            )
            .await;

        assert_droits_insuffisants(&resultat);
    }

    #[tokio::test]
    async fn test_preferences_partielles() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let handler = UpdateJeunePreferencesCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                UpdateJeunePreferencesCommand {
                    id_jeune: jeune.id,
                    preferences: MiseAJourPreferences {
                        creation_action_conseiller: Some(false),
                        ..MiseAJourPreferences::default()
                    },
                },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await
            .unwrap();

        let preferences = memoire.jeunes.get(jeune.id).await.unwrap().unwrap().preferences;
        assert_eq!(
            preferences,
            Preferences {
                creation_action_conseiller: false,
                ..Preferences::default()
            }
        );
    }

    #[tokio::test]
    async fn test_token_active_le_compte() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let inactif = JeuneBuilder::new().with_conseiller(&conseiller).sans_token().build();
        memoire.jeunes.save(&inactif).await.unwrap();
        let handler = UpdateNotificationTokenCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                UpdateNotificationTokenCommand {
                    id_jeune: inactif.id,
                    token: "nouveau-token".to_string(),
                    app_version: Some("3.4.0".to_string()),
                },
                &UtilisateurFixtures::jeune(inactif.id),
            )
            .await
            .unwrap();

        let jeune = memoire.jeunes.get(inactif.id).await.unwrap().unwrap();
        assert!(jeune.is_activated);
        assert_eq!(jeune.push_notification_token(), Some("nouveau-token"));
        assert_eq!(
            jeune.configuration.date_derniere_actualisation_token,
            Some(DatesFixtures::maintenant())
        );
    }

    #[tokio::test]
    async fn test_modifier_id_partenaire() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = ModifierJeuneDuConseillerCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                ModifierJeuneDuConseillerCommand {
                    id_jeune: jeune.id,
                    id_partenaire: Some("98765".to_string()),
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        let jeune = memoire.jeunes.get(jeune.id).await.unwrap().unwrap();
        assert_eq!(jeune.id_partenaire.as_deref(), Some("98765"));
    }

    #[tokio::test]
    async fn test_supprimer_jeune_par_le_support() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let handler = SupprimerJeuneCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                SupprimerJeuneCommand { id_jeune: jeune.id },
                &UtilisateurFixtures::support(),
            )
            .await
            .unwrap();

        assert!(memoire.jeunes.get(jeune.id).await.unwrap().is_none());
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::CompteJeuneSupprime]);
    }

    #[tokio::test]
    async fn test_supprimer_jeune_actif_refuse() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = SupprimerJeuneInactifCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                SupprimerJeuneInactifCommand { id_jeune: jeune.id },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_code_erreur(&resultat, "JEUNE_PAS_INACTIF");
        assert!(memoire.jeunes.get(jeune.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_supprimer_jeune_inactif() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let inactif = JeuneBuilder::new().with_conseiller(&conseiller).sans_token().build();
        memoire.jeunes.save(&inactif).await.unwrap();
        let handler = SupprimerJeuneInactifCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                SupprimerJeuneInactifCommand { id_jeune: inactif.id },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        assert!(memoire.jeunes.get(inactif.id).await.unwrap().is_none());
    }
}

// ============================================================================
// TRANSFERTS
// ============================================================================

mod transferts {
    use super::*;

    #[tokio::test]
    async fn test_transfert_temporaire_par_le_conseiller() {
        let (memoire, source, jeune) = un_portefeuille().await;
        let cible = ConseillerBuilder::new().build();
        memoire.conseillers.save(&cible).await.unwrap();
        let handler = TransfererJeunesCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                TransfererJeunesCommand {
                    id_conseiller_source: source.id,
                    id_conseiller_cible: cible.id,
                    ids_jeunes: vec![jeune.id],
                    type_transfert: TypeTransfert::Temporaire,
                    id_conseiller_qui_transfert: Some(source.id),
                },
                &UtilisateurFixtures::conseiller(source.id),
            )
            .await
            .unwrap();

        let transfere = memoire.jeunes.get(jeune.id).await.unwrap().unwrap();
        assert_eq!(transfere.id_conseiller(), Some(cible.id));
        assert_eq!(transfere.id_conseiller_initial, Some(source.id));

        let transferts = memoire.jeunes.transferts().await;
        assert_eq!(transferts.len(), 1);
        assert_eq!(transferts[0].id_conseiller_source, source.id);
        assert_eq!(transferts[0].date_transfert, DatesFixtures::maintenant());
    }

    #[tokio::test]
    async fn test_transfert_definitif_reserve_au_superviseur() {
        let (memoire, source, jeune) = un_portefeuille().await;
        let cible = ConseillerBuilder::new().build();
        memoire.conseillers.save(&cible).await.unwrap();
        let handler = TransfererJeunesCommandHandler::new(&memoire.contexte());
        let command = TransfererJeunesCommand {
            id_conseiller_source: source.id,
            id_conseiller_cible: cible.id,
            ids_jeunes: vec![jeune.id],
            type_transfert: TypeTransfert::Definitif,
            id_conseiller_qui_transfert: None,
        };

        assert_droits_insuffisants(
            &handler
                .execute(command.clone(), &UtilisateurFixtures::conseiller(source.id))
                .await,
        );
        handler
            .execute(command, &UtilisateurFixtures::superviseur(ConseillerId::new()))
            .await
            .unwrap();

        let transfere = memoire.jeunes.get(jeune.id).await.unwrap().unwrap();
        assert_eq!(transfere.id_conseiller(), Some(cible.id));
        assert_eq!(transfere.id_conseiller_initial, None);
    }

    #[tokio::test]
    async fn test_jeune_d_un_autre_conseiller() {
        let (memoire, source, _) = un_portefeuille().await;
        let cible = ConseillerBuilder::new().build();
        let ailleurs = JeuneBuilder::new().with_conseiller(&cible).build();
        memoire.conseillers.save(&cible).await.unwrap();
        memoire.jeunes.save(&ailleurs).await.unwrap();
        let handler = TransfererJeunesCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                TransfererJeunesCommand {
                    id_conseiller_source: source.id,
                    id_conseiller_cible: cible.id,
                    ids_jeunes: vec![ailleurs.id],
                    type_transfert: TypeTransfert::Definitif,
                    id_conseiller_qui_transfert: None,
                },
                &UtilisateurFixtures::superviseur(ConseillerId::new()),
            )
            .await;

        assert_code_erreur(&resultat, "JEUNE_NON_LIE_AU_CONSEILLER");
        assert!(memoire.jeunes.transferts().await.is_empty());
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

mod actions {
    use super::*;

    fn creer_action(id_jeune: JeuneId, type_createur: TypeCreateur) -> CreateActionCommand {
        CreateActionCommand {
            id_action: ActionId::new(),
            id_jeune,
            contenu: "Postuler chez Decathlon".to_string(),
            description: None,
            statut: None,
            type_createur,
            date_echeance: DatesFixtures::dans_jours(10),
            rappel: None,
        }
    }

    #[tokio::test]
    async fn test_action_creee_par_le_conseiller() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = CreateActionCommandHandler::new(&memoire.contexte());

        let id = handler
            .execute(
                creer_action(jeune.id, TypeCreateur::Conseiller),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        let action = memoire.actions.get(id).await.unwrap().unwrap();
        assert_eq!(action.createur.id, conseiller.id.as_uuid());
        assert_eq!(action.statut, StatutAction::PasCommencee);

        let envoyees = memoire.notifications.envoyees().await;
        assert_eq!(envoyees.len(), 1);
        assert_eq!(envoyees[0].id_jeune, jeune.id);
        assert_eq!(envoyees[0].message.type_notification, TypeNotification::NouvelleAction);

        let rappel = memoire.planificateur.get(&id_job_rappel_action(&action)).await.unwrap();
        assert_eq!(rappel.job_type, JobType::NotifierRappelAction);
        assert_eq!(rappel.date_execution, action.date_du_rappel());
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::ActionCreee]);
    }

    #[tokio::test]
    async fn test_action_creee_par_le_jeune_sans_notification() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let handler = CreateActionCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                creer_action(jeune.id, TypeCreateur::Jeune),
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await
            .unwrap();

        assert!(memoire.notifications.envoyees().await.is_empty());
        assert_eq!(memoire.planificateur.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_preference_desactivee_pas_de_notification() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let jeune = JeuneBuilder::new()
            .with_conseiller(&conseiller)
            .with_preferences(Preferences {
                creation_action_conseiller: false,
                ..Preferences::default()
            })
            .build();
        memoire.jeunes.save(&jeune).await.unwrap();
        let handler = CreateActionCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                creer_action(jeune.id, TypeCreateur::Conseiller),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        assert!(memoire.notifications.envoyees().await.is_empty());
    }

    #[tokio::test]
    async fn test_echeance_proche_sans_rappel() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let handler = CreateActionCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                CreateActionCommand {
                    date_echeance: DatesFixtures::dans_jours(2),
                    ..creer_action(jeune.id, TypeCreateur::Jeune)
                },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await
            .unwrap();

        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_monitoring_en_echec_ne_bloque_pas() {
        let (memoire, _, jeune) = un_portefeuille().await;
        memoire.evenements.mettre_en_panne().await;
        let handler = CreateActionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                creer_action(jeune.id, TypeCreateur::Jeune),
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await;

        assert!(resultat.is_ok());
        assert!(memoire.evenements.evenements().await.is_empty());
    }

    #[tokio::test]
    async fn test_terminer_une_action_supprime_son_rappel() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let ctx = memoire.contexte();
        let id = CreateActionCommandHandler::new(&ctx)
            .execute(
                creer_action(jeune.id, TypeCreateur::Jeune),
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await
            .unwrap();
        assert_eq!(memoire.planificateur.jobs().await.len(), 1);

        UpdateActionCommandHandler::new(&ctx)
            .execute(
                UpdateActionCommand {
                    id_action: id,
                    statut: Some(StatutAction::Terminee),
                    ..UpdateActionCommand::default()
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        let action = memoire.actions.get(id).await.unwrap().unwrap();
        assert_eq!(action.date_fin_reelle, Some(DatesFixtures::maintenant()));
        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_contenu_vide_refuse() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let action = ActionBuilder::new(jeune.id).build();
        memoire.actions.save(&action).await.unwrap();
        let handler = UpdateActionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                UpdateActionCommand {
                    id_action: action.id,
                    contenu: Some("  ".to_string()),
                    ..UpdateActionCommand::default()
                },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "contenu: le contenu est obligatoire");
    }

    #[tokio::test]
    async fn test_suppression_d_une_action_commentee() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let action = ActionBuilder::new(jeune.id).build();
        memoire.actions.save(&action).await.unwrap();
        let ctx = memoire.contexte();

        AddCommentaireActionCommandHandler::new(&ctx)
            .execute(
                AddCommentaireActionCommand {
                    id_action: action.id,
                    message: "Pense à joindre ta lettre".to_string(),
                    auteur: UtilisateurFixtures::conseiller(conseiller.id),
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();
        let resultat = DeleteActionCommandHandler::new(&ctx)
            .execute(
                DeleteActionCommand { id_action: action.id },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "Impossible de supprimer une action avec un commentaire.");
        assert_eq!(memoire.commentaires.find_all_by_action(action.id).await.unwrap().len(), 1);
        let envoyees = memoire.notifications.envoyees().await;
        assert_eq!(envoyees.len(), 1);
        assert_eq!(envoyees[0].message.type_notification, TypeNotification::DetailAction);
    }

    #[tokio::test]
    async fn test_suppression() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let action = ActionBuilder::new(jeune.id).build();
        memoire.actions.save(&action).await.unwrap();
        let handler = DeleteActionCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                DeleteActionCommand { id_action: action.id },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await
            .unwrap();

        assert!(memoire.actions.get(action.id).await.unwrap().is_none());
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::ActionSupprimee]);
    }

    #[tokio::test]
    async fn test_qualification_par_le_conseiller() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let action = ActionBuilder::new(jeune.id)
            .with_statut(StatutAction::Terminee)
            .build();
        memoire.actions.save(&action).await.unwrap();
        let handler = QualifierActionCommandHandler::new(&memoire.contexte());
        let command = QualifierActionCommand {
            id_action: action.id,
            code_qualification: CodeQualification::Emploi,
            heures: None,
            commentaire: Some("Entretien d'embauche".to_string()),
            date_debut: None,
            date_fin_reelle: None,
        };

        assert_droits_insuffisants(
            &handler
                .execute(command.clone(), &UtilisateurFixtures::jeune(jeune.id))
                .await,
        );
        handler
            .execute(command, &UtilisateurFixtures::conseiller(conseiller.id))
            .await
            .unwrap();

        let qualification = memoire
            .actions
            .get(action.id)
            .await
            .unwrap()
            .unwrap()
            .qualification
            .unwrap();
        assert_eq!(qualification.code, CodeQualification::Emploi);
        assert_eq!(qualification.heures, 3);
    }

    #[tokio::test]
    async fn test_qualification_d_une_action_en_cours() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let action = ActionBuilder::new(jeune.id)
            .with_statut(StatutAction::EnCours)
            .build();
        memoire.actions.save(&action).await.unwrap();
        let handler = QualifierActionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                QualifierActionCommand {
                    id_action: action.id,
                    code_qualification: CodeQualification::Sante,
                    heures: Some(1),
                    commentaire: None,
                    date_debut: None,
                    date_fin_reelle: None,
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "L'action n'est pas terminée");
    }
}

// ============================================================================
// LISTES DE DIFFUSION
// ============================================================================

mod listes_de_diffusion {
    use super::*;

    #[tokio::test]
    async fn test_creer_liste() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = CreateListeDeDiffusionCommandHandler::new(&memoire.contexte());

        let id = handler
            .execute(
                CreateListeDeDiffusionCommand {
                    id_conseiller: conseiller.id,
                    titre: "Alternance".to_string(),
                    ids_beneficiaires: vec![jeune.id, jeune.id],
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        let liste = memoire.listes_de_diffusion.get(id).await.unwrap().unwrap();
        assert_eq!(liste.ids_beneficiaires(), vec![jeune.id]);
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::ListeDeDiffusionCreee]);
    }

    #[tokio::test]
    async fn test_creer_liste_avec_jeune_d_un_autre() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let autre = JeuneBuilder::new().build();
        memoire.jeunes.save(&autre).await.unwrap();
        let handler = CreateListeDeDiffusionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                CreateListeDeDiffusionCommand {
                    id_conseiller: conseiller.id,
                    titre: "Alternance".to_string(),
                    ids_beneficiaires: vec![autre.id],
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_droits_insuffisants(&resultat);
    }

    #[tokio::test]
    async fn test_modifier_puis_supprimer() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let second = JeuneBuilder::new().with_conseiller(&conseiller).build();
        memoire.jeunes.save(&second).await.unwrap();
        let liste = ListeDeDiffusion::creer(
            ListeDeDiffusionId::new(),
            conseiller.id,
            "Alternance",
            &[jeune.id],
            DatesFixtures::dans_jours(-3),
        );
        memoire.listes_de_diffusion.save(&liste).await.unwrap();
        let ctx = memoire.contexte();
        let utilisateur = UtilisateurFixtures::conseiller(conseiller.id);

        UpdateListeDeDiffusionCommandHandler::new(&ctx)
            .execute(
                UpdateListeDeDiffusionCommand {
                    id_liste: liste.id,
                    titre: "Alternance 2024".to_string(),
                    ids_beneficiaires: vec![jeune.id, second.id],
                },
                &utilisateur,
            )
            .await
            .unwrap();

        let modifiee = memoire.listes_de_diffusion.get(liste.id).await.unwrap().unwrap();
        assert_eq!(modifiee.titre, "Alternance 2024");
        assert_eq!(modifiee.beneficiaires[0].date_ajout, DatesFixtures::dans_jours(-3));
        assert_eq!(modifiee.beneficiaires[1].date_ajout, DatesFixtures::maintenant());

        DeleteListeDeDiffusionCommandHandler::new(&ctx)
            .execute(DeleteListeDeDiffusionCommand { id_liste: liste.id }, &utilisateur)
            .await
            .unwrap();
        assert!(memoire.listes_de_diffusion.get(liste.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_liste_d_un_autre_conseiller() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let liste = ListeDeDiffusion::creer(
            ListeDeDiffusionId::new(),
            conseiller.id,
            "Alternance",
            &[jeune.id],
            DatesFixtures::maintenant(),
        );
        memoire.listes_de_diffusion.save(&liste).await.unwrap();
        let handler = DeleteListeDeDiffusionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                DeleteListeDeDiffusionCommand { id_liste: liste.id },
                &UtilisateurFixtures::conseiller(ConseillerId::new()),
            )
            .await;

        assert_droits_insuffisants(&resultat);
    }
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

mod suggestions {
    use super::*;

    fn informations() -> InformationsSuggestion {
        InformationsSuggestion {
            titre: "Boulanger".to_string(),
            metier: Some("Boulangerie".to_string()),
            localisation: Some("Lille".to_string()),
        }
    }

    #[tokio::test]
    async fn test_suggestion_pour_ses_jeunes() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = CreateSuggestionConseillerCommandHandler::new(&memoire.contexte());

        let ids = handler
            .execute(
                CreateSuggestionConseillerCommand {
                    ids_jeunes: vec![jeune.id],
                    type_recherche: TypeRecherche::OffresEmploi,
                    criteres: json!({ "q": "boulanger", "commune": "59350" }),
                    informations: informations(),
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 1);
        let suggestions = memoire.suggestions.find_all_by_jeune(jeune.id).await.unwrap();
        assert_eq!(suggestions[0].id, ids[0]);
        assert_eq!(suggestions[0].criteres["q"], "boulanger");
    }

    #[tokio::test]
    async fn test_suggestion_sans_jeune() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let handler = CreateSuggestionConseillerCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                CreateSuggestionConseillerCommand {
                    ids_jeunes: vec![],
                    type_recherche: TypeRecherche::OffresEmploi,
                    criteres: json!({}),
                    informations: informations(),
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "Au moins un bénéficiaire est requis");
    }

    #[tokio::test]
    async fn test_refuser_une_suggestion() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let suggestion = Suggestion::creer_par_conseiller(
            jeune.id,
            TypeRecherche::OffresAlternance,
            json!({}),
            informations(),
            DatesFixtures::dans_jours(-1),
        );
        memoire.suggestions.save(&suggestion).await.unwrap();
        let handler = RefuserSuggestionCommandHandler::new(&memoire.contexte());
        let command = RefuserSuggestionCommand {
            id_jeune: jeune.id,
            id_suggestion: suggestion.id,
        };

        handler
            .execute(command.clone(), &UtilisateurFixtures::jeune(jeune.id))
            .await
            .unwrap();
        let refusee = memoire.suggestions.get(suggestion.id).await.unwrap().unwrap();
        assert_eq!(refusee.date_refus, Some(DatesFixtures::maintenant()));

        let deuxieme_refus = handler
            .execute(command, &UtilisateurFixtures::jeune(jeune.id))
            .await;
        assert_mauvaise_commande(&deuxieme_refus, "La suggestion a déjà été traitée");
    }

    #[tokio::test]
    async fn test_refuser_la_suggestion_d_un_autre() {
        let (memoire, _, jeune) = un_portefeuille().await;
        let handler = RefuserSuggestionCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                RefuserSuggestionCommand {
                    id_jeune: jeune.id,
                    id_suggestion: SuggestionId::new(),
                },
                &UtilisateurFixtures::jeune(jeune.id),
            )
            .await;

        assert_non_trouve(&resultat, "Suggestion");
    }
}

// ============================================================================
// NOTIFICATION BROADCAST
// ============================================================================

mod notifier_beneficiaires {
    use super::*;

    fn diffusion() -> CreerJobNotifierBeneficiairesCommand {
        CreerJobNotifierBeneficiairesCommand {
            type_notification: TypeNotification::Outils,
            titre: "Nouveautés".to_string(),
            description: "Découvrez les nouveaux outils".to_string(),
            structures: vec![Structure::Milo, Structure::PoleEmploi],
            push: true,
            batch_size: Some(100),
            minutes_entre_les_batchs: None,
        }
    }

    #[tokio::test]
    async fn test_job_planifie_immediatement() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = CreerJobNotifierBeneficiairesCommandHandler::new(&memoire.contexte());

        let id_job = handler
            .execute(diffusion(), &UtilisateurFixtures::support())
            .await
            .unwrap();

        let job = memoire.planificateur.get(&id_job).await.unwrap();
        assert_eq!(job.job_type, JobType::NotifierBeneficiaires);
        assert_eq!(job.date_execution, DatesFixtures::maintenant());
        let contenu: ContenuNotifierBeneficiaires = job.contenu().unwrap();
        assert_eq!(contenu.batch_size, Some(100));
        assert_eq!(contenu.offset, None);
        assert_eq!(
            codes_evenements(&memoire).await,
            vec![CodeEvenement::NotificationBeneficiairesPlanifiee]
        );
    }

    #[tokio::test]
    async fn test_reserve_au_support() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = CreerJobNotifierBeneficiairesCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(diffusion(), &UtilisateurFixtures::conseiller(ConseillerId::new()))
            .await;

        assert_droits_insuffisants(&resultat);
        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_sans_structure() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = CreerJobNotifierBeneficiairesCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                CreerJobNotifierBeneficiairesCommand {
                    structures: vec![],
                    ..diffusion()
                },
                &UtilisateurFixtures::support(),
            )
            .await;

        assert_mauvaise_commande(&resultat, "structures: au moins une structure est requise");
    }

    #[tokio::test]
    async fn test_batch_size_nul() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = CreerJobNotifierBeneficiairesCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                CreerJobNotifierBeneficiairesCommand {
                    batch_size: Some(0),
                    ..diffusion()
                },
                &UtilisateurFixtures::support(),
            )
            .await;

        assert_code_erreur(&resultat, "MAUVAISE_COMMANDE");
    }

    #[test]
    fn test_id_job_rappel_action_stable() {
        let action = ActionBuilder::new(JeuneId::new()).build();
        assert_eq!(
            id_job_rappel_action(&action),
            format!("action:{}:3", action.id.as_uuid())
        );
    }
}

// ============================================================================
// MESSAGES GROUPES
// ============================================================================

mod messages_groupes {
    use super::*;

    fn un_message(
        id_conseiller: ConseillerId,
        ids_beneficiaires: Vec<JeuneId>,
        ids_listes_de_diffusion: Vec<ListeDeDiffusionId>,
    ) -> EnvoyerMessageGroupeCommand {
        EnvoyerMessageGroupeCommand {
            id_conseiller,
            ids_beneficiaires,
            ids_listes_de_diffusion,
            message: "bWVzc2FnZSBjaGlmZnLDqQ==".to_string(),
            iv: "aXY=".to_string(),
            info_piece_jointe: None,
        }
    }

    #[tokio::test]
    async fn test_message_aux_jeunes_et_aux_listes() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let membre = JeuneBuilder::new().with_conseiller(&conseiller).build();
        let sans_messages = JeuneBuilder::new()
            .with_conseiller(&conseiller)
            .with_preferences(Preferences {
                messages: false,
                ..Preferences::default()
            })
            .build();
        memoire.jeunes.save(&membre).await.unwrap();
        memoire.jeunes.save(&sans_messages).await.unwrap();
        let liste = ListeDeDiffusion::creer(
            ListeDeDiffusionId::new(),
            conseiller.id,
            "Alternance",
            &[jeune.id, membre.id, sans_messages.id],
            DatesFixtures::maintenant(),
        );
        memoire.listes_de_diffusion.save(&liste).await.unwrap();
        let handler = EnvoyerMessageGroupeCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                un_message(conseiller.id, vec![jeune.id], vec![liste.id]),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        let envoyees = memoire.notifications.envoyees().await;
        let destinataires: Vec<JeuneId> = envoyees.iter().map(|n| n.id_jeune).collect();
        assert_eq!(destinataires.len(), 2);
        assert!(destinataires.contains(&jeune.id));
        assert!(destinataires.contains(&membre.id));
        assert!(envoyees
            .iter()
            .all(|n| n.message.type_notification == TypeNotification::NouveauMessage));
        assert_eq!(
            codes_evenements(&memoire).await,
            vec![CodeEvenement::MessageEnvoyeMultiple]
        );
    }

    #[tokio::test]
    async fn test_message_simple_avec_piece_jointe() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let handler = EnvoyerMessageGroupeCommandHandler::new(&memoire.contexte());

        handler
            .execute(
                EnvoyerMessageGroupeCommand {
                    info_piece_jointe: Some(PieceJointe {
                        id: "pj-1".to_string(),
                        nom: "cv.pdf".to_string(),
                    }),
                    ..un_message(conseiller.id, vec![jeune.id], vec![])
                },
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await
            .unwrap();

        assert_eq!(memoire.notifications.envoyees().await.len(), 1);
        assert_eq!(codes_evenements(&memoire).await, vec![CodeEvenement::MessageEnvoyePj]);
    }

    #[tokio::test]
    async fn test_aucun_destinataire() {
        let (memoire, conseiller, _) = un_portefeuille().await;
        let handler = EnvoyerMessageGroupeCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                un_message(conseiller.id, vec![], vec![]),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_mauvaise_commande(&resultat, "Aucun destinataire");
        assert!(codes_evenements(&memoire).await.is_empty());
    }

    #[tokio::test]
    async fn test_jeune_d_un_autre_conseiller() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let autre = JeuneBuilder::new().build();
        memoire.jeunes.save(&autre).await.unwrap();
        let handler = EnvoyerMessageGroupeCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                un_message(conseiller.id, vec![jeune.id, autre.id], vec![]),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_droits_insuffisants(&resultat);
        assert!(memoire.notifications.envoyees().await.is_empty());
    }

    #[tokio::test]
    async fn test_liste_d_un_autre_conseiller() {
        let (memoire, conseiller, jeune) = un_portefeuille().await;
        let liste = ListeDeDiffusion::creer(
            ListeDeDiffusionId::new(),
            ConseillerId::new(),
            "Alternance",
            &[jeune.id],
            DatesFixtures::maintenant(),
        );
        memoire.listes_de_diffusion.save(&liste).await.unwrap();
        let handler = EnvoyerMessageGroupeCommandHandler::new(&memoire.contexte());

        let resultat = handler
            .execute(
                un_message(conseiller.id, vec![], vec![liste.id]),
                &UtilisateurFixtures::conseiller(conseiller.id),
            )
            .await;

        assert_droits_insuffisants(&resultat);
    }
}

// ============================================================================
// CHANGEMENT D'AGENCE
// ============================================================================

mod changement_d_agence {
    use super::*;
    use core_kernel::AgenceId;
    use domain_beneficiaire::Agence;
    use domain_rendez_vous::RendezVousRepository;
    use test_utils::RendezVousBuilder;

    fn une_agence(nom: &str, structure: Structure) -> Agence {
        Agence {
            id: AgenceId::new(),
            nom: nom.to_string(),
            code_departement: "59".to_string(),
            structure,
        }
    }

    struct Agences {
        memoire: ContexteEnMemoire,
        ancienne: Agence,
        nouvelle: Agence,
        conseiller: Conseiller,
        collegue: Conseiller,
    }

    async fn deux_agences() -> Agences {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let ancienne = une_agence("Mission Locale Lille", Structure::Milo);
        let nouvelle = une_agence("Mission Locale Roubaix", Structure::Milo);
        memoire.agences.ajouter(ancienne.clone()).await;
        memoire.agences.ajouter(nouvelle.clone()).await;
        let conseiller = ConseillerBuilder::new().with_agence(ancienne.id).build();
        let collegue = ConseillerBuilder::new().with_agence(ancienne.id).build();
        memoire.conseillers.save(&conseiller).await.unwrap();
        memoire.conseillers.save(&collegue).await.unwrap();
        Agences {
            memoire,
            ancienne,
            nouvelle,
            conseiller,
            collegue,
        }
    }

    #[tokio::test]
    async fn test_les_animations_suivent_leur_createur() {
        let a = deux_agences().await;
        let jeune_du_conseiller = JeuneBuilder::new().with_conseiller(&a.conseiller).build();
        let jeune_du_collegue = JeuneBuilder::new().with_conseiller(&a.collegue).build();
        let jeunes = [jeune_du_conseiller.clone(), jeune_du_collegue.clone()];
        let du_conseiller = RendezVousBuilder::new(&a.conseiller)
            .animation_collective(a.ancienne.id)
            .with_jeunes(&jeunes)
            .build();
        let du_collegue = RendezVousBuilder::new(&a.collegue)
            .animation_collective(a.ancienne.id)
            .with_jeunes(&jeunes)
            .build();
        let sans_le_conseiller = RendezVousBuilder::new(&a.collegue)
            .animation_collective(a.ancienne.id)
            .with_jeunes(&[jeune_du_collegue.clone()])
            .build();
        for animation in [&du_conseiller, &du_collegue, &sans_le_conseiller] {
            a.memoire.rendez_vous.save(animation).await.unwrap();
        }
        let handler = UpdateAgenceConseillerCommandHandler::new(&a.memoire.contexte());

        let changement = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: a.conseiller.id,
                    id_nouvelle_agence: a.nouvelle.id,
                },
                &UtilisateurFixtures::support(),
            )
            .await
            .unwrap();

        assert_eq!(changement.id_ancienne_agence, a.ancienne.id.as_uuid());
        assert_eq!(changement.id_nouvelle_agence, a.nouvelle.id.as_uuid());
        assert_eq!(changement.infos_transfert_animations_collectives.len(), 2);

        let suivie = a.memoire.rendez_vous.get(du_conseiller.id).await.unwrap().unwrap();
        assert_eq!(suivie.id_agence, Some(a.nouvelle.id));
        assert_eq!(suivie.ids_jeunes(), vec![jeune_du_conseiller.id]);
        let info = changement
            .infos_transfert_animations_collectives
            .iter()
            .find(|info| info.id_animation_collective == du_conseiller.id.as_uuid())
            .unwrap();
        assert!(info.agence_transferee);
        assert_eq!(info.jeunes_desinscrits[0].id, jeune_du_collegue.id.as_uuid());

        let restee = a.memoire.rendez_vous.get(du_collegue.id).await.unwrap().unwrap();
        assert_eq!(restee.id_agence, Some(a.ancienne.id));
        assert_eq!(restee.ids_jeunes(), vec![jeune_du_collegue.id]);

        let conseiller = a.memoire.conseillers.get(a.conseiller.id).await.unwrap().unwrap();
        assert_eq!(conseiller.id_agence(), Some(a.nouvelle.id));
        assert_eq!(
            conseiller.agence.unwrap().nom.as_deref(),
            Some("Mission Locale Roubaix")
        );
    }

    #[tokio::test]
    async fn test_reserve_au_support() {
        let a = deux_agences().await;
        let handler = UpdateAgenceConseillerCommandHandler::new(&a.memoire.contexte());

        let resultat = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: a.conseiller.id,
                    id_nouvelle_agence: a.nouvelle.id,
                },
                &UtilisateurFixtures::conseiller(a.conseiller.id),
            )
            .await;

        assert_droits_insuffisants(&resultat);
    }

    #[tokio::test]
    async fn test_agence_d_une_autre_structure() {
        let a = deux_agences().await;
        let agence_france_travail = une_agence("Agence Lille Centre", Structure::PoleEmploi);
        a.memoire.agences.ajouter(agence_france_travail.clone()).await;
        let handler = UpdateAgenceConseillerCommandHandler::new(&a.memoire.contexte());

        let resultat = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: a.conseiller.id,
                    id_nouvelle_agence: agence_france_travail.id,
                },
                &UtilisateurFixtures::support(),
            )
            .await;

        assert_non_trouve(&resultat, "Agence");
    }

    #[tokio::test]
    async fn test_meme_agence() {
        let a = deux_agences().await;
        let handler = UpdateAgenceConseillerCommandHandler::new(&a.memoire.contexte());

        let resultat = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: a.conseiller.id,
                    id_nouvelle_agence: a.ancienne.id,
                },
                &UtilisateurFixtures::support(),
            )
            .await;

        assert_mauvaise_commande(&resultat, "Le conseiller est déjà dans cette agence");
    }

    #[tokio::test]
    async fn test_conseiller_inconnu_ou_sans_agence() {
        let a = deux_agences().await;
        let sans_agence = ConseillerBuilder::new().build();
        a.memoire.conseillers.save(&sans_agence).await.unwrap();
        let handler = UpdateAgenceConseillerCommandHandler::new(&a.memoire.contexte());

        let inconnu = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: ConseillerId::new(),
                    id_nouvelle_agence: a.nouvelle.id,
                },
                &UtilisateurFixtures::support(),
            )
            .await;
        assert_non_trouve(&inconnu, "Conseiller");

        let resultat = handler
            .execute(
                UpdateAgenceConseillerCommand {
                    id_conseiller: sans_agence.id,
                    id_nouvelle_agence: a.nouvelle.id,
                },
                &UtilisateurFixtures::support(),
            )
            .await;
        assert_code_erreur(&resultat, "CONSEILLER_SANS_AGENCE");
    }
}
