//! Job Handler Tests
//!
//! Batched broadcast, reminder jobs, the daily cleanup of execution records
//! and the dispatcher that routes due jobs to their handler.

use application::jobs::*;
use application::testing::ContexteEnMemoire;
use chrono::Duration;
use serde_json::json;

use core_kernel::Structure;
use domain_action::ActionRepository;
use domain_beneficiaire::{Jeune, JeuneRepository};
use domain_notification::{
    ContenuNotifierBeneficiaires, Job, JobType, PlanificateurRepository, SuiviJob,
    SuiviJobRepository, TypeNotification,
};
use domain_rendez_vous::RendezVousRepository;
use test_utils::{ActionBuilder, ConseillerBuilder, DatesFixtures, JeuneBuilder, RendezVousBuilder};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn configuration() -> ConfigurationJobs {
    ConfigurationJobs {
        pause_entre_notifications: std::time::Duration::ZERO,
        ..Default::default()
    }
}

async fn des_jeunes(memoire: &ContexteEnMemoire, structure: Structure, nombre: usize) -> Vec<Jeune> {
    let mut jeunes = Vec::with_capacity(nombre);
    for _ in 0..nombre {
        let jeune = JeuneBuilder::new().with_structure(structure).build();
        memoire.jeunes.save(&jeune).await.unwrap();
        jeunes.push(jeune);
    }
    jeunes
}

fn un_contenu(batch_size: Option<u64>) -> ContenuNotifierBeneficiaires {
    ContenuNotifierBeneficiaires {
        type_notification: TypeNotification::Outils,
        titre: "Nouvel outil".to_string(),
        description: "Découvrez le simulateur d'aides".to_string(),
        structures: vec![Structure::Milo],
        push: true,
        batch_size,
        minutes_entre_les_batchs: None,
        offset: None,
        nb_beneficiaires_notifies: None,
    }
}

fn un_job_de_diffusion(contenu: &ContenuNotifierBeneficiaires) -> Job {
    Job::new(
        JobType::NotifierBeneficiaires,
        DatesFixtures::maintenant(),
        serde_json::to_value(contenu).unwrap(),
    )
}

// ============================================================================
// NOTIFIER BENEFICIAIRES
// ============================================================================

mod notifier_beneficiaires {
    use super::*;

    #[tokio::test]
    async fn test_premier_batch_planifie_la_suite() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        des_jeunes(&memoire, Structure::Milo, 5).await;
        des_jeunes(&memoire, Structure::PoleEmploi, 2).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        let suivi = handler.handle(&un_job_de_diffusion(&un_contenu(Some(2)))).await;

        assert!(suivi.succes);
        assert_eq!(suivi.nb_erreurs, 0);
        assert_eq!(
            suivi.resultat,
            json!({ "nb_beneficiaires_notifies": 2, "est_la_derniere_execution": false, "total": 5 })
        );
        assert_eq!(memoire.notifications.envoyees().await.len(), 2);

        let jobs = memoire.planificateur.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].date_execution, DatesFixtures::maintenant() + Duration::minutes(5));
        let suite: ContenuNotifierBeneficiaires = jobs[0].contenu().unwrap();
        assert_eq!(suite.offset, Some(2));
        assert_eq!(suite.nb_beneficiaires_notifies, Some(2));
        assert_eq!(suite.batch_size, Some(2));
        assert_eq!(suite.minutes_entre_les_batchs, Some(5));
        assert_eq!(suite.titre, "Nouvel outil");
    }

    #[tokio::test]
    async fn test_dernier_batch() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        des_jeunes(&memoire, Structure::Milo, 5).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);
        let contenu = ContenuNotifierBeneficiaires {
            offset: Some(4),
            nb_beneficiaires_notifies: Some(4),
            ..un_contenu(Some(2))
        };

        let suivi = handler.handle(&un_job_de_diffusion(&contenu)).await;

        assert_eq!(suivi.resultat["nb_beneficiaires_notifies"], 5);
        assert_eq!(suivi.resultat["est_la_derniere_execution"], true);
        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_taille_de_batch_par_defaut() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        des_jeunes(&memoire, Structure::Milo, 10).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        let suivi = handler.handle(&un_job_de_diffusion(&un_contenu(None))).await;

        assert_eq!(suivi.resultat["nb_beneficiaires_notifies"], 2);
        let jobs = memoire.planificateur.jobs().await;
        assert_eq!(jobs.len(), 1);
        let suite: ContenuNotifierBeneficiaires = jobs[0].contenu().unwrap();
        assert_eq!(suite.batch_size, Some(2));
        assert_eq!(suite.offset, Some(2));
    }

    #[tokio::test]
    async fn test_taille_de_batch_conservee_quand_l_audience_grandit() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        des_jeunes(&memoire, Structure::Milo, 10).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        handler.handle(&un_job_de_diffusion(&un_contenu(None))).await;
        let suite = memoire
            .planificateur
            .reserver_jobs_echus(DatesFixtures::maintenant() + Duration::days(1), 10)
            .await
            .unwrap()
            .remove(0);
        des_jeunes(&memoire, Structure::Milo, 20).await;

        let suivi = handler.handle(&suite).await;

        assert_eq!(suivi.resultat["total"], 30);
        assert_eq!(suivi.resultat["nb_beneficiaires_notifies"], 4);
        let prochaine: ContenuNotifierBeneficiaires =
            memoire.planificateur.jobs().await[0].contenu().unwrap();
        assert_eq!(prochaine.batch_size, Some(2));
        assert_eq!(prochaine.offset, Some(4));
    }

    #[tokio::test]
    async fn test_la_suite_attend_les_heures_ouvrees() {
        let vendredi_soir = DatesFixtures::le(2024, 3, 15, 16, 58);
        let memoire = ContexteEnMemoire::new(vendredi_soir);
        des_jeunes(&memoire, Structure::Milo, 3).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        handler.handle(&un_job_de_diffusion(&un_contenu(Some(1)))).await;

        let jobs = memoire.planificateur.jobs().await;
        assert_eq!(jobs[0].date_execution, DatesFixtures::le(2024, 3, 18, 8, 0));
    }

    #[tokio::test]
    async fn test_echecs_d_envoi_comptes() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let jeunes = des_jeunes(&memoire, Structure::Milo, 3).await;
        memoire.notifications.faire_echouer_pour(jeunes[1].id).await;
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        let suivi = handler.handle(&un_job_de_diffusion(&un_contenu(Some(10)))).await;

        assert!(suivi.succes);
        assert_eq!(suivi.nb_erreurs, 1);
        assert_eq!(suivi.resultat["nb_beneficiaires_notifies"], 3);
        assert_eq!(memoire.notifications.envoyees().await.len(), 2);
    }

    #[tokio::test]
    async fn test_preferences_ignorees_pour_une_diffusion() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let jeune = JeuneBuilder::new()
            .with_preferences(domain_beneficiaire::Preferences {
                creation_action_conseiller: false,
                rendez_vous_sessions: false,
                ..Default::default()
            })
            .build();
        memoire.jeunes.save(&jeune).await.unwrap();
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);

        handler.handle(&un_job_de_diffusion(&un_contenu(Some(10)))).await;

        let envoyees = memoire.notifications.envoyees().await;
        assert_eq!(envoyees.len(), 1);
        assert_eq!(envoyees[0].message.type_notification, TypeNotification::Outils);
        assert!(envoyees[0].message.id_objet.is_none());
    }

    #[tokio::test]
    async fn test_contenu_invalide() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = NotifierBeneficiairesJobHandler::new(&memoire.contexte(), std::time::Duration::ZERO);
        let job = Job::new(JobType::NotifierBeneficiaires, DatesFixtures::maintenant(), json!({ "titre": 3 }));

        let suivi = handler.handle(&job).await;

        assert!(!suivi.succes);
        assert!(suivi.resultat["erreur"].is_string());
    }
}

// ============================================================================
// REMINDERS
// ============================================================================

mod rappels {
    use super::*;

    #[tokio::test]
    async fn test_rappel_rendez_vous_la_veille() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let conseiller = ConseillerBuilder::new().build();
        let jeunes = [
            JeuneBuilder::new().with_conseiller(&conseiller).build(),
            JeuneBuilder::new().with_conseiller(&conseiller).sans_token().build(),
        ];
        let rdv = RendezVousBuilder::new(&conseiller)
            .with_date(DatesFixtures::dans_jours(1))
            .with_jeunes(&jeunes)
            .build();
        memoire.rendez_vous.save(&rdv).await.unwrap();
        let handler = NotifierRappelRendezVousJobHandler::new(&memoire.contexte());
        let job = Job::new(
            JobType::NotifierRappelRendezVous,
            DatesFixtures::maintenant(),
            json!({ "idRendezVous": rdv.id.as_uuid() }),
        );

        let suivi = handler.handle(&job).await;

        assert!(suivi.succes);
        assert_eq!(suivi.resultat["nb_notifications_envoyees"], 1);
        let envoyees = memoire.notifications.envoyees().await;
        assert_eq!(envoyees[0].message.type_notification, TypeNotification::RappelRendezVous);
        assert_eq!(envoyees[0].message.description, "Vous avez un rendez-vous demain");
    }

    #[tokio::test]
    async fn test_rappel_rendez_vous_supprime() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = NotifierRappelRendezVousJobHandler::new(&memoire.contexte());
        let job = Job::new(
            JobType::NotifierRappelRendezVous,
            DatesFixtures::maintenant(),
            json!({ "idRendezVous": uuid::Uuid::new_v4() }),
        );

        let suivi = handler.handle(&job).await;

        assert!(!suivi.succes);
        assert_eq!(suivi.nb_erreurs, 1);
    }

    #[tokio::test]
    async fn test_rappel_action_a_trois_jours() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let jeune = JeuneBuilder::new().build();
        memoire.jeunes.save(&jeune).await.unwrap();
        let action = ActionBuilder::new(jeune.id)
            .with_date_echeance(DatesFixtures::dans_jours(3))
            .build();
        memoire.actions.save(&action).await.unwrap();
        let handler = NotifierRappelActionJobHandler::new(&memoire.contexte());
        let job = Job::new(
            JobType::NotifierRappelAction,
            DatesFixtures::maintenant(),
            json!({ "idAction": action.id.as_uuid() }),
        );

        let suivi = handler.handle(&job).await;

        assert!(suivi.succes);
        assert_eq!(suivi.resultat["notification_envoyee"], true);
        assert_eq!(memoire.notifications.envoyees().await.len(), 1);
    }

    #[tokio::test]
    async fn test_rappel_action_devenu_sans_objet() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let jeune = JeuneBuilder::new().build();
        memoire.jeunes.save(&jeune).await.unwrap();
        let action = ActionBuilder::new(jeune.id)
            .with_date_echeance(DatesFixtures::dans_jours(8))
            .build();
        memoire.actions.save(&action).await.unwrap();
        let handler = NotifierRappelActionJobHandler::new(&memoire.contexte());
        let job = Job::new(
            JobType::NotifierRappelAction,
            DatesFixtures::maintenant(),
            json!({ "idAction": action.id.as_uuid() }),
        );

        let suivi = handler.handle(&job).await;

        assert!(suivi.succes);
        assert_eq!(suivi.resultat["notification_envoyee"], false);
        assert!(suivi.resultat["raison"].is_string());
        assert!(memoire.notifications.envoyees().await.is_empty());
    }

    #[tokio::test]
    async fn test_rappel_action_supprimee() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let handler = NotifierRappelActionJobHandler::new(&memoire.contexte());
        let job = Job::new(
            JobType::NotifierRappelAction,
            DatesFixtures::maintenant(),
            json!({ "idAction": uuid::Uuid::new_v4() }),
        );

        let suivi = handler.handle(&job).await;

        assert!(!suivi.succes);
    }
}

// ============================================================================
// CLEANUP AND DISPATCH
// ============================================================================

mod nettoyage_et_dispatch {
    use super::*;

    #[tokio::test]
    async fn test_nettoyage_des_vieux_suivis() {
        let now = DatesFixtures::maintenant();
        let memoire = ContexteEnMemoire::new(now);
        for jours in [40, 31, 2] {
            let debut = now - Duration::days(jours);
            let suivi = SuiviJob::new(JobType::NotifierRappelAction, debut, debut, true, json!({}), 0);
            memoire.suivi_jobs.save(&suivi).await.unwrap();
        }
        let handler = NettoyerLesSuivisDeJobHandler::new(&memoire.contexte(), 30);

        let suivi = handler
            .handle(&Job::new(JobType::NettoyerLesSuivisDeJob, now, json!({})))
            .await;

        assert!(suivi.succes);
        assert_eq!(suivi.resultat["nb_suivis_supprimes"], 2);
        assert_eq!(memoire.suivi_jobs.suivis().await.len(), 1);

        let prochain = memoire.planificateur.get(ID_JOB_NETTOYAGE).await.unwrap();
        assert_eq!(prochain.date_execution, DatesFixtures::le(2024, 3, 13, 4, 0));
    }

    #[tokio::test]
    async fn test_un_seul_nettoyage_planifie() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let ctx = memoire.contexte();
        let planificateur = ctx.planificateur_service();

        planifier_prochain_nettoyage(&planificateur, DatesFixtures::maintenant()).await.unwrap();
        planifier_prochain_nettoyage(&planificateur, DatesFixtures::maintenant()).await.unwrap();

        assert_eq!(memoire.planificateur.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_executer_les_jobs_echus() {
        let now = DatesFixtures::maintenant();
        let memoire = ContexteEnMemoire::new(now);
        des_jeunes(&memoire, Structure::Milo, 1).await;
        let ctx = memoire.contexte();
        let diffusion = un_job_de_diffusion(&un_contenu(Some(10)));
        let futur = Job::new(JobType::NettoyerLesSuivisDeJob, now + Duration::hours(1), json!({}));
        memoire.planificateur.ajouter(&diffusion).await.unwrap();
        memoire.planificateur.ajouter(&futur).await.unwrap();
        let dispatcher = JobDispatcher::new(&ctx, &configuration());

        let suivis = dispatcher.executer_jobs_echus(10).await.unwrap();

        assert_eq!(suivis.len(), 1);
        assert_eq!(suivis[0].job_type, JobType::NotifierBeneficiaires);
        assert_eq!(memoire.suivi_jobs.suivis().await.len(), 1);
        assert!(memoire.planificateur.get(&diffusion.id).await.is_none());
        assert!(memoire.planificateur.get(&futur.id).await.is_some());
    }

    #[tokio::test]
    async fn test_limite_de_jobs_par_passage() {
        let now = DatesFixtures::maintenant();
        let memoire = ContexteEnMemoire::new(now);
        for minutes in 1..=3 {
            let job = Job::new(JobType::NettoyerLesSuivisDeJob, now - Duration::minutes(minutes), json!({}));
            memoire.planificateur.ajouter(&job).await.unwrap();
        }
        let dispatcher = JobDispatcher::new(&memoire.contexte(), &configuration());

        let suivis = dispatcher.executer_jobs_echus(2).await.unwrap();

        assert_eq!(suivis.len(), 2);
        // two executed, one left, plus the re-planned daily cleanup
        assert_eq!(memoire.planificateur.jobs().await.len(), 2);
    }

    #[tokio::test]
    async fn test_type_sans_handler() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let dispatcher = JobDispatcher::vide(&memoire.contexte());
        let job = Job::new(JobType::NotifierRappelAction, DatesFixtures::maintenant(), json!({}));

        let suivi = dispatcher.executer(&job).await;

        assert!(!suivi.succes);
        assert_eq!(
            suivi.resultat["erreur"],
            "Aucun handler pour le job de type NOTIFIER_RAPPEL_ACTION"
        );
    }
}
