//! HTTP Surface Tests
//!
//! Health probes and the support trigger of broadcasts, served against the
//! in-memory context.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use application::testing::ContexteEnMemoire;
use core_kernel::{ConseillerId, HealthCheckResult, HealthCheckable, Structure, Utilisateur};
use domain_notification::{CodeEvenement, ContenuNotifierBeneficiaires, JobType, TypeNotification};
use interface_worker::auth::create_token;
use interface_worker::config::WorkerConfig;
use interface_worker::dto::jobs::JobPlanifieResponse;
use interface_worker::{create_router, AppState};
use test_utils::{DatesFixtures, UtilisateurFixtures};

const SECRET: &str = "secret-de-test";

struct SondeFixe(bool);

#[async_trait]
impl HealthCheckable for SondeFixe {
    async fn health_check(&self) -> HealthCheckResult {
        if self.0 {
            HealthCheckResult::healthy("sonde-fixe", 1)
        } else {
            HealthCheckResult::unhealthy("sonde-fixe", "connexion refusée")
        }
    }
}

fn serveur(memoire: &ContexteEnMemoire, base_disponible: bool) -> TestServer {
    let config = WorkerConfig {
        jwt_secret: SECRET.to_string(),
        ..WorkerConfig::default()
    };
    let sondes: Vec<Arc<dyn HealthCheckable>> = vec![Arc::new(SondeFixe(base_disponible))];
    let app = create_router(AppState::new(memoire.contexte(), config, sondes));
    TestServer::new(app).unwrap()
}

fn bearer(utilisateur: &Utilisateur) -> HeaderValue {
    let token = create_token(utilisateur, SECRET, 300).unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn une_diffusion() -> Value {
    json!({
        "type": "OUTILS",
        "titre": "Nouvel outil",
        "description": "Découvrez le simulateur d'aides",
        "structures": ["MILO", "POLE_EMPLOI"],
        "push": true,
        "batchSize": 500
    })
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_vivacite() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, false).get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_base_disponible() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, true).get("/health/ready").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["adapters"][0]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_base_indisponible() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, false).get("/health/ready").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["adapters"][0]["message"], "connexion refusée");
    }

    #[tokio::test]
    async fn test_identifiant_de_requete_propage() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, true).get("/health").await;

        assert!(response.headers().get("x-request-id").is_some());
    }
}

mod notifier_beneficiaires_tests {
    use super::*;

    const ROUTE: &str = "/api/v1/jobs/notifier-beneficiaires";

    #[tokio::test]
    async fn test_sans_jeton() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, true).post(ROUTE).json(&une_diffusion()).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["code"], "NON_AUTHENTIFIE");
        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_jeton_signe_avec_un_autre_secret() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let token = create_token(&UtilisateurFixtures::support(), "autre-secret", 300).unwrap();

        let response = serveur(&memoire, true)
            .post(ROUTE)
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .json(&une_diffusion())
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reserve_au_support() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let conseiller = UtilisateurFixtures::conseiller(ConseillerId::new());

        let response = serveur(&memoire, true)
            .post(ROUTE)
            .add_header(AUTHORIZATION, bearer(&conseiller))
            .json(&une_diffusion())
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["code"], "DROITS_INSUFFISANTS");
        assert!(memoire.planificateur.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_planifie_le_job() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, true)
            .post(ROUTE)
            .add_header(AUTHORIZATION, bearer(&UtilisateurFixtures::support()))
            .json(&une_diffusion())
            .await;

        response.assert_status(StatusCode::ACCEPTED);
        let id_job = response.json::<JobPlanifieResponse>().id_job;

        let job = memoire.planificateur.get(&id_job).await.unwrap();
        assert_eq!(job.job_type, JobType::NotifierBeneficiaires);
        assert_eq!(job.date_execution, DatesFixtures::maintenant());

        let contenu: ContenuNotifierBeneficiaires = job.contenu().unwrap();
        assert_eq!(contenu.type_notification, TypeNotification::Outils);
        assert_eq!(contenu.structures, vec![Structure::Milo, Structure::PoleEmploi]);
        assert_eq!(contenu.batch_size, Some(500));
        assert_eq!(contenu.offset, None);

        let evenements = memoire.evenements.evenements().await;
        assert_eq!(evenements.len(), 1);
        assert_eq!(evenements[0].code, CodeEvenement::NotificationBeneficiairesPlanifiee);
    }

    #[tokio::test]
    async fn test_titre_obligatoire() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let mut diffusion = une_diffusion();
        diffusion["titre"] = json!("");

        let response = serveur(&memoire, true)
            .post(ROUTE)
            .add_header(AUTHORIZATION, bearer(&UtilisateurFixtures::support()))
            .json(&diffusion)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "MAUVAISE_COMMANDE");
        assert!(body["message"].as_str().unwrap().contains("le titre est obligatoire"));
    }

    #[tokio::test]
    async fn test_corps_illisible() {
        let memoire = ContexteEnMemoire::new(DatesFixtures::maintenant());

        let response = serveur(&memoire, true)
            .post(ROUTE)
            .add_header(AUTHORIZATION, bearer(&UtilisateurFixtures::support()))
            .json(&json!({ "type": "INCONNU", "titre": "Titre" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "MAUVAISE_COMMANDE");
        assert!(memoire.planificateur.jobs().await.is_empty());
    }
}
