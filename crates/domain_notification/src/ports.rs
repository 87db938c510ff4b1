//! Notification Domain Ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, JeuneId, PortError};

use crate::evenement::Evenement;
use crate::messages::NotificationMessage;
use crate::planificateur::Job;
use crate::suivi_job::SuiviJob;

/// One notification addressed to one jeune
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id_jeune: JeuneId,
    pub message: NotificationMessage,
    /// Delivered as a push, or only kept in the in-app history
    pub push: bool,
    pub date: DateTime<Utc>,
}

/// Delivery channel towards the mobile application
#[async_trait]
pub trait NotificationPort: DomainPort {
    async fn envoyer(&self, notification: &Notification) -> Result<(), PortError>;
}

#[async_trait]
pub trait PlanificateurRepository: DomainPort {
    /// Inserts the job, replacing any job with the same id
    async fn ajouter(&self, job: &Job) -> Result<(), PortError>;

    /// Deletes every job whose id contains `fragment`; returns the count
    async fn supprimer_contenant(&self, fragment: &str) -> Result<u64, PortError>;

    /// Removes and returns at most `limite` jobs due at `now`, oldest first
    ///
    /// Jobs locked by a concurrent worker are skipped, so each job is handed
    /// out once.
    async fn reserver_jobs_echus(
        &self,
        now: DateTime<Utc>,
        limite: u64,
    ) -> Result<Vec<Job>, PortError>;
}

#[async_trait]
pub trait SuiviJobRepository: DomainPort {
    async fn save(&self, suivi: &SuiviJob) -> Result<(), PortError>;

    /// Deletes records executed before `date`; returns the count
    async fn supprimer_anterieurs_a(&self, date: DateTime<Utc>) -> Result<u64, PortError>;
}

#[async_trait]
pub trait EvenementRepository: DomainPort {
    async fn save(&self, evenement: &Evenement) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Records sent notifications; sends to `en_echec` jeunes fail
    #[derive(Debug, Default, Clone)]
    pub struct MockNotificationPort {
        envoyees: Arc<RwLock<Vec<Notification>>>,
        en_echec: Arc<RwLock<HashSet<JeuneId>>>,
    }

    impl MockNotificationPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn faire_echouer_pour(&self, id_jeune: JeuneId) {
            self.en_echec.write().await.insert(id_jeune);
        }

        pub async fn envoyees(&self) -> Vec<Notification> {
            self.envoyees.read().await.clone()
        }
    }

    impl DomainPort for MockNotificationPort {}

    #[async_trait]
    impl NotificationPort for MockNotificationPort {
        async fn envoyer(&self, notification: &Notification) -> Result<(), PortError> {
            if self.en_echec.read().await.contains(&notification.id_jeune) {
                return Err(PortError::connection("Envoi impossible"));
            }
            self.envoyees.write().await.push(notification.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockPlanificateurRepository {
        jobs: Arc<RwLock<HashMap<String, Job>>>,
    }

    impl MockPlanificateurRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Jobs ordered by execution date
        pub async fn jobs(&self) -> Vec<Job> {
            let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
            jobs.sort_by(|a, b| a.date_execution.cmp(&b.date_execution));
            jobs
        }

        pub async fn get(&self, id: &str) -> Option<Job> {
            self.jobs.read().await.get(id).cloned()
        }
    }

    impl DomainPort for MockPlanificateurRepository {}

    #[async_trait]
    impl PlanificateurRepository for MockPlanificateurRepository {
        async fn ajouter(&self, job: &Job) -> Result<(), PortError> {
            self.jobs.write().await.insert(job.id.clone(), job.clone());
            Ok(())
        }

        async fn supprimer_contenant(&self, fragment: &str) -> Result<u64, PortError> {
            let mut jobs = self.jobs.write().await;
            let avant = jobs.len();
            jobs.retain(|id, _| !id.contains(fragment));
            Ok((avant - jobs.len()) as u64)
        }

        async fn reserver_jobs_echus(
            &self,
            now: DateTime<Utc>,
            limite: u64,
        ) -> Result<Vec<Job>, PortError> {
            let mut jobs = self.jobs.write().await;
            let mut echus: Vec<Job> = jobs
                .values()
                .filter(|job| job.date_execution <= now)
                .cloned()
                .collect();
            echus.sort_by(|a, b| a.date_execution.cmp(&b.date_execution));
            echus.truncate(limite as usize);
            for job in &echus {
                jobs.remove(&job.id);
            }
            Ok(echus)
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct MockSuiviJobRepository {
        suivis: Arc<RwLock<Vec<SuiviJob>>>,
    }

    impl MockSuiviJobRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_suivis(suivis: Vec<SuiviJob>) -> Self {
            let repo = Self::new();
            repo.suivis.write().await.extend(suivis);
            repo
        }

        pub async fn suivis(&self) -> Vec<SuiviJob> {
            self.suivis.read().await.clone()
        }
    }

    impl DomainPort for MockSuiviJobRepository {}

    #[async_trait]
    impl SuiviJobRepository for MockSuiviJobRepository {
        async fn save(&self, suivi: &SuiviJob) -> Result<(), PortError> {
            self.suivis.write().await.push(suivi.clone());
            Ok(())
        }

        async fn supprimer_anterieurs_a(&self, date: DateTime<Utc>) -> Result<u64, PortError> {
            let mut suivis = self.suivis.write().await;
            let avant = suivis.len();
            suivis.retain(|s| s.date_execution >= date);
            Ok((avant - suivis.len()) as u64)
        }
    }

    /// Records events; can be switched to fail to exercise best-effort monitoring
    #[derive(Debug, Default, Clone)]
    pub struct MockEvenementRepository {
        evenements: Arc<RwLock<Vec<Evenement>>>,
        en_panne: Arc<RwLock<bool>>,
    }

    impl MockEvenementRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn mettre_en_panne(&self) {
            *self.en_panne.write().await = true;
        }

        pub async fn evenements(&self) -> Vec<Evenement> {
            self.evenements.read().await.clone()
        }
    }

    impl DomainPort for MockEvenementRepository {}

    #[async_trait]
    impl EvenementRepository for MockEvenementRepository {
        async fn save(&self, evenement: &Evenement) -> Result<(), PortError> {
            if *self.en_panne.read().await {
                return Err(PortError::connection("Base indisponible"));
            }
            self.evenements.write().await.push(evenement.clone());
            Ok(())
        }
    }
}
