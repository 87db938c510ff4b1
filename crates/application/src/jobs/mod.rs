//! Job handlers run by the worker
//!
//! Each handler turns one [`Job`] into a [`SuiviJob`]; it never returns an
//! error, failures are recorded in the SuiviJob instead.

use async_trait::async_trait;

use domain_notification::{Job, JobType, SuiviJob};

pub mod dispatcher;
pub mod nettoyer_les_suivis;
pub mod notifier_beneficiaires;
pub mod rappel_action;
pub mod rappel_rendez_vous;

pub use dispatcher::{ConfigurationJobs, JobDispatcher};
pub use nettoyer_les_suivis::{
    planifier_prochain_nettoyage, NettoyerLesSuivisDeJobHandler, ID_JOB_NETTOYAGE,
};
pub use notifier_beneficiaires::{taille_de_batch_par_defaut, NotifierBeneficiairesJobHandler};
pub use rappel_action::NotifierRappelActionJobHandler;
pub use rappel_rendez_vous::NotifierRappelRendezVousJobHandler;

#[async_trait]
pub trait JobHandler: Send + Sync {
    fn job_type(&self) -> JobType;

    async fn handle(&self, job: &Job) -> SuiviJob;
}
