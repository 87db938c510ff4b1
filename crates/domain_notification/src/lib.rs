//! Notification Domain
//!
//! - Push messages sent to jeunes and the rules deciding when they apply
//! - The persistent planificateur holding reminder and broadcast jobs
//! - Job execution records (suivi de job)
//! - Engagement events recorded after each command

pub mod evenement;
pub mod messages;
pub mod planificateur;
pub mod ports;
pub mod service;
pub mod suivi_job;

pub use evenement::{CodeEvenement, Emetteur, Evenement};
pub use messages::{NotificationMessage, TypeNotification};
pub use planificateur::{
    id_job_rappel_action, id_job_rappel_rendez_vous, ContenuNotifierBeneficiaires, Job, JobType,
    PlanificateurService, MINUTES_ENTRE_LES_BATCHS_PAR_DEFAUT,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{
    MockEvenementRepository, MockNotificationPort, MockPlanificateurRepository,
    MockSuiviJobRepository,
};
pub use ports::{
    EvenementRepository, Notification, NotificationPort, PlanificateurRepository,
    SuiviJobRepository,
};
pub use service::{Destinataire, NotificationService, PreferenceRequise};
pub use suivi_job::{SuiviJob, RETENTION_SUIVI_JOBS_JOURS};
