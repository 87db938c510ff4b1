//! Polling loop running the due jobs
//!
//! Every claimed job runs on its own task. A job is only claimed when a slot
//! of the semaphore is free, so a long broadcast batch never holds back the
//! reminders and nothing waits in memory once removed from the planificateur.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use application::JobDispatcher;
use core_kernel::PortError;

pub struct Worker {
    dispatcher: Arc<JobDispatcher>,
    intervalle: Duration,
    batch: u64,
    max_jobs_simultanes: u32,
    places: Arc<Semaphore>,
}

impl Worker {
    pub fn new(
        dispatcher: JobDispatcher,
        intervalle: Duration,
        batch: u64,
        max_jobs_simultanes: u32,
    ) -> Self {
        let max_jobs_simultanes = max_jobs_simultanes.max(1);
        Self {
            dispatcher: Arc::new(dispatcher),
            intervalle,
            batch: batch.max(1),
            max_jobs_simultanes,
            places: Arc::new(Semaphore::new(max_jobs_simultanes as usize)),
        }
    }

    /// Claims due jobs while slots are free and starts each on its own task
    ///
    /// Returns the number of jobs started.
    pub async fn tick(&self) -> Result<usize, PortError> {
        let mut total = 0;
        loop {
            let limite = (self.places.available_permits() as u64).min(self.batch);
            if limite == 0 {
                return Ok(total);
            }

            let jobs = self.dispatcher.reserver_jobs_echus(limite).await?;
            let nb_jobs = jobs.len();
            for job in jobs {
                let place = match self.places.clone().acquire_owned().await {
                    Ok(place) => place,
                    Err(e) => {
                        warn!(job_id = %job.id, error = %e, "Semaphore fermé, job exécuté sur place");
                        self.dispatcher.executer_et_suivre(&job).await;
                        continue;
                    }
                };
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.executer_et_suivre(&job).await;
                    drop(place);
                });
            }

            total += nb_jobs;
            if (nb_jobs as u64) < limite {
                return Ok(total);
            }
        }
    }

    /// Waits until every started job has finished
    pub async fn attendre_les_jobs_en_cours(&self) {
        if let Err(e) = self.places.acquire_many(self.max_jobs_simultanes).await {
            error!(error = %e, "Attente des jobs en cours impossible");
        }
    }

    /// Polls until `arret` turns true, then lets the running jobs finish
    pub async fn run(self, mut arret: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.intervalle);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            intervalle_ms = self.intervalle.as_millis() as u64,
            batch = self.batch,
            max_jobs_simultanes = self.max_jobs_simultanes,
            "Worker démarré"
        );
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(0) => {}
                        Ok(nb_jobs) => debug!(nb_jobs, "Jobs démarrés"),
                        Err(e) => error!(error = %e, "Echec de la récupération des jobs"),
                    }
                }
                changement = arret.changed() => {
                    if changement.is_err() || *arret.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Attente des jobs en cours");
        self.attendre_les_jobs_en_cours().await;
        info!("Worker arrêté");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use application::jobs::JobHandler;
    use application::testing::ContexteEnMemoire;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use domain_notification::{Job, JobType, PlanificateurRepository, SuiviJob};
    use serde_json::json;
    use test_utils::DatesFixtures;
    use tokio::sync::Notify;

    async fn planifier(ctx: &ContexteEnMemoire, job_type: JobType, nb: i64) {
        for i in 0..nb {
            let job = Job::new(
                job_type,
                DatesFixtures::maintenant() - ChronoDuration::minutes(i + 1),
                json!({}),
            );
            ctx.planificateur.ajouter(&job).await.unwrap();
        }
    }

    /// Diffusion that only ends once released
    struct DiffusionBloquee {
        liberation: Arc<Notify>,
    }

    #[async_trait]
    impl JobHandler for DiffusionBloquee {
        fn job_type(&self) -> JobType {
            JobType::NotifierBeneficiaires
        }

        async fn handle(&self, _job: &Job) -> SuiviJob {
            self.liberation.notified().await;
            let now = DatesFixtures::maintenant();
            SuiviJob::new(self.job_type(), now, now, true, json!({}), 0)
        }
    }

    #[tokio::test]
    async fn test_tick_vide_la_file_par_batchs() {
        let ctx = ContexteEnMemoire::new(DatesFixtures::maintenant());
        planifier(&ctx, JobType::NettoyerLesSuivisDeJob, 5).await;
        let worker = Worker::new(JobDispatcher::vide(&ctx.contexte()), Duration::from_secs(1), 2, 8);

        let nb_jobs = worker.tick().await.unwrap();
        worker.attendre_les_jobs_en_cours().await;

        assert_eq!(nb_jobs, 5);
        assert!(ctx.planificateur.jobs().await.is_empty());
        assert_eq!(ctx.suivi_jobs.suivis().await.len(), 5);
    }

    #[tokio::test]
    async fn test_une_diffusion_longue_ne_bloque_pas_les_rappels() {
        let ctx = ContexteEnMemoire::new(DatesFixtures::maintenant());
        planifier(&ctx, JobType::NotifierBeneficiaires, 1).await;
        let liberation = Arc::new(Notify::new());
        let dispatcher = JobDispatcher::vide(&ctx.contexte()).avec_handler(DiffusionBloquee {
            liberation: liberation.clone(),
        });
        let worker = Worker::new(dispatcher, Duration::from_secs(1), 20, 2);

        assert_eq!(worker.tick().await.unwrap(), 1);
        planifier(&ctx, JobType::NotifierRappelAction, 3).await;
        assert_eq!(worker.tick().await.unwrap(), 1);

        tokio::time::timeout(Duration::from_secs(5), async {
            while ctx.suivi_jobs.suivis().await.is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        let suivis = ctx.suivi_jobs.suivis().await;
        assert_eq!(suivis[0].job_type, JobType::NotifierRappelAction);
        // one slot held by the diffusion, the other reminders stay planned
        assert_eq!(ctx.planificateur.jobs().await.len(), 2);

        liberation.notify_one();
        worker.attendre_les_jobs_en_cours().await;
        assert_eq!(ctx.suivi_jobs.suivis().await.len(), 2);
    }

    #[tokio::test]
    async fn test_arret() {
        let ctx = ContexteEnMemoire::new(DatesFixtures::maintenant());
        let worker = Worker::new(JobDispatcher::vide(&ctx.contexte()), Duration::from_millis(10), 20, 4);
        let (envoi, reception) = watch::channel(false);

        let tache = tokio::spawn(worker.run(reception));
        envoi.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), tache)
            .await
            .unwrap()
            .unwrap();
    }
}
