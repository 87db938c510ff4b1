//! Monitoring record of one job execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::SuiviJobId;

use crate::planificateur::JobType;

/// Age after which execution records are purged
pub const RETENTION_SUIVI_JOBS_JOURS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiviJob {
    pub id: SuiviJobId,
    pub job_type: JobType,
    pub date_execution: DateTime<Utc>,
    pub succes: bool,
    pub resultat: Value,
    pub nb_erreurs: u64,
    pub temps_execution_ms: u64,
}

impl SuiviJob {
    pub fn new(
        job_type: JobType,
        debut: DateTime<Utc>,
        fin: DateTime<Utc>,
        succes: bool,
        resultat: Value,
        nb_erreurs: u64,
    ) -> Self {
        Self {
            id: SuiviJobId::new_v7(),
            job_type,
            date_execution: debut,
            succes,
            resultat,
            nb_erreurs,
            temps_execution_ms: (fin - debut).num_milliseconds().max(0) as u64,
        }
    }

    /// Failed execution with the error message as result
    pub fn echec(
        job_type: JobType,
        debut: DateTime<Utc>,
        fin: DateTime<Utc>,
        erreur: impl ToString,
    ) -> Self {
        Self::new(
            job_type,
            debut,
            fin,
            false,
            serde_json::json!({ "erreur": erreur.to_string() }),
            1,
        )
    }
}
