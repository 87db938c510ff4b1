//! Job DTOs

use serde::{Deserialize, Serialize};

use application::commands::CreerJobNotifierBeneficiairesCommand;
use core_kernel::Structure;
use domain_notification::TypeNotification;

/// Broadcast request sent by the support team
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifierBeneficiairesRequest {
    #[serde(rename = "type")]
    pub type_notification: TypeNotification,
    pub titre: String,
    pub description: String,
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub push: bool,
    pub batch_size: Option<u64>,
    pub minutes_entre_les_batchs: Option<i64>,
}

impl From<NotifierBeneficiairesRequest> for CreerJobNotifierBeneficiairesCommand {
    fn from(request: NotifierBeneficiairesRequest) -> Self {
        Self {
            type_notification: request.type_notification,
            titre: request.titre,
            description: request.description,
            structures: request.structures,
            push: request.push,
            batch_size: request.batch_size,
            minutes_entre_les_batchs: request.minutes_entre_les_batchs,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPlanifieResponse {
    pub id_job: String,
}
