//! Broadcast lists curated by a conseiller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ConseillerId, JeuneId, ListeDeDiffusionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaireDeLaListe {
    pub id: JeuneId,
    pub date_ajout: DateTime<Utc>,
    /// False once the jeune has been transferred away from the list owner
    pub est_dans_le_portefeuille: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeDeDiffusion {
    pub id: ListeDeDiffusionId,
    pub titre: String,
    pub id_conseiller: ConseillerId,
    pub date_de_creation: DateTime<Utc>,
    pub beneficiaires: Vec<BeneficiaireDeLaListe>,
}

fn sans_doublons(ids: &[JeuneId]) -> Vec<JeuneId> {
    let mut uniques: Vec<JeuneId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !uniques.contains(id) {
            uniques.push(*id);
        }
    }
    uniques
}

impl ListeDeDiffusion {
    pub fn creer(
        id: ListeDeDiffusionId,
        id_conseiller: ConseillerId,
        titre: impl Into<String>,
        ids_beneficiaires: &[JeuneId],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            titre: titre.into(),
            id_conseiller,
            date_de_creation: now,
            beneficiaires: sans_doublons(ids_beneficiaires)
                .into_iter()
                .map(|id| BeneficiaireDeLaListe {
                    id,
                    date_ajout: now,
                    est_dans_le_portefeuille: true,
                })
                .collect(),
        }
    }

    /// Replaces the title and the membership; beneficiaires already in the
    /// list keep their original `date_ajout`.
    pub fn mettre_a_jour(
        &mut self,
        titre: impl Into<String>,
        ids_beneficiaires: &[JeuneId],
        now: DateTime<Utc>,
    ) {
        self.titre = titre.into();
        self.beneficiaires = sans_doublons(ids_beneficiaires)
            .into_iter()
            .map(|id| {
                self.beneficiaires
                    .iter()
                    .find(|existant| existant.id == id)
                    .cloned()
                    .unwrap_or(BeneficiaireDeLaListe {
                        id,
                        date_ajout: now,
                        est_dans_le_portefeuille: true,
                    })
            })
            .collect();
    }

    pub fn appartient_a(&self, id_conseiller: ConseillerId) -> bool {
        self.id_conseiller == id_conseiller
    }

    pub fn ids_beneficiaires(&self) -> Vec<JeuneId> {
        self.beneficiaires.iter().map(|b| b.id).collect()
    }
}
