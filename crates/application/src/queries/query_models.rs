//! Read models returned by the query handlers
//!
//! Serialized in camelCase, the shape consumed by the mobile and web clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domain_action::{Action, EtatQualification, Qualification, StatutAction, TypeCreateur};
use domain_beneficiaire::{
    BeneficiaireDeLaListe, Jeune, ListeDeDiffusion, Preferences, SourceSuggestion, Suggestion,
    TypeRecherche,
};
use domain_rendez_vous::{ReaffectationAnimationCollective, RendezVous, SourceRendezVous};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateurQueryModel {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub type_createur: TypeCreateur,
    pub prenom: String,
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationQueryModel {
    pub code: String,
    pub libelle: String,
    pub heures: u32,
    pub commentaire: Option<String>,
}

impl From<&Qualification> for QualificationQueryModel {
    fn from(qualification: &Qualification) -> Self {
        Self {
            code: qualification.code.as_str().to_string(),
            libelle: qualification.code.libelle().to_string(),
            heures: qualification.heures,
            commentaire: qualification.commentaire.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQueryModel {
    pub id: Uuid,
    pub contenu: String,
    pub description: String,
    pub statut: StatutAction,
    pub etat: EtatQualification,
    pub date_creation: DateTime<Utc>,
    pub date_derniere_actualisation: DateTime<Utc>,
    pub date_echeance: DateTime<Utc>,
    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin_reelle: Option<DateTime<Utc>>,
    pub createur: CreateurQueryModel,
    pub qualification: Option<QualificationQueryModel>,
}

impl From<&Action> for ActionQueryModel {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id.as_uuid(),
            contenu: action.contenu.clone(),
            description: action.description.clone(),
            statut: action.statut,
            etat: action.etat(),
            date_creation: action.date_creation,
            date_derniere_actualisation: action.date_derniere_actualisation,
            date_echeance: action.date_echeance,
            date_debut: action.date_debut,
            date_fin_reelle: action.date_fin_reelle,
            createur: CreateurQueryModel {
                id: action.createur.id,
                type_createur: action.createur.type_createur,
                prenom: action.createur.prenom.clone(),
                nom: action.createur.nom.clone(),
            },
            qualification: action.qualification.as_ref().map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadonneesActions {
    pub nombre_total: u64,
    pub nombre_filtrees: u64,
    pub nombre_actions_par_page: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsJeuneQueryModel {
    pub actions: Vec<ActionQueryModel>,
    pub metadonnees: MetadonneesActions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRendezVousQueryModel {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonneQueryModel {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendezVousJeuneQueryModel {
    pub id: Uuid,
    pub titre: String,
    pub sous_titre: String,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    pub duree: u32,
    #[serde(rename = "type")]
    pub type_rendez_vous: TypeRendezVousQueryModel,
    pub precision: Option<String>,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: bool,
    pub invitation: bool,
    pub createur: PersonneQueryModel,
    pub jeunes: Vec<PersonneQueryModel>,
    pub est_animation_collective: bool,
    pub date_cloture: Option<DateTime<Utc>>,
    pub source: SourceRendezVous,
}

impl From<&RendezVous> for RendezVousJeuneQueryModel {
    fn from(rendez_vous: &RendezVous) -> Self {
        Self {
            id: rendez_vous.id.as_uuid(),
            titre: rendez_vous.titre.clone(),
            sous_titre: rendez_vous.sous_titre.clone(),
            commentaire: rendez_vous.commentaire.clone(),
            modalite: rendez_vous.modalite.clone(),
            date: rendez_vous.date,
            duree: rendez_vous.duree,
            type_rendez_vous: TypeRendezVousQueryModel {
                code: rendez_vous.type_rendez_vous.as_str().to_string(),
                label: rendez_vous.type_rendez_vous.libelle().to_string(),
            },
            precision: rendez_vous.precision.clone(),
            adresse: rendez_vous.adresse.clone(),
            organisme: rendez_vous.organisme.clone(),
            presence_conseiller: rendez_vous.presence_conseiller,
            invitation: rendez_vous.invitation,
            createur: PersonneQueryModel {
                id: rendez_vous.createur.id.as_uuid(),
                prenom: rendez_vous.createur.prenom.clone(),
                nom: rendez_vous.createur.nom.clone(),
            },
            jeunes: rendez_vous
                .jeunes
                .iter()
                .map(|jeune| PersonneQueryModel {
                    id: jeune.id.as_uuid(),
                    prenom: jeune.prenom.clone(),
                    nom: jeune.nom.clone(),
                })
                .collect(),
            est_animation_collective: rendez_vous.est_animation_collective(),
            date_cloture: rendez_vous.date_cloture,
            source: rendez_vous.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JeuneDuConseillerQueryModel {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub is_activated: bool,
    pub date_creation: DateTime<Utc>,
    pub id_conseiller_initial: Option<Uuid>,
    pub est_en_transfert_temporaire: bool,
}

impl From<&Jeune> for JeuneDuConseillerQueryModel {
    fn from(jeune: &Jeune) -> Self {
        Self {
            id: jeune.id.as_uuid(),
            prenom: jeune.prenom.clone(),
            nom: jeune.nom.clone(),
            email: jeune.email.clone(),
            is_activated: jeune.is_activated,
            date_creation: jeune.date_creation,
            id_conseiller_initial: jeune.id_conseiller_initial.map(|id| id.as_uuid()),
            est_en_transfert_temporaire: jeune.id_conseiller_initial.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConseillerDuJeuneQueryModel {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailJeuneQueryModel {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub structure: String,
    pub is_activated: bool,
    pub date_creation: DateTime<Utc>,
    pub id_partenaire: Option<String>,
    pub conseiller: Option<ConseillerDuJeuneQueryModel>,
    pub id_conseiller_initial: Option<Uuid>,
    pub preferences: Preferences,
    pub date_derniere_actualisation_token: Option<DateTime<Utc>>,
}

impl From<&Jeune> for DetailJeuneQueryModel {
    fn from(jeune: &Jeune) -> Self {
        Self {
            id: jeune.id.as_uuid(),
            prenom: jeune.prenom.clone(),
            nom: jeune.nom.clone(),
            email: jeune.email.clone(),
            structure: jeune.structure.to_string(),
            is_activated: jeune.is_activated,
            date_creation: jeune.date_creation,
            id_partenaire: jeune.id_partenaire.clone(),
            conseiller: jeune.conseiller.as_ref().map(|c| ConseillerDuJeuneQueryModel {
                id: c.id.as_uuid(),
                prenom: c.prenom.clone(),
                nom: c.nom.clone(),
                email: c.email.clone(),
            }),
            id_conseiller_initial: jeune.id_conseiller_initial.map(|id| id.as_uuid()),
            preferences: jeune.preferences,
            date_derniere_actualisation_token: jeune.configuration.date_derniere_actualisation_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaireQueryModel {
    pub id: Uuid,
    pub date_ajout: DateTime<Utc>,
    pub est_dans_le_portefeuille: bool,
}

impl From<&BeneficiaireDeLaListe> for BeneficiaireQueryModel {
    fn from(beneficiaire: &BeneficiaireDeLaListe) -> Self {
        Self {
            id: beneficiaire.id.as_uuid(),
            date_ajout: beneficiaire.date_ajout,
            est_dans_le_portefeuille: beneficiaire.est_dans_le_portefeuille,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeDeDiffusionQueryModel {
    pub id: Uuid,
    pub titre: String,
    pub date_de_creation: DateTime<Utc>,
    pub beneficiaires: Vec<BeneficiaireQueryModel>,
}

impl From<&ListeDeDiffusion> for ListeDeDiffusionQueryModel {
    fn from(liste: &ListeDeDiffusion) -> Self {
        Self {
            id: liste.id.as_uuid(),
            titre: liste.titre.clone(),
            date_de_creation: liste.date_de_creation,
            beneficiaires: liste.beneficiaires.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionQueryModel {
    pub id: Uuid,
    pub titre: String,
    pub metier: Option<String>,
    pub localisation: Option<String>,
    #[serde(rename = "type")]
    pub type_recherche: TypeRecherche,
    pub source: SourceSuggestion,
    pub date_creation: DateTime<Utc>,
    pub date_mise_a_jour: DateTime<Utc>,
}

impl From<&Suggestion> for SuggestionQueryModel {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            id: suggestion.id.as_uuid(),
            titre: suggestion.informations.titre.clone(),
            metier: suggestion.informations.metier.clone(),
            localisation: suggestion.informations.localisation.clone(),
            type_recherche: suggestion.type_recherche,
            source: suggestion.source,
            date_creation: suggestion.date_creation,
            date_mise_a_jour: suggestion.date_mise_a_jour,
        }
    }
}

/// What happened to one animation collective when its conseiller changed agence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoTransfertAnimationCollectiveQueryModel {
    pub id_animation_collective: Uuid,
    pub titre_animation_collective: String,
    pub agence_transferee: bool,
    pub jeunes_desinscrits: Vec<PersonneQueryModel>,
}

impl InfoTransfertAnimationCollectiveQueryModel {
    pub fn new(animation: &RendezVous, reaffectation: ReaffectationAnimationCollective) -> Self {
        Self {
            id_animation_collective: animation.id.as_uuid(),
            titre_animation_collective: animation.titre.clone(),
            agence_transferee: reaffectation.agence_transferee,
            jeunes_desinscrits: reaffectation
                .jeunes_desinscrits
                .into_iter()
                .map(|jeune| PersonneQueryModel {
                    id: jeune.id.as_uuid(),
                    prenom: jeune.prenom,
                    nom: jeune.nom,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangementAgenceQueryModel {
    pub id_ancienne_agence: Uuid,
    pub id_nouvelle_agence: Uuid,
    pub infos_transfert_animations_collectives: Vec<InfoTransfertAnimationCollectiveQueryModel>,
}
