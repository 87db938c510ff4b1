//! Tests for notification messages, job payloads and engagement events

use chrono::{Duration, NaiveDate};
use serde_json::json;
use uuid::Uuid;

use core_kernel::temporal::a_l_heure;
use core_kernel::{Structure, TypeUtilisateur, Utilisateur};
use domain_notification::{
    CodeEvenement, ContenuNotifierBeneficiaires, Evenement, Job, JobType, NotificationMessage,
    TypeNotification, MINUTES_ENTRE_LES_BATCHS_PAR_DEFAUT,
};

fn le(jour: u32, heure: u32) -> chrono::DateTime<chrono::Utc> {
    a_l_heure(NaiveDate::from_ymd_opt(2024, 3, jour).unwrap(), heure, 0)
}

mod messages {
    use super::*;

    #[test]
    fn test_codes_des_types_de_notification() {
        assert_eq!(
            serde_json::to_value(TypeNotification::NouveauRendezVous).unwrap(),
            json!("NEW_RENDEZVOUS")
        );
        assert_eq!(
            serde_json::to_value(TypeNotification::RappelRendezVous).unwrap(),
            json!("RAPPEL_RENDEZVOUS")
        );
        for type_notification in TypeNotification::ALL {
            let parse: TypeNotification = type_notification.as_str().parse().unwrap();
            assert_eq!(parse, type_notification);
        }
        assert!("INCONNU".parse::<TypeNotification>().is_err());
    }

    #[test]
    fn test_suppression_mentionne_la_date_locale() {
        // 23:30 UTC on the 11th is already the 12th in Paris
        let date = le(12, 0) + Duration::minutes(30);

        let message = NotificationMessage::rendez_vous_supprime(date);

        assert_eq!(message.description, "Votre rendez-vous du 12/03 est supprimé");
        assert!(message.id_objet.is_none());
    }

    #[test]
    fn test_rappel_rendez_vous_selon_l_ecart() {
        let now = le(12, 10);
        let id = Uuid::new_v4();

        let veille = NotificationMessage::rappel_rendez_vous(id, le(13, 9), now).unwrap();
        let semaine = NotificationMessage::rappel_rendez_vous(id, le(19, 9), now).unwrap();

        assert_eq!(veille.description, "Vous avez un rendez-vous demain");
        assert_eq!(semaine.description, "Vous avez un rendez-vous dans une semaine");
        assert_eq!(veille.id_objet, Some(id.to_string()));
        assert!(NotificationMessage::rappel_rendez_vous(id, le(15, 9), now).is_none());
        assert!(NotificationMessage::rappel_rendez_vous(id, le(11, 9), now).is_none());
    }

    #[test]
    fn test_message_personnalise_sans_objet() {
        let message = NotificationMessage::personnalise(TypeNotification::Outils, "Titre", "Corps");
        assert_eq!(message.titre, "Titre");
        assert!(message.id_objet.is_none());
    }
}

mod jobs {
    use super::*;

    #[test]
    fn test_contenu_de_diffusion_en_camel_case() {
        let contenu: ContenuNotifierBeneficiaires = serde_json::from_value(json!({
            "typeNotification": "OUTILS",
            "titre": "Nouvel outil",
            "description": "Un simulateur",
            "structures": ["MILO"],
            "push": true,
            "batchSize": 100
        }))
        .unwrap();

        assert_eq!(contenu.batch_size, Some(100));
        assert_eq!(contenu.offset, None);
        assert_eq!(contenu.minutes_entre_les_batchs(), MINUTES_ENTRE_LES_BATCHS_PAR_DEFAUT);

        let json = serde_json::to_value(&contenu).unwrap();
        assert!(json.get("offset").is_none());
        assert_eq!(json["typeNotification"], "OUTILS");
    }

    #[test]
    fn test_contenu_invalide() {
        let job = Job::new(JobType::NotifierBeneficiaires, le(12, 10), json!({ "push": "oui" }));
        assert!(job.contenu::<ContenuNotifierBeneficiaires>().is_err());
    }

    #[test]
    fn test_type_de_job_textuel() {
        for job_type in JobType::ALL {
            assert_eq!(job_type.as_str().parse::<JobType>().unwrap(), job_type);
        }
        assert!("NOTIFIER_PERSONNE".parse::<JobType>().is_err());
    }
}

#[test]
fn test_evenement_porte_l_emetteur() {
    let utilisateur = Utilisateur {
        id: Uuid::new_v4(),
        prenom: "Nils".to_string(),
        nom: "Tavernier".to_string(),
        email: None,
        type_utilisateur: TypeUtilisateur::Conseiller,
        structure: Structure::Milo,
        roles: vec![],
    };

    let evenement = Evenement::creer(CodeEvenement::ActionCreee, &utilisateur, le(12, 10));

    assert_eq!(evenement.emetteur.id, utilisateur.id);
    assert_eq!(evenement.code.as_str(), "ACTION_CREEE");
}
