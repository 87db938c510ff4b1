//! Handler contract shared by every command and query
//!
//! `execute` runs `authorize`, then `handle`, then `monitor` on success.
//! Monitoring is best effort: its failure is logged and never turns a
//! successful command into an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, info_span, warn, Instrument};
use validator::{Validate, ValidationErrors};

use core_kernel::{DomainError, DomainResult, Utilisateur};
use domain_notification::{CodeEvenement, Evenement, EvenementRepository};

#[async_trait]
pub trait CommandHandler: Send + Sync {
    type Command: fmt::Debug + Send + Sync;
    type Output: Send;

    /// Name used in traces
    const NOM: &'static str;

    async fn authorize(&self, command: &Self::Command, utilisateur: &Utilisateur) -> DomainResult<()>;

    async fn handle(&self, command: &Self::Command) -> DomainResult<Self::Output>;

    async fn monitor(&self, _utilisateur: &Utilisateur, _command: &Self::Command) -> DomainResult<()> {
        Ok(())
    }

    async fn execute(
        &self,
        command: Self::Command,
        utilisateur: &Utilisateur,
    ) -> DomainResult<Self::Output> {
        let span = info_span!("command", handler = Self::NOM, utilisateur = %utilisateur.id);
        async {
            debug!(?command, "Exécution de la commande");
            self.authorize(&command, utilisateur)
                .await
                .inspect_err(|e| warn!(code = e.code(), error = %e, "Commande refusée"))?;

            let output = self
                .handle(&command)
                .await
                .inspect_err(|e| warn!(code = e.code(), error = %e, "Echec de la commande"))?;

            if let Err(e) = self.monitor(utilisateur, &command).await {
                warn!(error = %e, "Echec du monitoring de la commande");
            }
            info!("Commande exécutée");
            Ok(output)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
pub trait QueryHandler: Send + Sync {
    type Query: fmt::Debug + Send + Sync;
    type Output: Send;

    const NOM: &'static str;

    async fn authorize(&self, query: &Self::Query, utilisateur: &Utilisateur) -> DomainResult<()>;

    async fn handle(&self, query: &Self::Query) -> DomainResult<Self::Output>;

    async fn monitor(&self, _utilisateur: &Utilisateur, _query: &Self::Query) -> DomainResult<()> {
        Ok(())
    }

    async fn execute(&self, query: Self::Query, utilisateur: &Utilisateur) -> DomainResult<Self::Output> {
        let span = info_span!("query", handler = Self::NOM, utilisateur = %utilisateur.id);
        async {
            debug!(?query, "Exécution de la requête");
            self.authorize(&query, utilisateur)
                .await
                .inspect_err(|e| warn!(code = e.code(), error = %e, "Requête refusée"))?;

            let output = self
                .handle(&query)
                .await
                .inspect_err(|e| warn!(code = e.code(), error = %e, "Echec de la requête"))?;

            if let Err(e) = self.monitor(utilisateur, &query).await {
                warn!(error = %e, "Echec du monitoring de la requête");
            }
            Ok(output)
        }
        .instrument(span)
        .await
    }
}

/// Records the engagement event of a successful command
pub(crate) async fn enregistrer_evenement(
    evenements: &dyn EvenementRepository,
    code: CodeEvenement,
    utilisateur: &Utilisateur,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    evenements
        .save(&Evenement::creer(code, utilisateur, now))
        .await?;
    Ok(())
}

/// Runs the `validator` rules of a command
pub(crate) fn valider<T: Validate>(command: &T) -> DomainResult<()> {
    command.validate().map_err(message_de_validation)
}

fn message_de_validation(errors: ValidationErrors) -> DomainError {
    let mut champs: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(champ, erreurs)| {
            let message = erreurs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "invalide".to_string());
            format!("{}: {}", champ, message)
        })
        .collect();
    champs.sort();
    DomainError::mauvaise_commande(champs.join(", "))
}
