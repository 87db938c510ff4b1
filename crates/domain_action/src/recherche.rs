//! Filtering, sorting and pagination of a jeune's actions
//!
//! The rules live here so the PostgreSQL adapter and the in-memory adapter
//! agree on what a page contains.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::action::{Action, StatutAction};
use crate::qualification::{CodeQualification, EtatQualification};

pub const NOMBRE_ACTIONS_PAR_PAGE: u64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriActions {
    DateCroissante,
    DateDecroissante,
    DateEcheanceCroissante,
    DateEcheanceDecroissante,
    #[default]
    Statut,
}

impl TriActions {
    pub fn comparer(&self, a: &Action, b: &Action) -> Ordering {
        match self {
            TriActions::DateCroissante => a.date_creation.cmp(&b.date_creation),
            TriActions::DateDecroissante => b.date_creation.cmp(&a.date_creation),
            TriActions::DateEcheanceCroissante => a
                .date_echeance
                .cmp(&b.date_echeance)
                .then(a.date_creation.cmp(&b.date_creation)),
            TriActions::DateEcheanceDecroissante => b
                .date_echeance
                .cmp(&a.date_echeance)
                .then(a.date_creation.cmp(&b.date_creation)),
            TriActions::Statut => {
                let terminee = |action: &Action| action.statut == StatutAction::Terminee;
                terminee(a)
                    .cmp(&terminee(b))
                    .then(b.date_derniere_actualisation.cmp(&a.date_derniere_actualisation))
            }
        }
    }
}

/// Filters combined with AND; an empty list does not filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltreActions {
    pub statuts: Vec<StatutAction>,
    pub etats: Vec<EtatQualification>,
    pub codes_categories: Vec<CodeQualification>,
}

impl FiltreActions {
    pub fn accepte(&self, action: &Action) -> bool {
        (self.statuts.is_empty() || self.statuts.contains(&action.statut))
            && (self.etats.is_empty() || self.etats.contains(&action.etat()))
            && (self.codes_categories.is_empty()
                || action
                    .qualification
                    .as_ref()
                    .is_some_and(|q| self.codes_categories.contains(&q.code)))
    }
}

/// Requested page; `None` returns every matching action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u64>,
}

impl Pagination {
    pub fn page(page: u64) -> Self {
        Self { page: Some(page) }
    }

    pub fn limit(&self) -> Option<u64> {
        self.page.map(|_| NOMBRE_ACTIONS_PAR_PAGE)
    }

    pub fn offset(&self) -> u64 {
        match self.page {
            Some(page) if page > 0 => (page - 1).saturating_mul(NOMBRE_ACTIONS_PAR_PAGE),
            _ => 0,
        }
    }

    /// Page 1 (or no page) always exists, even with no action at all
    pub fn existe(&self, nombre_filtrees: u64) -> bool {
        match self.page {
            None | Some(1) => true,
            Some(0) => false,
            Some(page) => page <= nombre_filtrees.div_ceil(NOMBRE_ACTIONS_PAR_PAGE),
        }
    }
}

/// Result of a paginated search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageActions {
    pub actions: Vec<Action>,
    pub nombre_total: u64,
    pub nombre_filtrees: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_existe() {
        assert!(Pagination::default().existe(0));
        assert!(Pagination::page(1).existe(0));
        assert!(Pagination::page(2).existe(11));
        assert!(!Pagination::page(2).existe(10));
        assert!(!Pagination::page(0).existe(100));
    }

    #[test]
    fn test_decalage_et_limite() {
        assert_eq!(Pagination::page(3).offset(), 20);
        assert_eq!(Pagination::page(3).limit(), Some(10));
        assert_eq!(Pagination::default().limit(), None);
    }

    #[test]
    fn test_decalage_sature() {
        assert_eq!(Pagination::page(u64::MAX).offset(), u64::MAX);
        assert!(!Pagination::page(u64::MAX).existe(30));
    }
}
