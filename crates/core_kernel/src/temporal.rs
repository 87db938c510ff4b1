//! Time handling in the Europe/Paris timezone
//!
//! Every date is stored in UTC, but calendar rules (start of day, business
//! hours, "in 3 days") are evaluated in the local time of the agencies.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use std::sync::RwLock;

/// Timezone every calendar rule is evaluated in
pub const FUSEAU_HORAIRE: Tz = chrono_tz::Europe::Paris;

/// First hour (inclusive) at which jobs may notify beneficiaries
pub const HEURE_OUVERTURE: u32 = 8;

/// Hour (exclusive) after which notifications are postponed to the next day
pub const HEURE_FERMETURE: u32 = 17;

/// Source of the current instant
///
/// Handlers and jobs take a `Clock` so their date arithmetic is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a settable instant
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    pub fn advance(&self, duration: Duration) {
        if let Ok(mut guard) = self.instant.write() {
            *guard += duration;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Converts a UTC instant to Paris local time
pub fn to_paris(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&FUSEAU_HORAIRE)
}

/// Resolves a Paris wall-clock time to UTC
///
/// Ambiguous times (autumn DST) take the earliest instant; times inside the
/// spring gap are pushed forward by one hour.
pub fn from_paris(local: NaiveDateTime) -> DateTime<Utc> {
    match FUSEAU_HORAIRE.from_local_datetime(&local) {
        LocalResult::Single(date) => date.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let shifted = local + Duration::hours(1);
            match FUSEAU_HORAIRE.from_local_datetime(&shifted).earliest() {
                Some(date) => date.with_timezone(&Utc),
                None => shifted.and_utc(),
            }
        }
    }
}

/// Paris local date of an instant
pub fn jour_local(instant: DateTime<Utc>) -> NaiveDate {
    to_paris(instant).date_naive()
}

/// Instant of `date` at `heure:minute` Paris time
pub fn a_l_heure(date: NaiveDate, heure: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(heure, minute, 0).unwrap_or(NaiveTime::MIN);
    from_paris(date.and_time(time))
}

/// Paris midnight of the day containing `instant`
pub fn debut_de_journee(instant: DateTime<Utc>) -> DateTime<Utc> {
    a_l_heure(jour_local(instant), 0, 0)
}

/// Number of Paris calendar days from `depuis` to `jusqu_a`
pub fn jours_calendaires_entre(depuis: DateTime<Utc>, jusqu_a: DateTime<Utc>) -> i64 {
    (jour_local(jusqu_a) - jour_local(depuis)).num_days()
}

/// Formats an instant as `dd/MM` in Paris time
pub fn format_jour_mois(instant: DateTime<Utc>) -> String {
    to_paris(instant).format("%d/%m").to_string()
}

pub fn est_week_end(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True when `instant` falls on a weekday between 08:00 and 17:00 Paris time
pub fn est_dans_les_heures_ouvrees(instant: DateTime<Utc>) -> bool {
    let local = to_paris(instant);
    !est_week_end(local.date_naive())
        && local.hour() >= HEURE_OUVERTURE
        && local.hour() < HEURE_FERMETURE
}

/// Earliest instant at or after `instant` that lies inside business hours
///
/// - before 08:00 on a weekday: same day at 08:00
/// - at or after 17:00: next day at 08:00
/// - Saturday or Sunday: following Monday at 08:00
pub fn prochaine_fenetre_ouvree(instant: DateTime<Utc>) -> DateTime<Utc> {
    if est_dans_les_heures_ouvrees(instant) {
        return instant;
    }

    let local = to_paris(instant);
    let mut jour = local.date_naive();
    if local.hour() >= HEURE_FERMETURE {
        jour = jour.succ_opt().unwrap_or(jour);
    }
    while est_week_end(jour) {
        jour = jour.succ_opt().unwrap_or(jour);
    }

    a_l_heure(jour, HEURE_OUVERTURE, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        a_l_heure(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min)
    }

    #[test]
    fn test_fenetre_inchangee_pendant_les_heures_ouvrees() {
        // Wednesday
        let instant = paris(2024, 3, 13, 10, 30);
        assert_eq!(prochaine_fenetre_ouvree(instant), instant);
    }

    #[test]
    fn test_fenetre_avant_ouverture() {
        let instant = paris(2024, 3, 13, 6, 0);
        assert_eq!(prochaine_fenetre_ouvree(instant), paris(2024, 3, 13, 8, 0));
    }

    #[test]
    fn test_fenetre_apres_fermeture_vendredi() {
        // Friday 18:00 -> Monday 08:00
        let instant = paris(2024, 3, 15, 18, 0);
        assert_eq!(prochaine_fenetre_ouvree(instant), paris(2024, 3, 18, 8, 0));
    }

    #[test]
    fn test_fenetre_samedi_midi() {
        let instant = paris(2024, 3, 16, 12, 0);
        assert_eq!(prochaine_fenetre_ouvree(instant), paris(2024, 3, 18, 8, 0));
    }

    #[test]
    fn test_debut_de_journee_en_heure_d_ete() {
        // 01:30 Paris on 2 July is still 1 July 23:30 UTC
        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap();
        let debut = debut_de_journee(instant);
        assert_eq!(debut, Utc.with_ymd_and_hms(2024, 7, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_format_jour_mois() {
        let instant = paris(2024, 1, 5, 14, 0);
        assert_eq!(format_jour_mois(instant), "05/01");
    }

    #[test]
    fn test_horloge_fixe_avance() {
        let start = paris(2024, 3, 13, 10, 0);
        let clock = FixedClock::new(start);
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }
}
