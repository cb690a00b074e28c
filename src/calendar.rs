//! Fonctions pures sur le calendrier civil : jours feries, groupes de jours,
//! index de semaine. Seul module qui connait le calendrier civil.

use crate::model::{DayGroup, SettlementPeriod, WeekKey};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Date de Paques (dimanche) pour une annee donnee, algorithme de
/// Meeus/Jones/Butcher (le meme calcul que `get_polish_holidays`).
pub fn easter(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("Easter computation always produces a valid calendar date")
}

/// Jours feries polonais pour une annee donnee : {date -> nom}.
pub fn holidays(year: i32) -> BTreeMap<NaiveDate, &'static str> {
    let e = easter(year);
    let mut out = BTreeMap::new();
    out.insert(NaiveDate::from_ymd_opt(year, 1, 1).unwrap(), "Nowy Rok");
    out.insert(NaiveDate::from_ymd_opt(year, 1, 6).unwrap(), "Trzech Kroli");
    out.insert(e, "Wielkanoc");
    out.insert(e + Duration::days(1), "Poniedzialek Wielkanocny");
    out.insert(NaiveDate::from_ymd_opt(year, 5, 1).unwrap(), "Swieto Pracy");
    out.insert(
        NaiveDate::from_ymd_opt(year, 5, 3).unwrap(),
        "Swieto Konstytucji 3 Maja",
    );
    out.insert(e + Duration::days(49), "Zielone Swiatki");
    out.insert(e + Duration::days(60), "Boze Cialo");
    out.insert(
        NaiveDate::from_ymd_opt(year, 8, 15).unwrap(),
        "Wniebowziecie NMP",
    );
    out.insert(
        NaiveDate::from_ymd_opt(year, 11, 1).unwrap(),
        "Wszystkich Swietych",
    );
    out.insert(
        NaiveDate::from_ymd_opt(year, 11, 11).unwrap(),
        "Swieto Niepodleglosci",
    );
    out.insert(
        NaiveDate::from_ymd_opt(year, 12, 25).unwrap(),
        "Boze Narodzenie (1)",
    );
    out.insert(
        NaiveDate::from_ymd_opt(year, 12, 26).unwrap(),
        "Boze Narodzenie (2)",
    );
    out
}

/// Vrai si la date est un samedi, un dimanche ou un jour ferie.
pub fn is_red_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || holidays(date.year()).contains_key(&date)
}

/// Groupe de jour utilise pour la repartition equitable des dyzurs.
pub fn day_group(date: NaiveDate) -> DayGroup {
    match date.weekday() {
        Weekday::Mon => DayGroup::Monday,
        Weekday::Tue | Weekday::Wed => DayGroup::TueWed,
        Weekday::Thu => DayGroup::Thursday,
        Weekday::Fri => DayGroup::Friday,
        Weekday::Sat => DayGroup::Saturday,
        Weekday::Sun => DayGroup::Sunday,
    }
}

/// Index de semaine relatif au debut de periode.
pub fn week_key(date: NaiveDate, period_start: NaiveDate) -> WeekKey {
    WeekKey((date - period_start).num_days().div_euclid(7))
}

/// Libelle court d'un jour pour le rendu CLI ("Pon", "Sob (Nowy Rok)", ...).
pub fn day_label(date: NaiveDate) -> String {
    const NAMES: [&str; 7] = ["Pon", "Wt", "Sr", "Czw", "Pt", "Sob", "Niedz"];
    let name = NAMES[date.weekday().num_days_from_monday() as usize];
    match holidays(date.year()).get(&date) {
        Some(holiday) => format!("{name} ({holiday})"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easter_matches_known_dates() {
        assert_eq!(easter(2026), NaiveDate::from_ymd_opt(2026, 4, 5).unwrap());
        assert_eq!(easter(2024), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(easter(2025), NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
    }

    #[test]
    fn holidays_include_moveable_feasts() {
        let h = holidays(2026);
        let easter_2026 = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();
        assert_eq!(h.get(&easter_2026), Some(&"Wielkanoc"));
        assert!(h.contains_key(&(easter_2026 + Duration::days(49))));
        assert!(h.contains_key(&(easter_2026 + Duration::days(60))));
    }

    #[test]
    fn is_red_day_covers_weekend_and_holidays() {
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let weekday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(is_red_day(saturday));
        assert!(is_red_day(sunday));
        assert!(is_red_day(new_year));
        assert!(!is_red_day(weekday));
    }

    #[test]
    fn week_key_is_zero_on_first_day_of_period() {
        let period = SettlementPeriod::new(2026, 1).unwrap();
        let start = period.start_date();
        assert_eq!(week_key(start, start), WeekKey(0));
        assert_eq!(week_key(start + Duration::days(6), start), WeekKey(0));
        assert_eq!(week_key(start + Duration::days(7), start), WeekKey(1));
    }

    #[test]
    fn day_group_splits_tuesday_and_wednesday_together() {
        let tue = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let wed = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(day_group(tue), DayGroup::TueWed);
        assert_eq!(day_group(wed), DayGroup::TueWed);
    }
}
