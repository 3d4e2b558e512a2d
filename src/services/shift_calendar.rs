//! Calendário de turnos
//!
//! O dia operacional começa às 06:00: T1 06–14, T2 14–22, T3 22–06.
//! Qualquer horário antes das 06:00 pertence ao dia operacional anterior.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashMap;

use crate::models::Shift;

/// Hora em que o dia operacional vira
pub const DAY_START_HOUR: u32 = 6;

/// Dia operacional de um instante
pub fn operational_date(at: NaiveDateTime) -> NaiveDate {
    if at.hour() < DAY_START_HOUR {
        at.date() - Duration::days(1)
    } else {
        at.date()
    }
}

/// Turno que contém o instante
pub fn shift_at(at: NaiveDateTime) -> Shift {
    match at.hour() {
        6..=13 => Shift::T1,
        14..=21 => Shift::T2,
        _ => Shift::T3,
    }
}

/// Turnos presentes no mapa, começando pelo turno de `now` e seguindo a
/// ordem cíclica T1 → T2 → T3. "Indef", se existir, vai para o fim.
pub fn rotate_from_current<V>(shift_map: &HashMap<Shift, V>, now: NaiveDateTime) -> Vec<Shift> {
    let current = shift_at(now);
    let start = Shift::ORDERED
        .iter()
        .position(|s| *s == current)
        .unwrap_or(0);

    let mut ordered: Vec<Shift> = (0..Shift::ORDERED.len())
        .map(|offset| Shift::ORDERED[(start + offset) % Shift::ORDERED.len()])
        .filter(|shift| shift_map.contains_key(shift))
        .collect();

    if shift_map.contains_key(&Shift::Indefinido) {
        ordered.push(Shift::Indefinido);
    }

    ordered
}

/// Mesma filtragem, mas na ordem natural T1, T2, T3, Indef
pub fn natural_order<V>(shift_map: &HashMap<Shift, V>) -> Vec<Shift> {
    Shift::ORDERED
        .iter()
        .copied()
        .chain(std::iter::once(Shift::Indefinido))
        .filter(|shift| shift_map.contains_key(shift))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_operational_date_boundary() {
        assert_eq!(operational_date(at(6, 5, 59)), NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(operational_date(at(6, 6, 0)), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(operational_date(at(6, 23, 59)), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_shift_at() {
        assert_eq!(shift_at(at(6, 6, 0)), Shift::T1);
        assert_eq!(shift_at(at(6, 13, 59)), Shift::T1);
        assert_eq!(shift_at(at(6, 14, 0)), Shift::T2);
        assert_eq!(shift_at(at(6, 21, 59)), Shift::T2);
        assert_eq!(shift_at(at(6, 22, 0)), Shift::T3);
        assert_eq!(shift_at(at(6, 5, 59)), Shift::T3);
    }

    #[test]
    fn test_rotate_from_current() {
        let mut map = HashMap::new();
        map.insert(Shift::T1, 1);
        map.insert(Shift::T2, 1);
        map.insert(Shift::T3, 1);

        assert_eq!(rotate_from_current(&map, at(6, 15, 0)), vec![Shift::T2, Shift::T3, Shift::T1]);
        assert_eq!(rotate_from_current(&map, at(6, 23, 0)), vec![Shift::T3, Shift::T1, Shift::T2]);
        assert_eq!(rotate_from_current(&map, at(6, 7, 0)), vec![Shift::T1, Shift::T2, Shift::T3]);
    }

    #[test]
    fn test_rotate_filters_missing_and_keeps_indef_last() {
        let mut map = HashMap::new();
        map.insert(Shift::T1, 1);
        map.insert(Shift::Indefinido, 1);

        assert_eq!(rotate_from_current(&map, at(6, 15, 0)), vec![Shift::T1, Shift::Indefinido]);
        assert_eq!(natural_order(&map), vec![Shift::T1, Shift::Indefinido]);
    }
}
