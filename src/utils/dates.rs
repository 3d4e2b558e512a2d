//! Datas da planilha (sempre dia-primeiro) e formatação de durações

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::normalization::is_sentinel;

/// Exibição de ETA ausente
pub const MISSING_DATETIME: &str = "--/-- --:--";

/// Exibição de tempo desconhecido
pub const MISSING_DURATION: &str = "--:--";

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?").unwrap()
});

static DAY_FIRST_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4}|\d{2})\b(?:[ T,]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?")
        .unwrap()
});

/// Interpreta uma célula de data/hora, tolerando lixo em volta
///
/// Formatos dia-primeiro (`06/01/2025 13:05`, `6-1-25`) e ISO
/// (`2025-01-06T13:05:00`). Só a data significa meia-noite. Vazio,
/// sentinelas ("NaT", "--") e datas impossíveis retornam `None`.
///
/// ```
/// use chrono::NaiveDate;
/// use patio_report::utils::dates::parse_datetime;
///
/// let parsed = parse_datetime("Chegada: 06/01/2025 13:05").unwrap();
/// assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(13, 5, 0).unwrap());
/// ```
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if is_sentinel(raw) {
        return None;
    }

    let iso = ISO_DATETIME.captures(raw).map(|caps| (caps, (1, 2, 3)));
    let day_first = DAY_FIRST_DATETIME.captures(raw).map(|caps| (caps, (3, 2, 1)));

    // Vale o primeiro padrão que aparece no texto
    let start = |caps: &Captures<'_>| caps.get(0).map_or(usize::MAX, |m| m.start());
    let (caps, (year, month, day)) = match (iso, day_first) {
        (Some(iso), Some(day_first)) if start(&day_first.0) < start(&iso.0) => day_first,
        (Some(iso), _) => iso,
        (None, Some(day_first)) => day_first,
        (None, None) => return None,
    };

    build(&caps, year, month, day)
}

fn build(caps: &Captures<'_>, year_idx: usize, month_idx: usize, day_idx: usize) -> Option<NaiveDateTime> {
    let number = |idx: usize| -> Option<u32> { caps.get(idx).and_then(|m| m.as_str().parse().ok()) };

    let year_raw = caps.get(year_idx)?.as_str();
    let mut year: i32 = year_raw.parse().ok()?;
    if year_raw.len() == 2 {
        year += 2000;
    }

    let date = NaiveDate::from_ymd_opt(year, number(month_idx)?, number(day_idx)?)?;
    let hour = number(4).unwrap_or(0);
    let minute = number(5).unwrap_or(0);
    let second = number(6).unwrap_or(0);

    date.and_hms_opt(hour, minute, second)
}

/// `dd/mm HH:MM` ou `--/-- --:--`
pub fn format_short(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| MISSING_DATETIME.to_string())
}

/// Minutos inteiros (piso) entre `reference` e `now`
pub fn elapsed_minutes(now: NaiveDateTime, reference: NaiveDateTime) -> i64 {
    (now - reference).num_seconds().div_euclid(60)
}

/// `HH:MM`, com sinal apenas quando negativo
///
/// ```
/// use patio_report::utils::dates::format_hhmm;
///
/// assert_eq!(format_hhmm(150), "02:30");
/// assert_eq!(format_hhmm(-5), "-00:05");
/// ```
pub fn format_hhmm(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let m = minutes.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

/// Variante usada nos resumos de pendentes: `HH:MMh`
pub fn format_hhmm_h(minutes: i64) -> String {
    format!("{}h", format_hhmm(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_day_first_with_prefix() {
        assert_eq!(parse_datetime("Chegada: 06/01/2025 13:05"), Some(dt(2025, 1, 6, 13, 5)));
    }

    #[test]
    fn test_earliest_date_in_mixed_cell_wins() {
        assert_eq!(
            parse_datetime("Chegada: 06/01/2025 13:05 (atualizado 2025-02-03 08:00)"),
            Some(dt(2025, 1, 6, 13, 5))
        );
        assert_eq!(
            parse_datetime("2025-02-03 08:00 / antes 06/01/2025 13:05"),
            Some(dt(2025, 2, 3, 8, 0))
        );
    }

    #[test]
    fn test_day_first_variants() {
        assert_eq!(parse_datetime("06/01/2025"), Some(dt(2025, 1, 6, 0, 0)));
        assert_eq!(parse_datetime("6-1-25 7:30"), Some(dt(2025, 1, 6, 7, 30)));
        assert_eq!(parse_datetime("31.12.2024 23:59:59"), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(23, 59, 59));
        assert_eq!(parse_datetime("15/03/2025, 08:00"), Some(dt(2025, 3, 15, 8, 0)));
    }

    #[test]
    fn test_iso_is_not_read_day_first() {
        assert_eq!(parse_datetime("2025-01-06 13:05:00"), Some(dt(2025, 1, 6, 13, 5)));
        assert_eq!(parse_datetime("2025-01-06T13:05"), Some(dt(2025, 1, 6, 13, 5)));
    }

    #[test]
    fn test_sentinels_and_garbage() {
        for raw in ["", "NaT", "none", "--", "-", "null", "sem data", "32/13/2025 10:00", "06/01/2025 25:00"] {
            assert_eq!(parse_datetime(raw), None, "valor: {raw:?}");
        }
    }

    #[test]
    fn test_elapsed_minutes_floors() {
        let now = dt(2025, 1, 6, 12, 0);
        let reference = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(9, 29, 30).unwrap();
        assert_eq!(elapsed_minutes(now, reference), 150);
        // referência no futuro: piso vai para o inteiro menor
        let future = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(12, 0, 30).unwrap();
        assert_eq!(elapsed_minutes(now, future), -1);
    }

    #[test]
    fn test_format_hhmm() {
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(150), "02:30");
        assert_eq!(format_hhmm(-75), "-01:15");
        assert_eq!(format_hhmm(1500), "25:00");
        assert_eq!(format_hhmm_h(90), "01:30h");
    }

    #[test]
    fn test_format_short() {
        assert_eq!(format_short(Some(dt(2025, 1, 6, 13, 5))), "06/01 13:05");
        assert_eq!(format_short(None), "--/-- --:--");
    }
}
