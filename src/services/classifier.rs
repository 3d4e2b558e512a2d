//! Classificação das LHs do pátio
//!
//! O status é texto livre, então a decisão é por substring numa tabela
//! ordenada: a primeira regra que casar define a classe. Com isso "em doca
//! na fila" cai em doca e "finalizado" sempre vence.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{ArrivalConfirmation, Shipment, StatusClass};
use crate::utils::dates::elapsed_minutes;
use crate::utils::logging::log_row_skipped;

/// Regras de status em ordem de prioridade
pub const STATUS_RULES: &[(&str, StatusClass)] = &[
    ("finalizado", StatusClass::Excluded),
    ("descarregando", StatusClass::Unloading),
    ("doca", StatusClass::AtDock),
    ("fila", StatusClass::Queued),
    ("pendente", StatusClass::Pending),
];

/// Status que mantém a linha nas tabelas do pátio mesmo sem horário de
/// referência (check-in / entrada na fila)
const KEEP_WITHOUT_REFERENCE: &[&str] = &["em doca", "fila"];

/// Classe do status normalizado; `None` quando nenhuma regra casa
pub fn classify_status(status: &str) -> Option<StatusClass> {
    STATUS_RULES
        .iter()
        .find(|(pattern, _)| status.contains(pattern))
        .map(|(_, class)| *class)
}

/// Uma linha de tabela do pátio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YardEntry {
    pub trip_id: String,
    pub dock: String,
    pub transfer_order: String,
    pub eta: Option<NaiveDateTime>,
    /// Minutos desde a referência; `None` = desconhecido ("--:--")
    pub elapsed: Option<i64>,
    pub origin: String,
}

/// Lista de linhas de uma seção
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bucket {
    entries: Vec<YardEntry>,
}

impl Bucket {
    pub fn push(&mut self, entry: YardEntry) {
        self.entries.push(entry);
    }

    /// Maior espera primeiro; empates mantêm a ordem da planilha e
    /// desconhecidos ficam no fim
    pub fn sort_longest_first(&mut self) {
        sort_longest_first(&mut self.entries, |e| e.elapsed);
    }

    pub fn entries(&self) -> &[YardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordenação estável, decrescente por minutos, `None` por último
pub fn sort_longest_first<T>(items: &mut [T], minutes: impl Fn(&T) -> Option<i64>) {
    items.sort_by(|a, b| match (minutes(a), minutes(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Tabelas do pátio de uma execução
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YardBoard {
    pub unloading: Bucket,
    pub at_dock: Bucket,
    pub queued: Bucket,
    pub arrivals: Bucket,
    /// LTs vistas nas tabelas principais (para deduplicar "Deu chegada")
    #[serde(skip)]
    seen_trips: HashSet<String>,
}

impl YardBoard {
    pub fn has_seen(&self, trip_id: &str) -> bool {
        self.seen_trips.contains(trip_id)
    }

    pub fn is_empty(&self) -> bool {
        self.unloading.is_empty() && self.at_dock.is_empty() && self.queued.is_empty() && self.arrivals.is_empty()
    }

    fn sort_all(&mut self) {
        self.unloading.sort_longest_first();
        self.at_dock.sort_longest_first();
        self.queued.sort_longest_first();
        self.arrivals.sort_longest_first();
    }
}

/// Distribui as LHs da aba principal entre descarregando / em doca / em fila
pub fn classify_yard(shipments: &[Shipment], now: NaiveDateTime) -> YardBoard {
    let mut board = YardBoard::default();

    for shipment in shipments {
        let bucket = match classify_status(&shipment.status) {
            Some(StatusClass::Unloading) => &mut board.unloading,
            Some(StatusClass::AtDock) => &mut board.at_dock,
            Some(StatusClass::Queued) => &mut board.queued,
            _ => continue,
        };

        board.seen_trips.insert(shipment.trip_id.clone());

        let reference = shipment.reference_time();
        if reference.is_none()
            && !KEEP_WITHOUT_REFERENCE
                .iter()
                .any(|term| shipment.status.contains(term))
        {
            log_row_skipped(&shipment.trip_id, "sem check-in nem entrada na fila");
            continue;
        }

        bucket.push(YardEntry {
            trip_id: shipment.trip_id.clone(),
            dock: shipment.dock.clone(),
            transfer_order: shipment.transfer_order.clone(),
            eta: shipment.eta,
            elapsed: reference.map(|r| elapsed_minutes(now, r)),
            origin: shipment.origin.clone(),
        });
    }

    board.sort_all();
    board
}

/// Acrescenta as confirmações de chegada que ainda não estão no pátio
///
/// Só entram LTs preenchidas, com horário de chegada válido, ausentes das
/// tabelas principais e com espera estritamente maior que `min_minutes`.
pub fn confirm_arrivals(
    board: &mut YardBoard,
    arrivals: &[ArrivalConfirmation],
    now: NaiveDateTime,
    min_minutes: i64,
) {
    for arrival in arrivals {
        if arrival.trip_id.is_empty() || board.has_seen(&arrival.trip_id) {
            continue;
        }

        let Some(arrived_at) = arrival.arrived_at else {
            log_row_skipped(&arrival.trip_id, "chegada sem horário válido");
            continue;
        };

        let minutes = elapsed_minutes(now, arrived_at);
        if minutes <= min_minutes {
            continue;
        }

        board.arrivals.push(YardEntry {
            trip_id: arrival.trip_id.clone(),
            dock: crate::utils::normalization::PLACEHOLDER.to_string(),
            transfer_order: arrival.transfer_order.clone(),
            eta: arrival.eta,
            elapsed: Some(minutes),
            origin: arrival.origin.clone(),
        });
    }

    board.arrivals.sort_longest_first();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Shift;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn shipment(trip: &str, status: &str, checkin_ago: Option<i64>, queue_ago: Option<i64>) -> Shipment {
        Shipment {
            trip_id: trip.to_string(),
            status: status.to_string(),
            dock: "07".to_string(),
            transfer_order: "--".to_string(),
            origin: "SP05".to_string(),
            package_count: 10,
            shift: Shift::Indefinido,
            eta: None,
            checkin_time: checkin_ago.map(|m| now() - Duration::minutes(m)),
            queue_entry_time: queue_ago.map(|m| now() - Duration::minutes(m)),
            cutoff: None,
        }
    }

    fn trips(bucket: &Bucket) -> Vec<&str> {
        bucket.entries().iter().map(|e| e.trip_id.as_str()).collect()
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(classify_status("em doca na fila"), Some(StatusClass::AtDock));
        assert_eq!(classify_status("descarregando doca 3"), Some(StatusClass::Unloading));
        assert_eq!(classify_status("em doca finalizado"), Some(StatusClass::Excluded));
        assert_eq!(classify_status("pendente de chegada"), Some(StatusClass::Pending));
        assert_eq!(classify_status("em transito"), None);
    }

    #[test]
    fn test_finalized_never_in_any_bucket() {
        let board = classify_yard(
            &[
                shipment("LT1", "finalizado", Some(30), None),
                shipment("LT2", "descarregando finalizado", Some(30), None),
                shipment("LT3", "em doca - finalizado", None, None),
            ],
            now(),
        );
        assert!(board.is_empty());
        assert!(!board.has_seen("LT1"));
    }

    #[test]
    fn test_mixed_status_lands_in_dock_only() {
        let board = classify_yard(&[shipment("LT1", "em doca na fila", Some(5), None)], now());
        assert_eq!(trips(&board.at_dock), vec!["LT1"]);
        assert!(board.queued.is_empty());
        assert!(board.unloading.is_empty());
    }

    #[test]
    fn test_checkin_wins_over_queue_entry() {
        let board = classify_yard(&[shipment("LT1", "em fila", Some(30), Some(90))], now());
        assert_eq!(board.queued.entries()[0].elapsed, Some(30));

        let board = classify_yard(&[shipment("LT1", "em fila", None, Some(90))], now());
        assert_eq!(board.queued.entries()[0].elapsed, Some(90));
    }

    #[test]
    fn test_elapsed_is_floor_of_minutes() {
        let mut s = shipment("LT1", "em doca", None, None);
        s.checkin_time = Some(now() - Duration::seconds(150 * 60 + 59));
        let board = classify_yard(&[s], now());
        assert_eq!(board.at_dock.entries()[0].elapsed, Some(150));
    }

    #[test]
    fn test_missing_reference_rules() {
        let board = classify_yard(
            &[
                shipment("DOCA", "em doca", None, None),
                shipment("FILA", "em fila", None, None),
                shipment("DESC", "descarregando", None, None),
                shipment("DOCA2", "doca 4", None, None),
            ],
            now(),
        );
        assert_eq!(trips(&board.at_dock), vec!["DOCA"]);
        assert_eq!(board.at_dock.entries()[0].elapsed, None);
        assert_eq!(trips(&board.queued), vec!["FILA"]);
        assert!(board.unloading.is_empty());
        // mesmo pulada, a LT conta como vista no pátio
        assert!(board.has_seen("DESC"));
    }

    #[test]
    fn test_sort_descending_stable_unknown_last() {
        let board = classify_yard(
            &[
                shipment("A", "em fila", Some(10), None),
                shipment("B", "em fila", None, None),
                shipment("C", "em fila", Some(40), None),
                shipment("D", "em fila", Some(10), None),
            ],
            now(),
        );
        assert_eq!(trips(&board.queued), vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_arrivals_dedup_and_threshold() {
        let mut board = classify_yard(&[shipment("LT1", "em doca", Some(20), None)], now());
        let arrival = |trip: &str, ago: Option<i64>| ArrivalConfirmation {
            trip_id: trip.to_string(),
            arrived_at: ago.map(|m| now() - Duration::minutes(m)),
            transfer_order: "--".to_string(),
            origin: "RJ01".to_string(),
            eta: None,
        };

        confirm_arrivals(
            &mut board,
            &[
                arrival("LT1", Some(60)),
                arrival("LT2", Some(10)),
                arrival("LT3", Some(11)),
                arrival("", Some(90)),
                arrival("LT4", None),
                arrival("LT5", Some(45)),
            ],
            now(),
            10,
        );

        assert_eq!(trips(&board.arrivals), vec!["LT5", "LT3"]);
        assert_eq!(board.arrivals.entries()[0].dock, "--");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let input = vec![
            shipment("A", "em fila", Some(10), None),
            shipment("B", "descarregando", Some(200), None),
        ];
        assert_eq!(classify_yard(&input, now()), classify_yard(&input, now()));
    }
}
