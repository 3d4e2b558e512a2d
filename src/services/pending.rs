//! Pendentes de chegada: atrasados, hoje e amanhã
//!
//! Vale a data de vencimento (cutoff, senão ETA) comparada ao dia
//! operacional atual. Vencendo hoje num turno que já passou conta como
//! atrasado. Só entram linhas "pendente" com pacotes.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;

use super::classifier::{classify_status, sort_longest_first};
use super::shift_calendar::{operational_date, shift_at};
use crate::models::{PendingCategory, Shift, Shipment, StatusClass};
use crate::utils::dates::elapsed_minutes;

/// Um pendente classificado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEntry {
    pub trip_id: String,
    pub origin: String,
    pub shift: Shift,
    pub package_count: u32,
    pub due: NaiveDateTime,
    /// `now - due` em minutos (negativo = ainda no prazo)
    pub overdue_minutes: i64,
}

/// Contadores por turno
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShiftSummary {
    pub count: u32,
    pub package_total: u64,
}

/// Pendentes separados por categoria
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PendingBoard {
    pub late: Vec<PendingEntry>,
    pub today: Vec<PendingEntry>,
    pub tomorrow: Vec<PendingEntry>,
}

impl PendingBoard {
    pub fn entries(&self, category: PendingCategory) -> &[PendingEntry] {
        match category {
            PendingCategory::Late => &self.late,
            PendingCategory::Today => &self.today,
            PendingCategory::Tomorrow => &self.tomorrow,
        }
    }

    pub fn len(&self) -> usize {
        self.late.len() + self.today.len() + self.tomorrow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resumo por turno de uma categoria
    pub fn summary(&self, category: PendingCategory) -> HashMap<Shift, ShiftSummary> {
        let mut summary: HashMap<Shift, ShiftSummary> = HashMap::new();
        for entry in self.entries(category) {
            let counters = summary.entry(entry.shift).or_default();
            counters.count += 1;
            counters.package_total += u64::from(entry.package_count);
        }
        summary
    }

    /// Total de pacotes de uma categoria
    pub fn package_total(&self, category: PendingCategory) -> u64 {
        self.entries(category)
            .iter()
            .map(|e| u64::from(e.package_count))
            .sum()
    }
}

/// Turno do pendente: coluna de turno, senão o turno do vencimento
fn effective_shift(shipment: &Shipment, due: NaiveDateTime) -> Shift {
    match shipment.shift {
        Shift::Indefinido => shift_at(due),
        shift => shift,
    }
}

/// Categoria de um pendente; `None` quando não é pendente elegível ou vence
/// depois de amanhã
pub fn categorize(shipment: &Shipment, now: NaiveDateTime) -> Option<(PendingCategory, Shift, NaiveDateTime)> {
    if classify_status(&shipment.status) != Some(StatusClass::Pending) || shipment.package_count == 0 {
        return None;
    }

    let due = shipment.due_time()?;
    let shift = effective_shift(shipment, due);
    let today = operational_date(now);
    let due_day = operational_date(due);

    let category = if due_day < today {
        PendingCategory::Late
    } else if due_day == today {
        match (shift.weight(), shift_at(now).weight()) {
            (Some(record), Some(current)) if record < current => PendingCategory::Late,
            _ => PendingCategory::Today,
        }
    } else if due_day == today + Duration::days(1) {
        PendingCategory::Tomorrow
    } else {
        return None;
    };

    Some((category, shift, due))
}

/// Classifica todos os pendentes da aba principal
pub fn classify_pending(shipments: &[Shipment], now: NaiveDateTime) -> PendingBoard {
    let mut board = PendingBoard::default();

    for shipment in shipments {
        let Some((category, shift, due)) = categorize(shipment, now) else {
            continue;
        };

        let entry = PendingEntry {
            trip_id: shipment.trip_id.clone(),
            origin: shipment.origin.clone(),
            shift,
            package_count: shipment.package_count,
            due,
            overdue_minutes: elapsed_minutes(now, due),
        };

        match category {
            PendingCategory::Late => board.late.push(entry),
            PendingCategory::Today => board.today.push(entry),
            PendingCategory::Tomorrow => board.tomorrow.push(entry),
        }
    }

    sort_longest_first(&mut board.late, |e| Some(e.overdue_minutes));
    board
}
