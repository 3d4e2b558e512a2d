//! Registro de LH derivado de cada linha (nunca persistido)

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Turno operacional de 8 horas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Shift {
    T1,
    T2,
    T3,
    /// Coluna de turno vazia ou ilegível
    Indefinido,
}

impl Shift {
    /// Turnos válidos, na ordem do dia operacional
    pub const ORDERED: [Shift; 3] = [Shift::T1, Shift::T2, Shift::T3];

    /// "T1", "t2", "Turno 3", "3º turno" → turno; qualquer outra coisa → Indefinido
    pub fn parse(raw: &str) -> Shift {
        let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.as_slice() {
            ['1'] => Shift::T1,
            ['2'] => Shift::T2,
            ['3'] => Shift::T3,
            _ => Shift::Indefinido,
        }
    }

    /// Peso para comparar turnos dentro do mesmo dia operacional
    pub fn weight(self) -> Option<u8> {
        match self {
            Shift::T1 => Some(1),
            Shift::T2 => Some(2),
            Shift::T3 => Some(3),
            Shift::Indefinido => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shift::T1 => "T1",
            Shift::T2 => "T2",
            Shift::T3 => "T3",
            Shift::Indefinido => "Indef",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classe decidida pelo texto do status (exatamente uma por registro)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    /// "finalizado": some de todas as tabelas e resumos
    Excluded,
    Unloading,
    AtDock,
    Queued,
    Pending,
}

/// Faixa de um pendente em relação ao dia/turno atual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PendingCategory {
    Late,
    Today,
    Tomorrow,
}

/// LH lida da aba principal ("Report")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub trip_id: String,
    /// Status já normalizado (minúsculo, sem acento, sinônimos aplicados)
    pub status: String,
    pub dock: String,
    pub transfer_order: String,
    pub origin: String,
    pub package_count: u32,
    pub shift: Shift,
    pub eta: Option<NaiveDateTime>,
    pub checkin_time: Option<NaiveDateTime>,
    pub queue_entry_time: Option<NaiveDateTime>,
    pub cutoff: Option<NaiveDateTime>,
}

impl Shipment {
    /// Check-in tem prioridade; entrada na fila é o fallback
    pub fn reference_time(&self) -> Option<NaiveDateTime> {
        self.checkin_time.or(self.queue_entry_time)
    }

    /// Data de vencimento de um pendente: cutoff, senão ETA
    pub fn due_time(&self) -> Option<NaiveDateTime> {
        self.cutoff.or(self.eta)
    }
}

/// Linha da aba secundária "Deu chegada"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalConfirmation {
    /// Vazio quando a célula está em branco (a linha é descartada)
    pub trip_id: String,
    pub arrived_at: Option<NaiveDateTime>,
    pub transfer_order: String,
    pub origin: String,
    pub eta: Option<NaiveDateTime>,
}
