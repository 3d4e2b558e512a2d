//! Tabela de aliases de colunas
//!
//! Cada revisão da planilha renomeia alguma coluna. O código trabalha só
//! com campos canônicos (`Field`); esta tabela diz quais cabeçalhos podem
//! representar cada um.
//! - Padrão: aliases da planilha de produção
//! - Override: `columns` no config/*.yaml ou arquivo YAML via COLUMNS_CONFIG_PATH

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::utils::{AppError, AppResult};

/// Campo canônico que o classificador consome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TripId,
    Status,
    Dock,
    TransferOrder,
    Origin,
    PackageCount,
    Shift,
    Eta,
    Checkin,
    QueueEntry,
    Cutoff,
    ArrivalTime,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::TripId => "trip_id",
            Field::Status => "status",
            Field::Dock => "dock",
            Field::TransferOrder => "transfer_order",
            Field::Origin => "origin",
            Field::PackageCount => "package_count",
            Field::Shift => "shift",
            Field::Eta => "eta",
            Field::Checkin => "checkin",
            Field::QueueEntry => "queue_entry",
            Field::Cutoff => "cutoff",
            Field::ArrivalTime => "arrival_time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Campo canônico → cabeçalhos aceitos, em ordem de preferência
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAliases {
    aliases: BTreeMap<Field, Vec<String>>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        // "LH Trip Nnumber" é o cabeçalho real (com o erro de digitação)
        let defaults: &[(Field, &[&str])] = &[
            (Field::TripId, &["LH Trip Nnumber", "LH Trip Number", "LT", "Trip"]),
            (Field::Status, &["Status"]),
            (Field::Dock, &["Doca", "Dock"]),
            (Field::TransferOrder, &["TO", "TOs"]),
            (Field::Origin, &["station_code", "code", "Origem"]),
            (Field::PackageCount, &["Qtd Pacotes", "Pacotes", "Quantidade", "Qty"]),
            (Field::Shift, &["Turno", "Shift"]),
            (Field::Eta, &["ETA Planejado", "ETA"]),
            (Field::Checkin, &["Checkin", "Check-in"]),
            (Field::QueueEntry, &["Add to Queue Time"]),
            (Field::Cutoff, &["Cutoff", "Data Limite"]),
            (Field::ArrivalTime, &["Chegada"]),
        ];

        Self {
            aliases: defaults
                .iter()
                .map(|(field, names)| (*field, names.iter().map(|n| n.to_string()).collect()))
                .collect(),
        }
    }
}

impl ColumnAliases {
    pub fn get(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Substitui os aliases dos campos informados; os demais ficam no padrão
    pub fn with_overrides(mut self, overrides: HashMap<Field, Vec<String>>) -> Self {
        for (field, names) in overrides {
            let names: Vec<String> = names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
            if !names.is_empty() {
                self.aliases.insert(field, names);
            }
        }
        self
    }

    /// Carrega overrides de um arquivo YAML (`campo: [alias, ...]`)
    pub async fn load_from_file(self, path: &str) -> AppResult<Self> {
        tracing::info!("📂 Carregando aliases de colunas de: {}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::ConfigError(format!("Erro ao ler arquivo {}: {}", path, e))
        })?;

        Ok(self.with_overrides(Self::parse_yaml(&content)?))
    }

    fn parse_yaml(content: &str) -> AppResult<HashMap<Field, Vec<String>>> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("YAML de colunas inválido: {}", e)))
    }
}
