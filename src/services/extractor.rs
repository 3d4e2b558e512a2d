//! Extração de campos canônicos das linhas cruas
//!
//! A busca de cabeçalho é feita uma vez por aba: para cada campo, todos
//! os aliases são testados por igualdade exata, depois igualdade sem
//! diferenciar maiúsculas, depois prefixo e por fim substring. Coluna ausente nunca
//! falha aqui; o valor volta vazio e a normalização aplica o padrão.

use std::collections::HashMap;

use crate::config::{ColumnAliases, Field};
use crate::models::{ArrivalConfirmation, RawRow, Shift, Shipment, Snapshot};
use crate::utils::dates::parse_datetime;
use crate::utils::normalization::{normalize_status, padronizar_doca, parse_package_count, text_or_placeholder};
use crate::utils::{AppError, AppResult};

/// Placeholder de LT em branco na aba principal
pub const MISSING_TRIP: &str = "???";

/// Campos sem os quais a aba principal não pode ser classificada
pub const REPORT_REQUIRED: &[Field] = &[Field::TripId, Field::Status];

/// Campos sem os quais a aba "Deu chegada" não faz sentido
pub const ARRIVALS_REQUIRED: &[Field] = &[Field::TripId, Field::ArrivalTime];

/// Prefixo/substring só valem para aliases com pelo menos 3 caracteres
/// ("TO" casaria com "Total", "Status"...)
const MIN_FUZZY_ALIAS: usize = 3;

/// Resolve campos canônicos para os cabeçalhos de uma aba
#[derive(Debug, Clone)]
pub struct FieldResolver {
    sheet: String,
    resolved: HashMap<Field, Option<String>>,
}

impl FieldResolver {
    pub fn new(snapshot: &Snapshot, aliases: &ColumnAliases) -> Self {
        Self::from_headers(snapshot.sheet(), snapshot.headers(), aliases)
    }

    pub fn from_headers(sheet: &str, headers: &[String], aliases: &ColumnAliases) -> Self {
        let fields = [
            Field::TripId,
            Field::Status,
            Field::Dock,
            Field::TransferOrder,
            Field::Origin,
            Field::PackageCount,
            Field::Shift,
            Field::Eta,
            Field::Checkin,
            Field::QueueEntry,
            Field::Cutoff,
            Field::ArrivalTime,
        ];

        let resolved = fields
            .iter()
            .map(|field| (*field, find_header(headers, aliases.get(*field))))
            .collect();

        Self {
            sheet: sheet.to_string(),
            resolved,
        }
    }

    /// Cabeçalho escolhido para o campo, se houver
    pub fn header_for(&self, field: Field) -> Option<&str> {
        self.resolved.get(&field).and_then(|h| h.as_deref())
    }

    /// Falha com `MissingColumn` no primeiro campo obrigatório sem cabeçalho
    pub fn require(&self, fields: &[Field]) -> AppResult<()> {
        match fields.iter().find(|f| self.header_for(**f).is_none()) {
            Some(field) => Err(AppError::MissingColumn {
                sheet: self.sheet.clone(),
                field: field.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Valor cru do campo na linha; vazio quando a coluna não existe
    pub fn resolve<'r>(&self, row: &'r RawRow, field: Field) -> &'r str {
        self.header_for(field)
            .and_then(|header| row.get(header))
            .unwrap_or("")
    }
}

fn find_header(headers: &[String], aliases: &[String]) -> Option<String> {
    let lowered: Vec<(String, &String)> = headers.iter().map(|h| (h.to_lowercase(), h)).collect();
    let lowered_aliases: Vec<String> = aliases.iter().map(|a| a.to_lowercase()).collect();

    let search = |matches: &dyn Fn(&str, &str) -> bool, min_len: usize| -> Option<String> {
        lowered_aliases
            .iter()
            .filter(|alias| alias.chars().count() >= min_len)
            .find_map(|alias| {
                lowered
                    .iter()
                    .find(|(header, _)| matches(header.as_str(), alias.as_str()))
                    .map(|(_, original)| (*original).clone())
            })
    };

    aliases
        .iter()
        .find_map(|alias| headers.iter().find(|h| *h == alias).cloned())
        .or_else(|| search(&|header, alias| header == alias, 0))
        .or_else(|| search(&|header, alias| header.starts_with(alias), MIN_FUZZY_ALIAS))
        .or_else(|| search(&|header, alias| header.contains(alias), MIN_FUZZY_ALIAS))
}

/// Monta o registro de LH a partir de uma linha da aba principal
pub fn extract_shipment(row: &RawRow, resolver: &FieldResolver) -> Shipment {
    let field = |f: Field| resolver.resolve(row, f);

    let trip_id = field(Field::TripId).trim();

    Shipment {
        trip_id: if trip_id.is_empty() {
            MISSING_TRIP.to_string()
        } else {
            trip_id.to_string()
        },
        status: normalize_status(field(Field::Status)),
        dock: padronizar_doca(field(Field::Dock)),
        transfer_order: text_or_placeholder(field(Field::TransferOrder)),
        origin: text_or_placeholder(field(Field::Origin)),
        package_count: parse_package_count(field(Field::PackageCount)),
        shift: Shift::parse(field(Field::Shift)),
        eta: parse_datetime(field(Field::Eta)),
        checkin_time: parse_datetime(field(Field::Checkin)),
        queue_entry_time: parse_datetime(field(Field::QueueEntry)),
        cutoff: parse_datetime(field(Field::Cutoff)),
    }
}

/// Monta a confirmação de chegada a partir de uma linha de "Deu chegada"
pub fn extract_arrival(row: &RawRow, resolver: &FieldResolver) -> ArrivalConfirmation {
    let field = |f: Field| resolver.resolve(row, f);

    ArrivalConfirmation {
        trip_id: field(Field::TripId).trim().to_string(),
        arrived_at: parse_datetime(field(Field::ArrivalTime)),
        transfer_order: text_or_placeholder(field(Field::TransferOrder)),
        origin: text_or_placeholder(field(Field::Origin)),
        eta: parse_datetime(field(Field::Eta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins_over_fallbacks() {
        let resolver = FieldResolver::from_headers(
            "Report",
            &headers(&["Doca Antiga", "Doca", "TOs", "TO"]),
            &ColumnAliases::default(),
        );
        assert_eq!(resolver.header_for(Field::Dock), Some("Doca"));
        assert_eq!(resolver.header_for(Field::TransferOrder), Some("TO"));
    }

    #[test]
    fn test_case_insensitive_prefix_and_substring() {
        let resolver = FieldResolver::from_headers(
            "Report",
            &headers(&["status atual", "Horário Checkin (BRT)", "ETA PLANEJADO"]),
            &ColumnAliases::default(),
        );
        assert_eq!(resolver.header_for(Field::Status), Some("status atual"));
        assert_eq!(resolver.header_for(Field::Checkin), Some("Horário Checkin (BRT)"));
        assert_eq!(resolver.header_for(Field::Eta), Some("ETA PLANEJADO"));
    }

    #[test]
    fn test_short_alias_does_not_match_substring() {
        let resolver = FieldResolver::from_headers("Report", &headers(&["Total", "Status"]), &ColumnAliases::default());
        assert_eq!(resolver.header_for(Field::TransferOrder), None);
    }

    #[test]
    fn test_duplicate_header_still_resolves() {
        let snapshot = Snapshot::from_values(
            "Report",
            vec![
                headers(&["LT", "Status", "Status"]),
                headers(&["LT9", "Em Doca", "antigo"]),
            ],
        );
        let resolver = FieldResolver::new(&snapshot, &ColumnAliases::default());
        assert_eq!(resolver.resolve(&snapshot.rows()[0], Field::Status), "Em Doca");
    }

    #[test]
    fn test_missing_column_is_empty_not_error() {
        let row = RawRow::from_pairs(&[("LT", "LT1")]);
        let resolver = FieldResolver::from_headers("Report", &headers(&["LT"]), &ColumnAliases::default());
        assert_eq!(resolver.resolve(&row, Field::Dock), "");

        let shipment = extract_shipment(&row, &resolver);
        assert_eq!(shipment.dock, "--");
        assert_eq!(shipment.origin, "--");
        assert_eq!(shipment.package_count, 0);
        assert_eq!(shipment.checkin_time, None);
        assert_eq!(shipment.shift, Shift::Indefinido);
    }

    #[test]
    fn test_require_reports_sheet_and_field() {
        let resolver = FieldResolver::from_headers("Report", &headers(&["LT", "Doca"]), &ColumnAliases::default());
        match resolver.require(REPORT_REQUIRED) {
            Err(AppError::MissingColumn { sheet, field }) => {
                assert_eq!(sheet, "Report");
                assert_eq!(field, "status");
            }
            other => panic!("esperado MissingColumn, veio {other:?}"),
        }
    }

    #[test]
    fn test_extract_shipment_normalizes_everything() {
        let row = RawRow::from_pairs(&[
            ("LH Trip Nnumber", " LT0A1B2C "),
            ("Status", " Em Doca "),
            ("Doca", "Doca 07"),
            ("TO", ""),
            ("station_code", "SP05"),
            ("Qtd Pacotes", "1.250"),
            ("Turno", "T2"),
            ("ETA Planejado", "06/01/2025 10:00"),
            ("Checkin", "lixo"),
            ("Add to Queue Time", "06/01/2025 09:30"),
        ]);
        let headers: Vec<String> = row.headers().map(String::from).collect();
        let resolver = FieldResolver::from_headers("Report", &headers, &ColumnAliases::default());

        let shipment = extract_shipment(&row, &resolver);
        assert_eq!(shipment.trip_id, "LT0A1B2C");
        assert_eq!(shipment.status, "em doca");
        assert_eq!(shipment.dock, "07");
        assert_eq!(shipment.transfer_order, "--");
        assert_eq!(shipment.origin, "SP05");
        assert_eq!(shipment.package_count, 1250);
        assert_eq!(shipment.shift, Shift::T2);
        assert!(shipment.eta.is_some());
        assert_eq!(shipment.checkin_time, None);
        assert!(shipment.queue_entry_time.is_some());
    }

    #[test]
    fn test_extract_arrival_uses_secondary_aliases() {
        let row = RawRow::from_pairs(&[
            ("LT", "LT77"),
            ("Chegada", "Chegada: 06/01/2025 13:05"),
            ("code", "RJ01"),
            ("TOs", "TO-1"),
        ]);
        let headers: Vec<String> = row.headers().map(String::from).collect();
        let resolver = FieldResolver::from_headers("Deu chegada", &headers, &ColumnAliases::default());

        let arrival = extract_arrival(&row, &resolver);
        assert_eq!(arrival.trip_id, "LT77");
        assert!(arrival.arrived_at.is_some());
        assert_eq!(arrival.origin, "RJ01");
        assert_eq!(arrival.transfer_order, "TO-1");
        assert_eq!(arrival.eta, None);
    }
}
