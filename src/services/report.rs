//! Montagem do texto do relatório
//!
//! `build_messages` é o núcleo puro: snapshots + "agora" + configuração
//! entram, mensagens prontas para o webhook saem. Mesma entrada, mesmo
//! texto, byte a byte.

use chrono::NaiveDateTime;

use super::classifier::{classify_yard, confirm_arrivals, Bucket, YardBoard, YardEntry};
use super::extractor::{extract_arrival, extract_shipment, FieldResolver, ARRIVALS_REQUIRED, REPORT_REQUIRED};
use super::pending::{classify_pending, PendingBoard, PendingEntry, ShiftSummary};
use super::shift_calendar::{natural_order, rotate_from_current};
use crate::config::ReportConfig;
use crate::models::{PendingCategory, Shipment, Snapshot};
use crate::utils::dates::{format_hhmm, format_hhmm_h, format_short, MISSING_DURATION};
use crate::utils::logging::log_buckets_summary;
use crate::utils::string_utils::{char_len, truncate_chars};
use crate::utils::AppResult;

pub const INTRO: &str = "Segue as LH´s com mais tempo de Pátio:";
pub const YARD_HEADER: &str = "      LT | Doca | TO | ETA | Tempo | Origem";
pub const PENDING_HEADER: &str = "      LT | Origem | Cutoff | Atraso";

const OVERDUE_FLAG: &str = "- ";
const NO_FLAG: &str = "  ";

/// Núcleo do job: classifica e devolve as mensagens (vazio = nada a reportar)
pub fn build_messages(
    report: &Snapshot,
    arrivals: Option<&Snapshot>,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> AppResult<Vec<String>> {
    let shipments: Vec<Shipment> = if report.is_empty() {
        Vec::new()
    } else {
        let resolver = FieldResolver::new(report, &config.columns);
        resolver.require(REPORT_REQUIRED)?;
        report
            .rows()
            .iter()
            .map(|row| extract_shipment(row, &resolver))
            .collect()
    };

    let mut yard = classify_yard(&shipments, now);

    if let Some(arrivals) = arrivals.filter(|s| !s.is_empty()) {
        let resolver = FieldResolver::new(arrivals, &config.columns);
        resolver.require(ARRIVALS_REQUIRED)?;
        let confirmations: Vec<_> = arrivals
            .rows()
            .iter()
            .map(|row| extract_arrival(row, &resolver))
            .collect();
        confirm_arrivals(&mut yard, &confirmations, now, config.arrival_min_minutes);
    }

    let pending = if config.include_pending {
        classify_pending(&shipments, now)
    } else {
        PendingBoard::default()
    };

    log_buckets_summary(
        yard.unloading.len(),
        yard.at_dock.len(),
        yard.queued.len(),
        yard.arrivals.len(),
        pending.len(),
    );

    Ok(render_report(&yard, &pending, now, config.overdue_minutes)
        .map(|text| split_messages(&text, config.max_message_chars))
        .unwrap_or_default())
}

/// Texto completo, ou `None` quando nenhuma seção tem linhas
pub fn render_report(
    yard: &YardBoard,
    pending: &PendingBoard,
    now: NaiveDateTime,
    overdue_minutes: i64,
) -> Option<String> {
    if yard.is_empty() && pending.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = vec![INTRO.to_string(), String::new()];

    let sections: [(&str, &Bucket); 4] = [
        ("📦 Descarregando", &yard.unloading),
        ("🚛 Em Doca", &yard.at_dock),
        ("🔴 Em Fila", &yard.queued),
        ("📢 Deu Chegada (Cobrar Monitoring)", &yard.arrivals),
    ];

    for (title, bucket) in sections {
        if bucket.is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", title, bucket.len()));
        lines.push(YARD_HEADER.to_string());
        lines.extend(bucket.entries().iter().map(|e| render_yard_line(e, overdue_minutes)));
        lines.push(String::new());
    }

    let pending_sections = [
        ("⏰ Pendentes Atrasados", PendingCategory::Late),
        ("📋 Pendentes Hoje", PendingCategory::Today),
        ("📅 Pendentes Amanhã", PendingCategory::Tomorrow),
    ];

    for (title, category) in pending_sections {
        let entries = pending.entries(category);
        if entries.is_empty() {
            continue;
        }

        lines.push(format!(
            "{}: {} LTs | {} pacotes",
            title,
            entries.len(),
            pending.package_total(category)
        ));

        let summary = pending.summary(category);
        let order = match category {
            PendingCategory::Today => rotate_from_current(&summary, now),
            _ => natural_order(&summary),
        };
        lines.extend(order.iter().map(|shift| render_summary_line(shift.label(), &summary[shift])));

        if category == PendingCategory::Late {
            lines.push(PENDING_HEADER.to_string());
            lines.extend(entries.iter().map(|e| render_pending_line(e, overdue_minutes)));
        }
        lines.push(String::new());
    }

    Some(lines.join("\n").trim_end().to_string())
}

/// `"<flag>• LT | doca | TO | ETA | tempo | origem"`
pub fn render_yard_line(entry: &YardEntry, overdue_minutes: i64) -> String {
    let flag = match entry.elapsed {
        Some(minutes) if minutes >= overdue_minutes => OVERDUE_FLAG,
        _ => NO_FLAG,
    };
    let time = entry
        .elapsed
        .map(format_hhmm)
        .unwrap_or_else(|| MISSING_DURATION.to_string());

    format!(
        "{}• {} | {} | {} | {} | {} | {}",
        flag,
        entry.trip_id,
        entry.dock,
        entry.transfer_order,
        format_short(entry.eta),
        time,
        entry.origin
    )
}

fn render_pending_line(entry: &PendingEntry, overdue_minutes: i64) -> String {
    let flag = if entry.overdue_minutes >= overdue_minutes {
        OVERDUE_FLAG
    } else {
        NO_FLAG
    };

    format!(
        "{}• {} | {} | {} | {}",
        flag,
        entry.trip_id,
        entry.origin,
        format_short(Some(entry.due)),
        format_hhmm_h(entry.overdue_minutes)
    )
}

fn render_summary_line(label: &str, summary: &ShiftSummary) -> String {
    format!("   {}: {} LTs | {} pacotes", label, summary.count, summary.package_total)
}

/// Quebra o texto em partes de até `max_chars` caracteres
///
/// O corte é na última quebra de linha antes do limite (uma linha maior
/// que o limite é cortada à força). Com mais de uma parte, cada uma recebe
/// o prefixo "(i/total)", contado dentro do limite. Se nem o prefixo cabe,
/// as partes saem sem ele.
pub fn split_messages(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    // O rótulo cresce com o total de partes, que depende do espaço que sobra
    let mut reserve = label_width(1);
    loop {
        if reserve >= max_chars {
            return split_lines(text, max_chars.max(1));
        }

        let chunks = split_lines(text, max_chars - reserve);
        let needed = label_width(chunks.len());
        if needed > reserve {
            reserve = needed;
            continue;
        }

        let total = chunks.len();
        if total <= 1 {
            return chunks;
        }

        return chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| format!("({}/{})\n{}", i + 1, total, chunk))
            .collect();
    }
}

/// Largura do maior rótulo "(total/total)\n"
fn label_width(total: usize) -> usize {
    char_len(&format!("({0}/{0})\n", total))
}

fn split_lines(text: &str, budget: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut rest = text;

    loop {
        rest = rest.trim_start_matches('\n');
        if rest.is_empty() {
            break;
        }
        if char_len(rest) <= budget {
            chunks.push(rest.trim_end().to_string());
            break;
        }

        let window = truncate_chars(rest, budget);
        let limit = window.len();
        let cut = if rest[limit..].starts_with('\n') {
            Some(limit)
        } else {
            window.rfind('\n')
        };

        match cut {
            Some(idx) => {
                chunks.push(rest[..idx].trim_end().to_string());
                rest = &rest[idx + 1..];
            }
            None => {
                chunks.push(window.to_string());
                rest = &rest[limit..];
            }
        }
    }

    chunks
}
