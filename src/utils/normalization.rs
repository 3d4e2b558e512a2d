//! Normalização dos valores soltos da planilha
//!
//! Status, docas e quantidades chegam como texto livre digitado por
//! operadores diferentes. Aqui tudo vira uma forma canônica; nada neste
//! módulo falha, valores ruins caem no padrão ("--", 0, vazio).

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Placeholder exibido quando um campo textual está vazio
pub const PLACEHOLDER: &str = "--";

/// Valores que as planilhas/exports usam para "sem valor"
const SENTINELS: &[&str] = &["", "nat", "nan", "none", "null", "--", "-"];

/// Sinônimos aplicados depois de remover acentos e baixar a caixa.
/// A ordem importa: o primeiro termo que casar é substituído.
const STATUS_SYNONYMS: &[(&str, &str)] = &[
    ("descarregamento", "descarregando"),
    ("em descarga", "descarregando"),
    ("aguardando doca", "em fila"),
    ("na doca", "em doca"),
    ("finalizada", "finalizado"),
];

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").unwrap());
static THOUSANDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").unwrap());

/// Remove acentos (NFKD), baixa a caixa e colapsa espaços
///
/// # Exemplos
/// ```
/// use patio_report::utils::normalization::normalize_text;
///
/// assert_eq!(normalize_text("  Pendente   Recepção "), "pendente recepcao");
/// ```
pub fn normalize_text(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Verdadeiro para células vazias ou marcadores de ausência ("NaT", "--", ...)
pub fn is_sentinel(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    SENTINELS.contains(&lowered.as_str())
}

/// Normaliza o status para casamento por substring
///
/// "pendente recepcao" e "pendente de chegada" continuam distintos;
/// ambos só compartilham o termo "pendente".
pub fn normalize_status(raw: &str) -> String {
    let mut status = normalize_text(raw);
    for (from, to) in STATUS_SYNONYMS {
        if status.contains(from) {
            status = status.replace(from, to);
        }
    }
    status
}

/// Extrai o último grupo de dígitos da doca; sem dígitos no fim vira "--"
///
/// # Exemplos
/// ```
/// use patio_report::utils::normalization::padronizar_doca;
///
/// assert_eq!(padronizar_doca("Doca 07"), "07");
/// assert_eq!(padronizar_doca("N/A"), "--");
/// ```
pub fn padronizar_doca(raw: &str) -> String {
    TRAILING_DIGITS
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Texto aparado ou "--" quando vazio/sentinela
pub fn text_or_placeholder(raw: &str) -> String {
    if is_sentinel(raw) {
        PLACEHOLDER.to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Quantidade de pacotes, com melhor esforço
///
/// Aceita "12", "12.0", "1.234" (milhar pt-BR) e "12,5" (truncado).
/// Qualquer coisa não numérica ou negativa vira 0.
pub fn parse_package_count(raw: &str) -> u32 {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if is_sentinel(&compact) {
        return 0;
    }

    let numeric = if THOUSANDS.is_match(&compact) {
        compact.replace('.', "")
    } else {
        compact.replace(',', ".")
    };

    match numeric.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}
