//! Snapshot tabular lido da planilha
//!
//! A primeira linha é o cabeçalho. Cabeçalhos repetidos ou em branco são
//! comuns (colunas copiadas, colunas auxiliares), então cada um recebe um
//! nome único e continua endereçável.

use std::collections::HashSet;

/// Uma linha da planilha: associação ordenada cabeçalho → célula
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Atalho para testes e fontes em memória
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(h, v)| (h.trim().to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Célula pelo cabeçalho exato (já aparado)
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Cabeçalhos na ordem da planilha
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

/// Conteúdo de uma aba: cabeçalhos únicos + linhas de dados
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    sheet: String,
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl Snapshot {
    /// Monta a partir da matriz crua (`values` da API do Sheets)
    ///
    /// Linhas mais curtas que o cabeçalho são completadas com vazio (a API
    /// omite células finais em branco); células além do cabeçalho são
    /// descartadas. Linhas totalmente vazias são puladas.
    pub fn from_values(sheet: impl Into<String>, values: Vec<Vec<String>>) -> Self {
        let sheet = sheet.into();
        let mut iter = values.into_iter();

        let headers = match iter.next() {
            Some(raw_headers) => unique_headers(&raw_headers),
            None => {
                return Self {
                    sheet,
                    headers: Vec::new(),
                    rows: Vec::new(),
                }
            }
        };

        let rows = iter
            .map(|cells| {
                let mut cells = cells.into_iter();
                RawRow::new(
                    headers
                        .iter()
                        .map(|h| (h.clone(), cells.next().unwrap_or_default()))
                        .collect(),
                )
            })
            .filter(|row| !row.is_blank())
            .collect();

        Self { sheet, headers, rows }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Sem linhas de dados (só cabeçalho ou nada)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apara cabeçalhos, nomeia os vazios como `col_<n>` e sufixa repetidos
/// (`Doca`, `Doca_2`, `Doca_3`)
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("col_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }

        seen.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
