/// Utilitários para manipulação segura de strings UTF-8
///
/// Os limites do webhook são em caracteres, e o relatório usa emojis,
/// então todo corte aqui é feito por caractere e nunca por byte.

/// Índice em bytes do fim dos primeiros `max_chars` caracteres
///
/// # Exemplo
/// ```
/// use patio_report::utils::string_utils::byte_index_for_chars;
///
/// assert_eq!(byte_index_for_chars("Olá", 2), 2);
/// assert_eq!(byte_index_for_chars("Olá", 3), 4);
/// ```
pub fn byte_index_for_chars(s: &str, max_chars: usize) -> usize {
    s.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Trunca em `max_chars` caracteres sem cortar um caractere no meio
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    &s[..byte_index_for_chars(s, max_chars)]
}

/// Quantidade de caracteres (não bytes)
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
