/// Lowercase, accent-free, whitespace-collapsed form used to compare headers and names.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace('\u{a0}', " ");
    let unquoted = cleaned.trim().trim_matches('"');
    let collapsed = unquoted.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase().chars().map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
