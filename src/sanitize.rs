/// Characters not allowed in file or directory names on common filesystems.
const RESERVED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maps an entity name to a lowercase folder name.
///
/// Reserved characters become `_`, every run of whitespace and `_` collapses into a
/// single `_`, and leading/trailing `_` are trimmed before lowercasing.
/// Returns an empty string when nothing but reserved characters and whitespace was given.
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced = name.replace(RESERVED, "_");

    let mut collapsed = String::with_capacity(replaced.len());
    let mut in_run = false;
    for ch in replaced.chars() {
        if ch == '_' || ch.is_whitespace() {
            if !in_run {
                collapsed.push('_');
            }
            in_run = true;
        } else {
            collapsed.push(ch);
            in_run = false;
        }
    }

    collapsed.trim_matches('_').to_lowercase()
}
