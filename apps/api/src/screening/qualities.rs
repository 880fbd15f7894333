/// Turns free-text qualities (one per line) into a bulleted list for the prompt.
/// Falls back to the trimmed input when it has no non-blank lines.
pub fn normalize_qualities(raw: &str) -> String {
    let bullets: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("- {line}"))
        .collect();

    if bullets.is_empty() {
        raw.trim().to_string()
    } else {
        bullets.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_become_bullets() {
        let raw = "  Rust experience \n\nDistributed systems\r\n  \nMentoring";
        assert_eq!(
            normalize_qualities(raw),
            "- Rust experience\n- Distributed systems\n- Mentoring"
        );
    }

    #[test]
    fn test_single_line() {
        assert_eq!(normalize_qualities("Kubernetes"), "- Kubernetes");
    }

    #[test]
    fn test_blank_input_is_trimmed() {
        assert_eq!(normalize_qualities(" \n \n"), "");
    }
}
