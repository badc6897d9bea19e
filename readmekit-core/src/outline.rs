//! Heading outline of an assembled README

/// A heading in the assembled document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub line: usize,
    pub anchor: String,
}

/// Extract ATX and Setext headings, skipping fenced code blocks
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut headings = Vec::new();
    let mut fence: Option<char> = None;

    let mut line_idx = 0;
    while line_idx < lines.len() {
        let trimmed = lines[line_idx].trim_end();

        if let Some(marker) = parse_fence(trimmed) {
            match fence {
                None => fence = Some(marker),
                Some(open) if open == marker => fence = None,
                Some(_) => {}
            }
            line_idx += 1;
            continue;
        }
        if fence.is_some() {
            line_idx += 1;
            continue;
        }

        if let Some(level) = parse_atx_heading(trimmed) {
            let text = trimmed.trim_start()[level..].trim().to_string();
            headings.push(Heading {
                level: level as u8,
                anchor: make_anchor(&text),
                text,
                line: line_idx,
            });
        } else if line_idx + 1 < lines.len() && !trimmed.trim().is_empty() {
            if let Some(level) = parse_setext_underline(lines[line_idx + 1]) {
                let text = trimmed.trim().to_string();
                headings.push(Heading {
                    level,
                    anchor: make_anchor(&text),
                    text,
                    line: line_idx,
                });

                // Skip the underline
                line_idx += 1;
            }
        }

        line_idx += 1;
    }

    headings
}

/// Opening or closing code fence marker
fn parse_fence(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

/// Parse ATX heading (returns level if valid, None otherwise)
fn parse_atx_heading(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('#') {
        return None;
    }

    let hash_count = trimmed.chars().take_while(|&c| c == '#').count();
    if hash_count > 6 {
        return None;
    }

    // Must be followed by whitespace or be at end
    let rest = &trimmed[hash_count..];
    if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace()) {
        Some(hash_count)
    } else {
        None
    }
}

/// Parse Setext heading underline (returns level if valid)
fn parse_setext_underline(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    let first_char = trimmed.chars().next()?;
    if first_char == '=' && trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if first_char == '-' && trimmed.len() > 1 && trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// GitHub-style anchor slug
fn make_anchor(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}
