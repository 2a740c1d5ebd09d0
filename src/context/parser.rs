//! Keyword-anchored extraction from loosely structured markdown guidance.
//!
//! The documents are written by people, not generated, so nothing here
//! assumes a schema: a section is found by scanning for a line that mentions
//! one of its keywords, and list items are filtered by keyword.

/// Collects the content lines that follow the first line mentioning one of
/// `keywords`, stopping at the next heading.
///
/// Heading-like lines are preferred as anchors; an inline value on the anchor
/// line (`Interests: privacy, homelab`) is split on commas.
pub fn extract_section(text: &str, keywords: &[&str]) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(anchor) = find_anchor(&lines, keywords) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    if let Some(inline) = inline_value(lines[anchor]) {
        items.extend(
            inline
                .split(',')
                .map(|part| clean_item(part))
                .filter(|part| !part.is_empty()),
        );
    }

    for line in &lines[anchor + 1..] {
        let trimmed = line.trim();
        if is_heading(trimmed) {
            break;
        }
        let item = clean_item(trimmed);
        if !item.is_empty() {
            items.push(item);
        }
    }

    items
}

/// Markdown list items whose text mentions one of `keywords`. An empty
/// keyword slice keeps every list item.
pub fn extract_list_items(text: &str, keywords: &[&str]) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| is_list_line(line))
        .map(clean_item)
        .filter(|item| !item.is_empty())
        .filter(|item| {
            if keywords.is_empty() {
                return true;
            }
            let lowered = item.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword))
        })
        .collect()
}

/// Value of a `Label: value` line for the first matching label.
pub fn extract_field(text: &str, labels: &[&str]) -> Option<String> {
    for line in text.lines() {
        let cleaned = clean_item(line.trim().trim_start_matches('#'));
        let Some((label, value)) = cleaned.split_once(':') else {
            continue;
        };
        let label = label.trim().to_lowercase();
        if labels.iter().any(|candidate| label == *candidate || label.ends_with(candidate)) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn find_anchor(lines: &[&str], keywords: &[&str]) -> Option<usize> {
    let mentions = |line: &str| {
        let lowered = line.to_lowercase();
        keywords.iter().any(|keyword| lowered.contains(keyword))
    };

    lines
        .iter()
        .position(|line| is_heading_like(line.trim()) && mentions(line))
        .or_else(|| lines.iter().position(|line| mentions(line)))
}

fn inline_value(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if is_heading(trimmed) {
        return None;
    }
    let (_, value) = trimmed.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with('#')
}

fn is_heading_like(line: &str) -> bool {
    if is_heading(line) {
        return true;
    }
    let stripped = line.trim_matches('*').trim();
    (line.starts_with("**") && line.ends_with("**")) || (stripped.ends_with(':') && !is_list_line(line))
}

fn is_list_line(line: &str) -> bool {
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("+ ") {
        return true;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with(". ")
}

fn clean_item(raw: &str) -> String {
    let mut item = raw.trim();
    if is_list_line(item) {
        item = match item.find(' ') {
            Some(idx) => &item[idx + 1..],
            None => item,
        };
    }
    item.replace("**", "")
        .replace("__", "")
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVATAR: &str = "# Customer Avatar\n\n## Interests\n- Privacy tools\n- **Homelab** builds\n\n## Pain Points\n- Vendor lock-in\n- Subscription fatigue\n\n## Goals\nOwn their data\n";

    #[test]
    fn section_stops_at_next_heading() {
        let interests = extract_section(AVATAR, &["interests"]);
        assert_eq!(interests, vec!["Privacy tools", "Homelab builds"]);
    }

    #[test]
    fn section_reads_plain_lines() {
        let goals = extract_section(AVATAR, &["goals"]);
        assert_eq!(goals, vec!["Own their data"]);
    }

    #[test]
    fn inline_values_are_split_on_commas() {
        let text = "Interests: privacy, homelab, automation\n";
        let interests = extract_section(text, &["interests"]);
        assert_eq!(interests, vec!["privacy", "homelab", "automation"]);
    }

    #[test]
    fn missing_section_is_empty() {
        assert!(extract_section(AVATAR, &["budget"]).is_empty());
    }

    #[test]
    fn list_items_filter_by_keyword() {
        let text = "- Curiosity Gap: open loops\n- Scarcity: limited offers\n1. Social proof works\nplain line\n";
        let items = extract_list_items(text, &["curiosity", "social proof"]);
        assert_eq!(items, vec!["Curiosity Gap: open loops", "Social proof works"]);
    }

    #[test]
    fn field_reads_label_value() {
        let text = "## Voice\n**Tone:** direct and friendly\n";
        assert_eq!(
            extract_field(text, &["tone"]),
            Some("direct and friendly".to_string())
        );
    }
}
