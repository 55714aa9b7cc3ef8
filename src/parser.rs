use crate::models::TaskPriority;
use regex::Regex;

#[derive(Debug, PartialEq)]
pub struct ParsedTask {
    pub title: String,
    pub priority: Option<TaskPriority>,
    pub tags: Vec<String>,
}

fn priority_from_digit(digit: u8) -> Option<TaskPriority> {
    match digit {
        1 => Some(TaskPriority::Low),
        2 => Some(TaskPriority::Medium),
        3 => Some(TaskPriority::High),
        4 => Some(TaskPriority::Urgent),
        _ => None,
    }
}

/// Quick-add syntax: `!1`..`!4` set the priority (first valid marker wins,
/// out-of-range markers are stripped but ignored), `#word` collects a tag,
/// everything else becomes the title with whitespace normalized.
pub fn parse_task_input(input: &str) -> ParsedTask {
    let priority_re = Regex::new(r"!(\d+)\s*").unwrap();
    let tag_re = Regex::new(r"#([\w/-]+)\s*").unwrap();

    let mut priority = None;

    // Priority
    for caps in priority_re.captures_iter(input) {
        if let Some(priority_match) = caps.get(1) {
            if let Ok(p) = priority_match.as_str().parse::<u8>() {
                if priority.is_none() {
                    priority = priority_from_digit(p);
                }
            }
        }
    }

    // Tags, in the order written
    let mut tags = Vec::new();
    for caps in tag_re.captures_iter(input) {
        if let Some(tag_match) = caps.get(1) {
            let tag = tag_match.as_str().to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    let title = priority_re.replace_all(input, "").to_string();
    let title = tag_re.replace_all(&title, "").to_string();

    let title = Regex::new(r"\s+")
        .unwrap()
        .replace_all(&title, " ")
        .trim()
        .to_string();

    ParsedTask {
        title,
        priority,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_priority_in_middle() {
        let input = "Update !3 software documentation";
        let expected = ParsedTask {
            title: "Update software documentation".to_string(),
            priority: Some(TaskPriority::High),
            tags: vec![],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_extra_spaces_after_priority() {
        let input = "Fix bugs !2    in the code";
        let expected = ParsedTask {
            title: "Fix bugs in the code".to_string(),
            priority: Some(TaskPriority::Medium),
            tags: vec![],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_tags() {
        let input = "Implement auth #backend #security !4";
        let expected = ParsedTask {
            title: "Implement auth".to_string(),
            priority: Some(TaskPriority::Urgent),
            tags: vec!["backend".to_string(), "security".to_string()],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_duplicate_tags() {
        let input = "Review designs #design #design";
        let result = parse_task_input(input);
        assert_eq!(result.tags, vec!["design".to_string()]);
    }

    #[test]
    fn test_parse_with_priority_at_start_no_space() {
        let input = "!2Prepare presentation slides";
        let expected = ParsedTask {
            title: "Prepare presentation slides".to_string(),
            priority: Some(TaskPriority::Medium),
            tags: vec![],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_multiple_priorities_first_wins() {
        let input = "  !1  !4 Organize    team building !3 event ";
        let expected = ParsedTask {
            title: "Organize team building event".to_string(),
            priority: Some(TaskPriority::Low),
            tags: vec![],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_invalid_priority() {
        let input = "Check logs !8    immediately";
        let expected = ParsedTask {
            title: "Check logs immediately".to_string(),
            priority: None,
            tags: vec![],
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_plain_title_passes_through() {
        let input = "Ship the release";
        let result = parse_task_input(input);
        assert_eq!(result.title, "Ship the release");
        assert_eq!(result.priority, None);
        assert!(result.tags.is_empty());
    }
}
