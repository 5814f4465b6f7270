//! Inbound text cleanup.

use std::sync::OnceLock;

use persona_brain::ATTACHMENT_MARKER;
use regex::Regex;

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<@!?(\d+)>").expect("valid mention pattern"))
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"##.*?##").expect("valid marker pattern"))
}

/// Remove mentions of the bot and `##...##` markers, then trim.
///
/// When the bot id is unknown every user mention is removed.
pub fn clean_content(content: &str, bot_id: Option<&str>) -> String {
    let without_mentions = mention_pattern().replace_all(content, |caps: &regex::Captures| {
        match bot_id {
            Some(id) if &caps[1] != id => caps[0].to_string(),
            _ => String::new(),
        }
    });
    marker_pattern()
        .replace_all(&without_mentions, "")
        .trim()
        .to_string()
}

/// Append one attachment marker line per URL.
pub fn with_attachment_markers(text: &str, urls: &[String]) -> String {
    urls.iter().fold(text.to_string(), |mut out, url| {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{} {}]", ATTACHMENT_MARKER, url));
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bot_mentions() {
        assert_eq!(clean_content("<@42> hello", Some("42")), "hello");
        assert_eq!(clean_content("<@!42>   hi <@42>", Some("42")), "hi");
    }

    #[test]
    fn test_keeps_other_mentions() {
        assert_eq!(
            clean_content("<@42> say hi to <@7>", Some("42")),
            "say hi to <@7>"
        );
        assert_eq!(clean_content("<@42> <@7>", None), "");
    }

    #[test]
    fn test_strips_markers() {
        assert_eq!(clean_content("<@42> ##secret## hello", Some("42")), "hello");
        assert_eq!(clean_content("##a## b ##c## ok", None), "b  ok");
        assert_eq!(clean_content("<@42> ####", Some("42")), "");
    }

    #[test]
    fn test_markers_stay_within_a_line() {
        assert_eq!(clean_content("##a\nb## ok", None), "##a\nb## ok");
        assert_eq!(
            clean_content("first ##x##\n##y\nsecond", None),
            "first \n##y\nsecond"
        );
    }

    #[test]
    fn test_attachment_markers() {
        let urls = vec!["https://cdn.example/a.png".to_string()];
        assert_eq!(
            with_attachment_markers("look", &urls),
            "look\n[attachment: https://cdn.example/a.png]"
        );
        assert_eq!(
            with_attachment_markers("", &urls),
            "[attachment: https://cdn.example/a.png]"
        );
        assert_eq!(with_attachment_markers("plain", &[]), "plain");
    }
}
