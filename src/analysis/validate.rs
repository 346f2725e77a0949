use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const MAX_SENTENCES: usize = 2;
const MAX_CHARS: usize = 300;

/// Phrasings that give the reply away as automated.
static AI_DISCLOSURE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)as an ai",
        r"(?i)i'm an? (automated|ai)",
        r"(?i)automated (system|reply|response)",
        r"(?i)this (automated|ai)",
        r"(?i)artificial intelligence",
        r"(?i)je suis une? (robot|bot|ia)",
        r"(?i)أنا (روبوت|بوت)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Why a reply cannot be posted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AiReference,
    TooManySentences,
    Link,
    Hashtag,
    TooLong,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::AiReference => "contains AI/automation reference",
            Rejection::TooManySentences => "too many sentences",
            Rejection::Link => "contains link",
            Rejection::Hashtag => "contains hashtag",
            Rejection::TooLong => "exceeds character limit",
        })
    }
}

/// Check a candidate reply. Rules are tried in a fixed order and the first
/// failing one is reported.
pub fn validate_reply(reply: &str) -> Result<(), Rejection> {
    if AI_DISCLOSURE.iter().any(|re| re.is_match(reply)) {
        return Err(Rejection::AiReference);
    }

    let sentences = reply
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    if sentences > MAX_SENTENCES {
        return Err(Rejection::TooManySentences);
    }

    let lowered = reply.to_lowercase();
    if lowered.contains("http") || lowered.contains("www.") {
        return Err(Rejection::Link);
    }

    if reply.contains('#') {
        return Err(Rejection::Hashtag);
    }

    if reply.chars().count() > MAX_CHARS {
        return Err(Rejection::TooLong);
    }

    Ok(())
}
