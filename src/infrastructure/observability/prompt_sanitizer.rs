const MAX_VISIBLE_CHARS: usize = 100;
const REDACTED: &str = "[REDACTED]";

const SECRET_ASSIGNMENTS: [&str; 4] = ["api_key=", "password=", "secret=", "token="];
/// Bare OpenAI-compatible keys (Groq keys start with `gsk_`).
const KEY_PREFIXES: [&str; 2] = ["gsk_", "sk-"];

/// Shortens provider text (transcripts, model output) for logging and masks
/// anything that looks like a credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    if total <= MAX_VISIBLE_CHARS {
        return redact_secrets(trimmed);
    }
    let visible: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
    format!("{}... ({} chars total)", redact_secrets(&visible), total)
}

fn redact_secrets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_bearer = false;

    for piece in text.split_inclusive(char::is_whitespace) {
        let word = piece.trim_end_matches(char::is_whitespace);
        let gap = &piece[word.len()..];
        if word.is_empty() {
            out.push_str(gap);
            continue;
        }
        if after_bearer {
            out.push_str(REDACTED);
        } else {
            out.push_str(&redact_word(word));
        }
        out.push_str(gap);
        after_bearer = word == "Bearer";
    }
    out
}

fn redact_word(word: &str) -> String {
    if KEY_PREFIXES.iter().any(|prefix| word.starts_with(prefix)) {
        return REDACTED.to_string();
    }

    let mut word = word.to_string();
    for key in SECRET_ASSIGNMENTS {
        let mut from = 0;
        while let Some(offset) = word[from..].find(key) {
            let value_start = from + offset + key.len();
            let value_end = word[value_start..]
                .find(['&', '"', '\''])
                .map_or(word.len(), |i| value_start + i);
            word.replace_range(value_start..value_end, REDACTED);
            from = value_start + REDACTED.len();
        }
    }
    word
}
