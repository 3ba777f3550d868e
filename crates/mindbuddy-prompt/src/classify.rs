//! Keyword predicates over lower-cased user text.
//!
//! Multi-word phrases are matched as substrings. Short single words ("hi", "ok",
//! "bye") are matched as whole tokens so they don't fire inside longer words.

use mindbuddy_persist::Topic;

pub const CRISIS_PHRASES: &[&str] = &[
    "kill myself",
    "killing myself",
    "suicide",
    "suicidal",
    "end my life",
    "ending my life",
    "end it all",
    "want to die",
    "wanna die",
    "hurt myself",
    "hurting myself",
    "self harm",
    "self-harm",
    "cut myself",
    "cutting myself",
    "no reason to live",
    "better off dead",
    "take my own life",
];

pub const GREETING_WORDS: &[&str] = &[
    "hi", "hii", "hiii", "hello", "helo", "hey", "heya", "hiya", "yo", "sup", "howdy", "hola",
    "namaste",
];

pub const GREETING_PHRASES: &[&str] = &[
    "good morning",
    "good afternoon",
    "good evening",
    "what's up",
    "whats up",
];

/// Greetings longer than this are treated as real messages that happen to start with "hi"
const MAX_GREETING_WORDS: usize = 4;

pub const AFFIRMATIONS: &[&str] = &[
    "good", "fine", "ok", "okay", "k", "kk", "alright", "nothing", "nm", "nmu", "cool", "yeah",
    "yes", "yep", "sure", "idk", "meh", "same", "nah", "no", "nope", "great", "whatever",
];

pub const FAREWELL_WORDS: &[&str] = &["bye", "byee", "goodbye", "cya", "gn", "goodnight", "ttyl"];

pub const FAREWELL_PHRASES: &[&str] = &[
    "see you",
    "see ya",
    "good night",
    "gotta go",
    "got to go",
    "talk later",
    "talk to you later",
    "take care",
];

pub const HOW_ARE_YOU_PHRASES: &[&str] = &[
    "how are you",
    "how are u",
    "how r u",
    "how r you",
    "how about you",
    "how you doing",
    "how're you",
    "how have you been",
    "how's it going",
    "hows it going",
    "hbu",
    "wbu",
];

const ANXIETY_KEYWORDS: &[&str] = &[
    "anxiety", "anxious", "stress", "overwhelm", "panic", "worried", "worry", "nervous",
];
const SADNESS_KEYWORDS: &[&str] = &[
    "sad", "depress", "lonely", "alone", "hopeless", "crying", "cried", "miserable", "unhappy",
    "heartbroken",
];
const SADNESS_PHRASES: &[&str] = &["feeling down", "feel down", "feeling low", "feel low"];
const SLEEP_KEYWORDS: &[&str] = &["sleep", "insomnia", "tired", "exhaust", "nightmare", "awake"];
const SCHOOL_WORK_KEYWORDS: &[&str] = &[
    "school", "exam", "study", "studying", "homework", "college", "class", "grade", "work",
    "job", "boss", "deadline", "office", "assignment",
];

const KEYBOARD_RUNS: &[&str] = &["asdf", "sdfg", "qwer", "wert", "zxcv", "hjkl", "jkl", "uiop"];

/// Lower-case alphanumeric tokens (apostrophes kept)
pub fn tokens(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect()
}

fn has_token(lower: &str, words: &[&str]) -> bool {
    tokens(lower).iter().any(|t| words.contains(t))
}

fn has_phrase(lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| lower.contains(p))
}

fn has_token_prefix(lower: &str, stems: &[&str]) -> bool {
    tokens(lower)
        .iter()
        .any(|t| stems.iter().any(|stem| t.starts_with(stem)))
}

pub fn is_crisis(lower: &str) -> bool {
    has_phrase(lower, CRISIS_PHRASES)
}

/// Greeting terms match whole tokens, not substrings, so "this" or "they" never
/// count as "hi"/"hey". Messages longer than a few words carry more than a
/// greeting and fall through to the later rules.
pub fn is_greeting(lower: &str) -> bool {
    let words = tokens(lower);
    if words.is_empty() || words.len() > MAX_GREETING_WORDS {
        return false;
    }
    words.iter().any(|t| GREETING_WORDS.contains(t)) || has_phrase(lower, GREETING_PHRASES)
}

/// Entire message is a single filler word such as "ok" or "fine"
pub fn is_affirmation(lower: &str) -> bool {
    match tokens(lower).as_slice() {
        [word] => AFFIRMATIONS.contains(word),
        _ => false,
    }
}

pub fn is_farewell(lower: &str) -> bool {
    has_token(lower, FAREWELL_WORDS) || has_phrase(lower, FAREWELL_PHRASES)
}

pub fn is_how_are_you(lower: &str) -> bool {
    has_phrase(lower, HOW_ARE_YOU_PHRASES)
}

pub fn detect_topic(lower: &str) -> Option<Topic> {
    if has_token_prefix(lower, ANXIETY_KEYWORDS) {
        Some(Topic::Anxiety)
    } else if has_token_prefix(lower, SADNESS_KEYWORDS) || has_phrase(lower, SADNESS_PHRASES) {
        Some(Topic::Sadness)
    } else if has_token_prefix(lower, SLEEP_KEYWORDS) {
        Some(Topic::Sleep)
    } else if has_token_prefix(lower, SCHOOL_WORK_KEYWORDS) {
        Some(Topic::SchoolWork)
    } else {
        None
    }
}

/// Anything a later rule would recognise
pub fn is_known_keyword(lower: &str) -> bool {
    has_token(lower, GREETING_WORDS)
        || is_affirmation(lower)
        || is_farewell(lower)
        || is_how_are_you(lower)
        || detect_topic(lower).is_some()
}

/// Fewer than 4 characters, or 1-3 lowercase letters, and not a known word
pub fn is_short_random(trimmed: &str, lower: &str) -> bool {
    let char_count = trimmed.chars().count();
    let few_letters = (1..=3).contains(&char_count) && trimmed.chars().all(|c| c.is_ascii_lowercase());
    (char_count < 4 || few_letters) && !is_known_keyword(lower)
}

/// A single longer run of lowercase letters that reads like keyboard mashing.
///
/// Ordinary unrecognised words ("thanks", "anyway") do not qualify; they reach
/// the default rule instead of being answered as a keyboard smash.
pub fn is_gibberish(trimmed: &str, lower: &str) -> bool {
    if trimmed.chars().count() < 4 || !trimmed.chars().all(|c| c.is_ascii_lowercase()) {
        return false;
    }
    if is_known_keyword(lower) {
        return false;
    }
    looks_mashed(trimmed)
}

fn looks_mashed(word: &str) -> bool {
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let chars: Vec<char> = word.chars().collect();

    let no_vowels = !chars.iter().any(|c| is_vowel(*c));

    let mut longest_consonants = 0;
    let mut run = 0;
    for c in &chars {
        if is_vowel(*c) {
            run = 0;
        } else {
            run += 1;
            longest_consonants = longest_consonants.max(run);
        }
    }

    let repeated = chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]);
    let keyboard = KEYBOARD_RUNS.iter().any(|k| word.contains(k));

    no_vowels || longest_consonants >= 5 || repeated || keyboard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_phrases() {
        assert!(is_crisis("i want to kill myself"));
        assert!(is_crisis("sometimes i think about suicide"));
        assert!(!is_crisis("this exam is killing me"));
    }

    #[test]
    fn test_greeting_is_whole_word_and_short() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("hey there!"));
        assert!(is_greeting("good morning buddy"));
        assert!(!is_greeting("this is hard"));
        assert!(!is_greeting("hey so i've been really stressed about work"));
    }

    #[test]
    fn test_affirmation_needs_single_word() {
        assert!(is_affirmation("ok"));
        assert!(is_affirmation("fine."));
        assert!(!is_affirmation("fine i guess"));
    }

    #[test]
    fn test_farewell() {
        assert!(is_farewell("ok bye"));
        assert!(is_farewell("gotta go now"));
        assert!(!is_farewell("maybe"));
    }

    #[test]
    fn test_topics() {
        assert_eq!(detect_topic("i'm so stressed"), Some(Topic::Anxiety));
        assert_eq!(detect_topic("feeling down lately"), Some(Topic::Sadness));
        assert_eq!(detect_topic("i can't sleep"), Some(Topic::Sleep));
        assert_eq!(detect_topic("my boss yelled at me"), Some(Topic::SchoolWork));
        assert_eq!(detect_topic("i like pizza"), None);
    }

    #[test]
    fn test_short_random() {
        assert!(is_short_random("a", "a"));
        assert!(is_short_random("?!", "?!"));
        assert!(is_short_random("xz", "xz"));
        assert!(!is_short_random("ok", "ok"));
        assert!(!is_short_random("sad", "sad"));
        assert!(!is_short_random("what now", "what now"));
    }

    #[test]
    fn test_gibberish() {
        assert!(is_gibberish("asdfgh", "asdfgh"));
        assert!(is_gibberish("xkcdtrpq", "xkcdtrpq"));
        assert!(is_gibberish("aaaaah", "aaaaah"));
        assert!(!is_gibberish("thanks", "thanks"));
        assert!(!is_gibberish("anyway", "anyway"));
        assert!(!is_gibberish("hello there", "hello there"));
    }
}
