use mindbuddy_persist::{fallback_message, Topic};
use mindbuddy_prompt::{GreetingKind, PromptBranch};
use mindbuddy_types::Language;
use rand::seq::SliceRandom;
use rand::Rng;

const CRISIS_REPLY: &str = "I'm really worried about what you just shared, and I'm so glad you told me. \
Please reach out right now: call or text 988 (Suicide & Crisis Lifeline, 24/7) or text HOME to 741741. \
Is there someone you trust who can be with you right now?";

const RATE_LIMIT_NOTE: &str =
    "(Heads up: I've hit my usage limit for the moment, so my replies may be a bit simpler for now.)";

const INTRO_REPLIES: &[&str] = &[
    "Hey! I'm MindBuddy, someone you can talk to about anything on your mind. How are you doing today?",
    "Hi! I'm MindBuddy. Think of me as a friend who's always up for a chat. What's going on with you?",
];

const REPEATED_GREETING_REPLIES: &[&str] = &[
    "Hey again! What's on your mind?",
    "Hi hi! So, what's going on with you today?",
    "Hello again! How's everything going?",
];

const PERSISTENT_GREETING_REPLIES: &[&str] = &[
    "Ha, that's a lot of hellos! Is there something on your mind you're not sure how to bring up?",
    "Hi again! I'm noticing lots of greetings. Whatever it is, you can just say it here.",
];

const RANDOM_TEXT_REPLIES: &[&str] = &[
    "Hmm, not sure what that means! What's on your mind?",
    "Was that a test? I'm here. What would you like to talk about?",
];

const ESCALATED_RANDOM_REPLIES: &[&str] = &[
    "Okay, I'm starting to think you're testing me! I'm here though. What's one thing on your mind today?",
    "Lots of mystery messages! No pressure at all, but how are you actually feeling right now?",
];

const GIBBERISH_REPLIES: &[&str] = &[
    "Did a cat just walk across your keyboard? What's up?",
    "That looks like a keyboard smash! Rough day, or just playing around?",
];

const AFFIRMATION_REPLIES: &[&str] = &[
    "Just okay? I'm curious what's really been going on today.",
    "Got it. Anything on your mind, even something small?",
    "Fair enough! What was the best part of your day, and the hardest?",
];

const FAREWELL_REPLIES: &[&str] = &[
    "Take care! I'm here whenever you want to talk.",
    "Bye for now. Look after yourself!",
    "See you! Come back any time.",
];

const HOW_ARE_YOU_REPLIES: &[&str] = &[
    "I'm doing well, thanks for asking! How about you, how are you really doing?",
    "I'm good, and glad you're here! How's your day been?",
];

const DEFAULT_REPLIES: &[&str] = &[
    "I hear you. Tell me more about what's been going on?",
    "That sounds like a lot. How are you feeling about it?",
    "Thanks for sharing that with me. What's been on your mind the most?",
];

fn topic_replies(topic: Topic, ongoing: bool) -> &'static [&'static str] {
    if ongoing {
        return &[
            "This seems to keep coming up for you. What feels hardest about it right now?",
            "Sounds like this has been weighing on you for a while. Has anything changed since we last talked about it?",
        ];
    }
    match topic {
        Topic::Anxiety => &[
            "That sounds really stressful. Want to tell me what's been making you feel this way?",
            "Anxiety can feel so heavy. Try one slow breath with me, then tell me what's going on?",
        ],
        Topic::Sadness => &[
            "I'm sorry you're feeling down. I'm here. What's been going on?",
            "That sounds really hard. Do you want to talk about what's been making you sad?",
        ],
        Topic::Sleep => &[
            "Sleep troubles are exhausting. What's been keeping you up?",
            "Not sleeping well wears you down. Is something on your mind at night?",
        ],
        Topic::SchoolWork => &[
            "School and work stuff can pile up fast. What part is weighing on you the most?",
            "That sounds like a lot of pressure. What's been the toughest part?",
        ],
    }
}

/// Canned reply for a branch, used when the model can't be reached.
///
/// Non-English conversations get the localized connection-trouble line instead.
pub fn fallback_reply<R: Rng + ?Sized>(branch: &PromptBranch, language: Language, rng: &mut R) -> String {
    if branch.is_crisis() {
        return CRISIS_REPLY.to_string();
    }
    if language != Language::English {
        return fallback_message(language).to_string();
    }

    let options: &[&str] = match branch {
        PromptBranch::Crisis => &[CRISIS_REPLY],
        PromptBranch::Greeting { kind: GreetingKind::Introductory } => INTRO_REPLIES,
        PromptBranch::Greeting { kind: GreetingKind::Repeated } => REPEATED_GREETING_REPLIES,
        PromptBranch::Greeting { kind: GreetingKind::Persistent } => PERSISTENT_GREETING_REPLIES,
        PromptBranch::RandomText { escalated: false } => RANDOM_TEXT_REPLIES,
        PromptBranch::RandomText { escalated: true } => ESCALATED_RANDOM_REPLIES,
        PromptBranch::Gibberish => GIBBERISH_REPLIES,
        PromptBranch::Affirmation => AFFIRMATION_REPLIES,
        PromptBranch::Farewell => FAREWELL_REPLIES,
        PromptBranch::Topic { topic, ongoing } => topic_replies(*topic, *ongoing),
        PromptBranch::HowAreYou => HOW_ARE_YOU_REPLIES,
        PromptBranch::Default => DEFAULT_REPLIES,
    };

    options
        .choose(rng)
        .copied()
        .unwrap_or_else(|| fallback_message(Language::English))
        .to_string()
}

/// Prefix a canned reply with a rate-limit notice so a quota failure is never silent.
///
/// Localized fallback lines already say the connection had trouble, so they are left alone.
pub fn with_rate_limit_note(reply: String, language: Language) -> String {
    if language != Language::English {
        return reply;
    }
    format!("{} {}", RATE_LIMIT_NOTE, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_crisis_fallback_has_resources_in_every_language() {
        let mut rng = StdRng::seed_from_u64(0);
        for language in Language::ALL {
            let reply = fallback_reply(&PromptBranch::Crisis, language, &mut rng);
            assert!(reply.contains("988"));
            assert!(reply.contains("741741"));
        }
    }

    #[test]
    fn test_branch_specific_reply() {
        let mut rng = StdRng::seed_from_u64(0);
        let reply = fallback_reply(&PromptBranch::Gibberish, Language::English, &mut rng);
        assert!(GIBBERISH_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn test_non_english_uses_localized_line() {
        let mut rng = StdRng::seed_from_u64(0);
        let reply = fallback_reply(&PromptBranch::Default, Language::Marathi, &mut rng);
        assert_eq!(reply, fallback_message(Language::Marathi));
    }

    #[test]
    fn test_rate_limit_note_keeps_branch_reply() {
        let mut rng = StdRng::seed_from_u64(0);
        let reply = fallback_reply(&PromptBranch::Crisis, Language::English, &mut rng);
        let noted = with_rate_limit_note(reply, Language::English);

        assert!(noted.contains("usage limit"));
        assert!(noted.contains("988"));
        assert!(noted.contains("741741"));
    }

    #[test]
    fn test_rate_limit_note_skips_localized_line() {
        let reply = fallback_message(Language::Hindi).to_string();
        assert_eq!(with_rate_limit_note(reply.clone(), Language::Hindi), reply);
    }
}
