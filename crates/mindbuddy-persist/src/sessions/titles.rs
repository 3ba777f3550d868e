use mindbuddy_types::Language;
use rand::seq::SliceRandom;
use rand::Rng;

/// Opening lines for a freshly created session
pub const WELCOME_MESSAGES: &[&str] = &[
    "Hey! I'm glad you're here. What's going on in your world today?",
    "Hi there! Thanks for stopping by. How are you actually doing?",
    "Hey! Nice to connect with you. What's been on your mind lately?",
    "Hi! I'm here to listen, whether you're having a rough day or just want to chat. What's up?",
    "Hey there! Good to see you. How has your day been treating you?",
    "Hi! I'm really glad you reached out. What brings you here today?",
    "Hey! Thanks for being here. I'm curious - how are you feeling right now?",
    "Hi there! I'm here for whatever you want to talk about. How are things going for you?",
];

const ANXIETY_TITLES: &[&str] = &["Anxiety chat", "Feeling anxious", "Anxiety talk", "Worried thoughts"];
const STRESS_TITLES: &[&str] = &["Stress talk", "Feeling overwhelmed", "Too much stress", "Pressure chat"];
const LOW_MOOD_TITLES: &[&str] = &["Feeling down", "Sad thoughts", "Hard day", "Low mood chat"];
const SLEEP_TITLES: &[&str] = &["Sleep troubles", "Tired thoughts", "Rest issues", "Sleep chat"];
const SCHOOL_TITLES: &[&str] = &["School stress", "Work troubles", "Academic pressure", "Job stuff"];
const GREETING_TITLES: &[&str] = &["Just saying hi", "Casual chat", "Checking in", "Random talk"];
const DEFAULT_TITLES: &[&str] = &[
    "Just chatting",
    "Random thoughts",
    "Open conversation",
    "Casual talk",
    "Daily chat",
];

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or("New conversation")
}

/// Session title derived from the first thing the user wrote
pub fn generate_title<R: Rng + ?Sized>(content: &str, rng: &mut R) -> String {
    let lower = content.to_lowercase();
    let has = |needle: &str| lower.contains(needle);
    let has_word = |word: &str| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token == word)
    };

    let options = if has("anxiety") || has("anxious") {
        ANXIETY_TITLES
    } else if has("stress") || has("overwhelm") {
        STRESS_TITLES
    } else if has("sad") || has("down") || has("depression") {
        LOW_MOOD_TITLES
    } else if has("sleep") || has("tired") {
        SLEEP_TITLES
    } else if has("school") || has("work") {
        SCHOOL_TITLES
    } else if has_word("hi") || has("hello") || has_word("hey") {
        GREETING_TITLES
    } else {
        DEFAULT_TITLES
    };

    pick(options, rng).to_string()
}

/// Reply shown when the backend cannot be reached
pub fn fallback_message(language: Language) -> &'static str {
    match language {
        Language::English => "I hear what you're saying. I'm having some connection issues right now, but I want you to know that I'm here and your feelings matter. If you're in crisis, please reach out to someone - call 988 or text HOME to 741741. What's going on?",
        Language::Hindi => "मैं आपकी बात सुन रहा हूं। अभी मुझे कुछ तकनीकी समस्या है, लेकिन आपकी भावनाएं महत्वपूर्ण हैं। यदि आप संकट में हैं, तो किसी से बात करें।",
        Language::Tamil => "நீங்கள் சொல்வதை நான் கேட்கிறேன். இப்போ எனக்கு சில தொழில்நுட்ப சிக்கல்கள் இருந்தாலும், உங்கள் உணர்வுகள் முக்கியம் என்பதை அறிந்து கொள்ளுங்கள். நெருக்கடியில் இருந்தால், மனநல நிபுணரை தொடர்பு கொள்ளுங்கள்.",
        Language::Telugu => "మీరు చెప్పేది నేను వింటున్నాను. ఇప్పుడు నాకు కొన్ని సాంకేతిక సమస్యలు ఉన్నప్పటికీ, మీ భావనలు ముఖ్యమని తెలుసుకోండి. సంక్షోభంలో ఉంటే, మానసిక ఆరోగ్య నిపుణుడిని సంప్రదించండి.",
        Language::Marathi => "तुम्ही काय सांगत आहात ते मी ऐकत आहे. आता मला काही तांत्रिक अडचणी आहेत, पण तुमच्या भावना महत्वाच्या आहेत हे जाणून घ्या. संकटात असाल तर मानसिक आरोग्य तज्ञाशी संपर्क साधा.",
    }
}
