use mindbuddy_persist::{ConversationStage, ThreadMemory};
use mindbuddy_types::Language;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::branch::{GreetingKind, PromptBranch, Selection};
use crate::classify;
use crate::templates::{self, render};

/// Short/random messages switch to playful wording from this count on
const ESCALATE_RANDOM_AT: u32 = 3;
/// Greeting counts above this are called out
const PERSISTENT_GREETING_AFTER: u32 = 3;

/// The user's message, pre-normalized once for all predicates
#[derive(Debug, Clone)]
pub struct PromptInput<'a> {
    pub text: &'a str,
    pub trimmed: &'a str,
    pub lower: String,
    pub language: Language,
}

impl<'a> PromptInput<'a> {
    pub fn new(text: &'a str, language: Language) -> Self {
        let trimmed = text.trim();
        Self {
            text,
            trimmed,
            lower: trimmed.to_lowercase(),
            language,
        }
    }
}

pub type Predicate = fn(&PromptInput<'_>, &ThreadMemory) -> bool;
pub type Builder = fn(&PromptInput<'_>, &mut ThreadMemory, &mut dyn RngCore) -> Selection;

/// One step of the cascade: when `matches` holds, `build` produces the instruction
/// and applies the step's memory updates.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: Predicate,
    pub build: Builder,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct PromptSelector {
    rules: Vec<Rule>,
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSelector {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule { name: "crisis", matches: crisis_matches, build: build_crisis },
                Rule { name: "greeting", matches: greeting_matches, build: build_greeting },
                Rule { name: "random_text", matches: short_random_matches, build: build_random_text },
                Rule { name: "gibberish", matches: gibberish_matches, build: build_gibberish },
                Rule { name: "affirmation", matches: affirmation_matches, build: build_affirmation },
                Rule { name: "farewell", matches: farewell_matches, build: build_farewell },
                Rule { name: "topic", matches: topic_matches, build: build_topic },
                Rule { name: "how_are_you", matches: how_are_you_matches, build: build_how_are_you },
                Rule { name: "default", matches: always, build: build_default },
            ],
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Pick the instruction for `text` and apply the winning rule's memory updates.
    ///
    /// Always returns a selection; with no match the default rule is used.
    pub fn select<R: RngCore>(
        &self,
        text: &str,
        language: Language,
        memory: &mut ThreadMemory,
        rng: &mut R,
    ) -> Selection {
        let input = PromptInput::new(text, language);
        let rng: &mut dyn RngCore = rng;

        let build = self
            .rules
            .iter()
            .find(|rule| (rule.matches)(&input, &*memory))
            .map(|rule| rule.build)
            .unwrap_or(build_default as Builder);

        let mut selection = build(&input, memory, rng);
        tracing::debug!(
            thread_id = %memory.thread_id,
            branch = selection.branch.name(),
            stage = ?memory.conversation_stage,
            "Selected prompt branch"
        );

        selection.instruction = finish_instruction(&selection.instruction, &input, memory);
        selection
    }
}

/// Wrap a branch body with the persona, recent replies to avoid and a language directive
fn finish_instruction(body: &str, input: &PromptInput<'_>, memory: &ThreadMemory) -> String {
    let mut out = String::with_capacity(body.len() + 256);
    out.push_str(templates::PERSONA);
    out.push_str("\n\n");
    out.push_str(body);

    if !memory.last_responses.is_empty() {
        out.push_str("\n\n");
        out.push_str(templates::AVOID_REPEATING_HEADER);
        for previous in &memory.last_responses {
            out.push_str("\n- \"");
            out.push_str(previous);
            out.push('"');
        }
    }

    if let Some(directive) = templates::language_directive(input.language) {
        out.push_str("\n\n");
        out.push_str(&directive);
    }
    out
}

fn pick<'a>(options: &[&'a str], rng: &mut dyn RngCore) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn crisis_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_crisis(&input.lower)
}

fn build_crisis(input: &PromptInput<'_>, memory: &mut ThreadMemory, _: &mut dyn RngCore) -> Selection {
    memory.advance_stage(ConversationStage::Deepening);
    Selection::new(PromptBranch::Crisis, render(templates::CRISIS_TEMPLATE, input.trimmed))
}

fn greeting_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_greeting(&input.lower)
}

fn build_greeting(input: &PromptInput<'_>, memory: &mut ThreadMemory, _: &mut dyn RngCore) -> Selection {
    memory.greeting_count += 1;

    let (kind, template) = if !memory.has_introduced {
        memory.has_introduced = true;
        (GreetingKind::Introductory, templates::GREETING_INTRODUCTORY_TEMPLATE)
    } else if memory.greeting_count > PERSISTENT_GREETING_AFTER {
        (GreetingKind::Persistent, templates::GREETING_PERSISTENT_TEMPLATE)
    } else {
        (GreetingKind::Repeated, templates::GREETING_REPEATED_TEMPLATE)
    };

    let instruction = render(template, input.trimmed).replace("<count>", &memory.greeting_count.to_string());
    Selection::new(PromptBranch::Greeting { kind }, instruction)
}

fn short_random_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_short_random(input.trimmed, &input.lower)
}

fn build_random_text(input: &PromptInput<'_>, memory: &mut ThreadMemory, _: &mut dyn RngCore) -> Selection {
    memory.random_test_count += 1;
    let escalated = memory.random_test_count >= ESCALATE_RANDOM_AT;

    let template = if escalated {
        templates::RANDOM_TEXT_ESCALATED_TEMPLATE
    } else {
        templates::RANDOM_TEXT_TEMPLATE
    };
    let instruction = render(template, input.trimmed).replace("<count>", &memory.random_test_count.to_string());
    Selection::new(PromptBranch::RandomText { escalated }, instruction)
}

fn gibberish_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_gibberish(input.trimmed, &input.lower)
}

fn build_gibberish(input: &PromptInput<'_>, memory: &mut ThreadMemory, _: &mut dyn RngCore) -> Selection {
    memory.random_test_count += 1;
    Selection::new(PromptBranch::Gibberish, render(templates::GIBBERISH_TEMPLATE, input.trimmed))
}

fn affirmation_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_affirmation(&input.lower)
}

fn build_affirmation(input: &PromptInput<'_>, memory: &mut ThreadMemory, rng: &mut dyn RngCore) -> Selection {
    memory.advance_stage(ConversationStage::Engaged);
    let instruction = render(templates::AFFIRMATION_TEMPLATE, input.trimmed)
        .replace("<angle>", pick(templates::AFFIRMATION_ANGLES, rng));
    Selection::new(PromptBranch::Affirmation, instruction)
}

fn farewell_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_farewell(&input.lower)
}

fn build_farewell(input: &PromptInput<'_>, _: &mut ThreadMemory, rng: &mut dyn RngCore) -> Selection {
    let instruction = render(templates::FAREWELL_TEMPLATE, input.trimmed)
        .replace("<angle>", pick(templates::FAREWELL_ANGLES, rng));
    Selection::new(PromptBranch::Farewell, instruction)
}

fn topic_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::detect_topic(&input.lower).is_some()
}

fn build_topic(input: &PromptInput<'_>, memory: &mut ThreadMemory, rng: &mut dyn RngCore) -> Selection {
    let Some(topic) = classify::detect_topic(&input.lower) else {
        return build_default(input, memory, rng);
    };

    let ongoing = memory.has_discussed(topic);
    memory.push_topic(topic);

    let instruction = if ongoing {
        memory.advance_stage(ConversationStage::Deepening);
        render(templates::TOPIC_ONGOING_TEMPLATE, input.trimmed)
    } else {
        memory.advance_stage(ConversationStage::Engaged);
        render(templates::TOPIC_NEW_TEMPLATE, input.trimmed)
            .replace("<guidance>", templates::topic_guidance(topic))
    };

    Selection::new(
        PromptBranch::Topic { topic, ongoing },
        instruction.replace("<topic>", topic.label()),
    )
}

fn how_are_you_matches(input: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    classify::is_how_are_you(&input.lower)
}

fn build_how_are_you(input: &PromptInput<'_>, memory: &mut ThreadMemory, _: &mut dyn RngCore) -> Selection {
    memory.advance_stage(ConversationStage::Engaged);
    Selection::new(PromptBranch::HowAreYou, render(templates::HOW_ARE_YOU_TEMPLATE, input.trimmed))
}

fn always(_: &PromptInput<'_>, _: &ThreadMemory) -> bool {
    true
}

fn build_default(input: &PromptInput<'_>, memory: &mut ThreadMemory, rng: &mut dyn RngCore) -> Selection {
    memory.advance_stage(ConversationStage::Engaged);
    let instruction = render(templates::DEFAULT_TEMPLATE, input.trimmed)
        .replace("<framing>", pick(templates::DEFAULT_FRAMINGS, rng));
    Selection::new(PromptBranch::Default, instruction)
}
