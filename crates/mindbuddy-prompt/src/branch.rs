use mindbuddy_persist::Topic;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingKind {
    /// First greeting on the thread; the bot introduces itself
    Introductory,
    Repeated,
    /// More than three greetings without saying anything else
    Persistent,
}

/// Which rule of the cascade produced an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "branch", rename_all = "snake_case")]
pub enum PromptBranch {
    Crisis,
    Greeting { kind: GreetingKind },
    RandomText { escalated: bool },
    Gibberish,
    Affirmation,
    Farewell,
    Topic { topic: Topic, ongoing: bool },
    HowAreYou,
    Default,
}

impl PromptBranch {
    pub fn name(&self) -> &'static str {
        match self {
            PromptBranch::Crisis => "crisis",
            PromptBranch::Greeting { .. } => "greeting",
            PromptBranch::RandomText { .. } => "random_text",
            PromptBranch::Gibberish => "gibberish",
            PromptBranch::Affirmation => "affirmation",
            PromptBranch::Farewell => "farewell",
            PromptBranch::Topic { .. } => "topic",
            PromptBranch::HowAreYou => "how_are_you",
            PromptBranch::Default => "default",
        }
    }

    pub fn is_crisis(&self) -> bool {
        matches!(self, PromptBranch::Crisis)
    }
}

/// Instruction text for the model plus the branch that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub branch: PromptBranch,
    pub instruction: String,
}

impl Selection {
    pub fn new(branch: PromptBranch, instruction: impl Into<String>) -> Self {
        Self {
            branch,
            instruction: instruction.into(),
        }
    }
}
