use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Only the most recent topics are kept for repetition checks
pub const MAX_TRACKED_TOPICS: usize = 10;

const FINGERPRINT_CHARS: usize = 60;

/// Where a conversation is. Ordered, and only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    #[default]
    Initial,
    Engaged,
    Deepening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Anxiety,
    Sadness,
    Sleep,
    SchoolWork,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Anxiety => "anxiety and stress",
            Topic::Sadness => "feeling down",
            Topic::Sleep => "sleep",
            Topic::SchoolWork => "school and work pressure",
        }
    }
}

/// Small mutable state kept per conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMemory {
    pub thread_id: String,
    pub greeting_count: u32,
    pub last_topics: Vec<Topic>,
    pub last_responses: VecDeque<String>,
    pub conversation_stage: ConversationStage,
    pub random_test_count: u32,
    pub has_introduced: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ThreadMemory {
    pub fn new(thread_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            thread_id: thread_id.into(),
            greeting_count: 0,
            last_topics: Vec::new(),
            last_responses: VecDeque::new(),
            conversation_stage: ConversationStage::Initial,
            random_test_count: 0,
            has_introduced: false,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Move the stage forward to `stage`; earlier stages are ignored
    pub fn advance_stage(&mut self, stage: ConversationStage) {
        if stage > self.conversation_stage {
            self.conversation_stage = stage;
        }
    }

    pub fn has_discussed(&self, topic: Topic) -> bool {
        self.last_topics.contains(&topic)
    }

    pub fn push_topic(&mut self, topic: Topic) {
        self.last_topics.push(topic);
        if self.last_topics.len() > MAX_TRACKED_TOPICS {
            let overflow = self.last_topics.len() - MAX_TRACKED_TOPICS;
            self.last_topics.drain(..overflow);
        }
    }

    /// Remember a short fingerprint of a bot reply, keeping at most `max` of them
    pub fn record_response(&mut self, reply: &str, max: usize) {
        if max == 0 {
            return;
        }
        let fingerprint = fingerprint(reply);
        if fingerprint.is_empty() {
            return;
        }
        self.last_responses.push_back(fingerprint);
        while self.last_responses.len() > max {
            self.last_responses.pop_front();
        }
    }

    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_activity > ttl
    }
}

/// Whitespace-collapsed prefix of a reply
pub(crate) fn fingerprint(reply: &str) -> String {
    reply
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(FINGERPRINT_CHARS)
        .collect()
}
