use mindbuddy_types::{ChatMessage, ChatSession, Language};
use rand::seq::SliceRandom;
use rand::Rng;

use super::titles::{generate_title, WELCOME_MESSAGES};
use crate::error::{PersistError, Result};

const NEW_SESSION_TITLE: &str = "New conversation";

/// The front end's list of chat sessions, newest first, with one current session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    current: Option<String>,
}

/// Any line but `previous`; repeats it only when it is the sole option
fn pick_welcome<R: Rng + ?Sized>(
    options: &[&'static str],
    previous: Option<&str>,
    rng: &mut R,
) -> &'static str {
    let candidates: Vec<&'static str> = options
        .iter()
        .copied()
        .filter(|w| previous != Some(*w))
        .collect();

    candidates
        .choose(rng)
        .or_else(|| options.choose(rng))
        .copied()
        .unwrap_or("Hi! I'm MindBuddy. How are you doing today?")
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current(&self) -> Option<&ChatSession> {
        let id = self.current.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    fn current_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.current.clone()?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Start a session seeded with a welcome line that differs from the newest session's
    pub fn create_session<R: Rng + ?Sized>(&mut self, language: Language, rng: &mut R) -> &ChatSession {
        let previous = self
            .sessions
            .first()
            .and_then(|s| s.messages.first())
            .map(|m| m.content.clone());

        let welcome = pick_welcome(WELCOME_MESSAGES, previous.as_deref(), rng);

        let mut session = ChatSession::new(NEW_SESSION_TITLE);
        session.push(ChatMessage::bot(welcome).with_language(language));

        self.current = Some(session.id.clone());
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    pub fn select(&mut self, session_id: &str) -> Result<&ChatSession> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| PersistError::SessionNotFound(session_id.to_string()))?;
        self.current = Some(session_id.to_string());
        Ok(&self.sessions[index])
    }

    /// Delete a session; when it was current, the first remaining one becomes current
    pub fn delete(&mut self, session_id: &str) -> Result<()> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != session_id);
        if self.sessions.len() == before {
            return Err(PersistError::SessionNotFound(session_id.to_string()));
        }

        if self.current.as_deref() == Some(session_id) {
            self.current = self.sessions.first().map(|s| s.id.clone());
        }
        Ok(())
    }

    pub fn rename(&mut self, session_id: &str, title: &str) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| PersistError::SessionNotFound(session_id.to_string()))?;
        session.title = title.trim().to_string();
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.sessions.clear();
        self.current = None;
    }

    /// Append a user message to the current session, creating one if there is none.
    ///
    /// The first user message of a session also decides its title.
    pub fn push_user_message<R: Rng + ?Sized>(
        &mut self,
        content: &str,
        language: Language,
        rng: &mut R,
    ) -> &ChatSession {
        if self.current_mut().is_none() {
            self.create_session(language, rng);
        }

        let title = generate_title(content, rng);
        let index = self.current_index().unwrap_or(0);
        let session = &mut self.sessions[index];
        if session.user_message_count() == 0 {
            session.title = title;
        }
        session.push(ChatMessage::user(content).with_language(language));
        &self.sessions[index]
    }

    pub fn push_bot_message(&mut self, content: &str, language: Language) -> Result<()> {
        let session = self.current_mut().ok_or(PersistError::NoActiveSession)?;
        session.push(ChatMessage::bot(content).with_language(language));
        Ok(())
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.current.as_deref()?;
        self.sessions.iter().position(|s| s.id == id)
    }

    /// Serialize the session list (the browser storage format)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.sessions)?)
    }

    /// Restore a session list; the first session becomes current
    pub fn from_json(json: &str) -> Result<Self> {
        let sessions: Vec<ChatSession> = serde_json::from_str(json)?;
        let current = sessions.first().map(|s| s.id.clone());
        Ok(Self { sessions, current })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_welcome_avoids_previous() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(pick_welcome(&["a", "b"], Some("a"), &mut rng), "b");
        }
    }

    #[test]
    fn test_pick_welcome_with_single_option_repeats_it() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_welcome(&["only"], Some("only"), &mut rng), "only");
    }

    #[test]
    fn test_pick_welcome_with_no_options() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick_welcome(&[], None, &mut rng).contains("MindBuddy"));
    }
}
