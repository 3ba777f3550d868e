use mindbuddy_llm::{ErrorKind, LlmError};

/// User-facing apology for a failed generation call, flavored by failure class
pub fn apology_for(error: &LlmError) -> &'static str {
    match error.kind() {
        ErrorKind::QuotaExceeded => {
            "I'm getting a lot of messages right now and hit my usage limit for the moment. \
             Please give me a minute and try again. If you're in crisis, call or text 988 or text HOME to 741741."
        }
        ErrorKind::Configuration | ErrorKind::Authentication => {
            "I'm not set up properly to reply right now. Please let the team know, and try again later. \
             If you're in crisis, call or text 988 or text HOME to 741741."
        }
        ErrorKind::Timeout => {
            "Sorry, I took too long to think of a reply. Could you send that again?"
        }
        ErrorKind::Network => {
            "Sorry, I'm having trouble connecting right now. Could you try again in a moment?"
        }
        ErrorKind::EmptyResponse => {
            "Sorry, I couldn't come up with a good reply to that. Could you tell me a bit more, or say it another way?"
        }
        ErrorKind::Upstream | ErrorKind::MalformedResponse => {
            "Sorry, something went wrong on my end. Could you try sending that again?"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_quota_apology_mentions_limit() {
        let error = LlmError::Http {
            status: 429,
            body: "RESOURCE_EXHAUSTED".to_string(),
        };
        assert!(apology_for(&error).contains("usage limit"));
    }

    #[test]
    fn test_timeout_apology() {
        let message = apology_for(&LlmError::Timeout(Duration::from_secs(30)));
        assert!(message.contains("too long"));
    }
}
