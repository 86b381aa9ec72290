//! Core types: user, chat, structured message, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Kind of chat a message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    Private,
    Group,
    Channel,
}

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
}

/// One typed span of an inbound message, in the order it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageElement {
    /// Plain text with mention and image placeholders already removed.
    Plain { text: String },
    /// Mention of another user that carries a platform user id.
    Mention { user_id: i64 },
    /// Inline image; base64 payload, optionally as a `data:<mime>;base64,<payload>` URL.
    Image { base64: String },
}

/// A single inbound message: who sent it, where, and its typed elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub elements: Vec<MessageElement>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Concatenation of all plain-text elements.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| match e {
                MessageElement::Plain { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of inline images carried by the message.
    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, MessageElement::Image { .. }))
            .count()
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; the message has been answered.
    Stop,
    /// Skip this handler, try next.
    Ignore,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(elements: Vec<MessageElement>) -> Message {
        Message {
            id: "1".to_string(),
            user: User {
                id: 1,
                username: None,
                first_name: None,
                last_name: None,
            },
            chat: Chat {
                id: 2,
                kind: ChatKind::Group,
            },
            elements,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plain_text_skips_mentions_and_images() {
        let msg = message(vec![
            MessageElement::Plain {
                text: "happy ".to_string(),
            },
            MessageElement::Mention { user_id: 42 },
            MessageElement::Image {
                base64: "aGk=".to_string(),
            },
            MessageElement::Plain {
                text: "hello".to_string(),
            },
        ]);
        assert_eq!(msg.plain_text(), "happy hello");
        assert_eq!(msg.image_count(), 1);
    }

    #[test]
    fn test_plain_text_empty() {
        assert_eq!(message(vec![]).plain_text(), "");
    }
}
