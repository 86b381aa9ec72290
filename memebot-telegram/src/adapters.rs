//! Adapters from Telegram (teloxide) types to memebot_core types.
//! Depends only on teloxide and memebot_core type definitions.

use memebot_core::{Chat, ChatKind, Message, MessageElement, ToCoreMessage, ToCoreUser, User};
use teloxide::types::{MessageEntityKind, MessageEntityRef};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
///
/// Text (or a photo's caption) is split on its entities: a `text_mention` becomes
/// [`MessageElement::Mention`], an `@username` span is dropped since Telegram does not
/// resolve it to an id, everything else stays plain text. Photos are attached by the
/// runner, which has to download them first.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                kind: self.chat_kind(),
            },
            elements: self.elements(),
            created_at: chrono::Utc::now(),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn chat_kind(&self) -> ChatKind {
        if self.0.chat.is_private() {
            ChatKind::Private
        } else if self.0.chat.is_channel() {
            ChatKind::Channel
        } else {
            ChatKind::Group
        }
    }

    fn elements(&self) -> Vec<MessageElement> {
        if let Some(text) = self.0.text() {
            split_entities(text, self.0.parse_entities().unwrap_or_default())
        } else if let Some(caption) = self.0.caption() {
            split_entities(caption, self.0.parse_caption_entities().unwrap_or_default())
        } else {
            Vec::new()
        }
    }
}

fn split_entities(text: &str, mut entities: Vec<MessageEntityRef<'_>>) -> Vec<MessageElement> {
    entities.sort_by_key(|e| e.start());

    let mut elements = Vec::new();
    let mut cursor = 0;
    for entity in &entities {
        let mention = match entity.kind() {
            MessageEntityKind::TextMention { user } => Some(user.id.0 as i64),
            MessageEntityKind::Mention => None,
            _ => continue,
        };
        if entity.start() < cursor {
            continue;
        }
        push_plain(&mut elements, &text[cursor..entity.start()]);
        if let Some(user_id) = mention {
            elements.push(MessageElement::Mention { user_id });
        }
        cursor = entity.end();
    }
    push_plain(&mut elements, &text[cursor..]);
    elements
}

fn push_plain(elements: &mut Vec<MessageElement>, text: &str) {
    if !text.is_empty() {
        elements.push(MessageElement::Plain {
            text: text.to_string(),
        });
    }
}
