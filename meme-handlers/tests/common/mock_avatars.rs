//! In-memory [`memebot_core::AvatarSource`] that records every lookup.

use async_trait::async_trait;
use bytes::Bytes;
use memebot_core::AvatarSource;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockAvatars {
    avatars: HashMap<i64, Bytes>,
    calls: Mutex<Vec<i64>>,
}

impl MockAvatars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_avatar(mut self, user_id: i64, avatar: &'static str) -> Self {
        self.avatars.insert(user_id, Bytes::from_static(avatar.as_bytes()));
        self
    }

    /// User ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarSource for MockAvatars {
    async fn avatar(&self, user_id: i64) -> Option<Bytes> {
        self.calls.lock().unwrap().push(user_id);
        self.avatars.get(&user_id).cloned()
    }
}
