//! Chooses which images a render call carries when the user supplies fewer than the template takes.
//!
//! User images always outrank avatars. In two-image templates the sender's avatar takes the first
//! ("subject") slot and the mentioned user's avatar stands in for the second.

use bytes::Bytes;

/// Image candidates of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarBundle {
    pub sender_avatar: Option<Bytes>,
    pub mentioned_avatar: Option<Bytes>,
    pub supplied_images: Vec<Bytes>,
}

/// Which avatars are worth downloading before [`resolve_images`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvatarNeeds {
    pub sender: bool,
    pub mentioned: bool,
}

impl AvatarNeeds {
    /// Nothing is fetched for image-less templates or when supplied images already fill every slot.
    /// With exactly one supplied image in a two-image template only the sender's avatar can be used.
    pub fn plan(max_images: usize, supplied: usize, has_mention: bool) -> Self {
        if max_images == 0 || supplied >= max_images {
            return Self::default();
        }
        Self {
            sender: true,
            mentioned: has_mention && !(max_images == 2 && supplied == 1),
        }
    }

    pub fn any(&self) -> bool {
        self.sender || self.mentioned
    }
}

/// Picks at most `max_images` images from `bundle`. Pure and deterministic.
pub fn resolve_images(bundle: &AvatarBundle, max_images: usize) -> Vec<Bytes> {
    let supplied = &bundle.supplied_images;
    let sender = bundle.sender_avatar.as_ref();
    let mentioned = bundle.mentioned_avatar.as_ref();

    match max_images {
        0 => Vec::new(),
        1 => supplied
            .first()
            .or(mentioned)
            .or(sender)
            .cloned()
            .into_iter()
            .collect(),
        2 => match supplied.as_slice() {
            [first, second, ..] => vec![first.clone(), second.clone()],
            [only] => match sender {
                Some(sender) => vec![sender.clone(), only.clone()],
                None => vec![only.clone()],
            },
            [] => match (sender, mentioned) {
                (Some(sender), Some(mentioned)) => vec![sender.clone(), mentioned.clone()],
                (None, Some(mentioned)) => vec![mentioned.clone()],
                (Some(sender), None) => vec![sender.clone(), sender.clone()],
                (None, None) => Vec::new(),
            },
        },
        n => {
            let mut images = supplied.clone();
            for avatar in [mentioned, sender].into_iter().flatten() {
                if images.len() < n {
                    images.push(avatar.clone());
                }
            }
            images.truncate(n);
            images
        }
    }
}
