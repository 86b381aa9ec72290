//! Parses one message into a template id, text arguments, supplied images and a mention.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use meme_catalog::{Catalog, ParamsType};
use memebot_core::MessageElement;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// No template keyword in the message.
    #[error("No meme keyword supplied")]
    MissingInput,
}

/// Everything the later stages need from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub template_id: String,
    pub texts: Vec<String>,
    pub supplied_images: Vec<Bytes>,
    pub mentioned_user_id: Option<i64>,
    pub min_images: usize,
    pub max_images: usize,
}

/// Splits `text` into keyword and arguments and scans `elements` for images and a mention.
///
/// `text` is the message's plain text with mention and image spans already removed.
pub fn extract(
    catalog: &Catalog,
    text: &str,
    elements: &[MessageElement],
) -> Result<Extracted, ExtractError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::MissingInput);
    }

    let (first_token, remainder) = match text.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (text, None),
    };
    let template_id = catalog.resolve(first_token).to_string();

    let (texts, params) = match catalog.lookup(&template_id) {
        Some(descriptor) => (
            texts_for_template(&descriptor.params, remainder),
            descriptor.params.clone(),
        ),
        None => (
            remainder.map(|r| vec![r.to_string()]).unwrap_or_default(),
            ParamsType::default(),
        ),
    };

    let (supplied_images, mentioned_user_id) = scan_elements(elements);

    debug!(
        template_id = %template_id,
        texts = ?texts,
        supplied_images = supplied_images.len(),
        mentioned_user_id = ?mentioned_user_id,
        "Message parsed"
    );

    Ok(Extracted {
        template_id,
        texts,
        supplied_images,
        mentioned_user_id,
        min_images: params.min_images,
        max_images: params.max_images,
    })
}

/// Comma-separated texts, padded from the defaults up to `min_texts` and cut at `max_texts`.
/// With no arguments at all the defaults are used verbatim.
fn texts_for_template(params: &ParamsType, remainder: Option<&str>) -> Vec<String> {
    let Some(rest) = remainder else {
        return params.default_texts.clone();
    };

    let mut texts: Vec<String> = rest.split(',').map(|t| t.trim().to_string()).collect();

    let pad_end = params.min_texts.min(params.default_texts.len());
    if texts.len() < pad_end {
        texts.extend_from_slice(&params.default_texts[texts.len()..pad_end]);
    }

    if params.max_texts > 0 && texts.len() > params.max_texts {
        texts.truncate(params.max_texts);
    }
    texts
}

/// One pass over the elements: decoded images in order, and the last mention target.
fn scan_elements(elements: &[MessageElement]) -> (Vec<Bytes>, Option<i64>) {
    let mut images = Vec::new();
    let mut mentioned = None;
    for element in elements {
        match element {
            MessageElement::Mention { user_id } => mentioned = Some(*user_id),
            MessageElement::Image { base64 } => {
                if let Some(image) = decode_image(base64) {
                    images.push(image);
                }
            }
            MessageElement::Plain { .. } => {}
        }
    }
    (images, mentioned)
}

/// Decodes a base64 payload, dropping a `data:<mime>;base64,` prefix if present.
fn decode_image(payload: &str) -> Option<Bytes> {
    let data = payload.split_once(',').map_or(payload, |(_, data)| data).trim();
    if data.is_empty() {
        return None;
    }
    match STANDARD.decode(data) {
        Ok(bytes) if !bytes.is_empty() => Some(Bytes::from(bytes)),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Skipping undecodable inline image");
            None
        }
    }
}
