//! Office 365 connector MessageCard payload.

use serde::{Deserialize, Serialize};

pub const MESSAGE_CARD_TYPE: &str = "MessageCard";
pub const MESSAGE_CARD_CONTEXT: &str = "http://schema.org/extensions";

/// A name/value row rendered in a card section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

impl Fact {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One card section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    pub markdown: bool,
}

/// Link target of an `OpenUri` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub os: String,
    pub uri: String,
}

/// Card button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialAction {
    #[serde(rename = "@type")]
    pub action_type: String,
    pub name: String,
    pub targets: Vec<Target>,
}

impl PotentialAction {
    /// An `OpenUri` button pointing at `uri` on every OS.
    pub fn open_uri(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            action_type: "OpenUri".to_string(),
            name: name.into(),
            targets: vec![Target {
                os: "default".to_string(),
                uri: uri.into(),
            }],
        }
    }
}

/// Payload posted to the Teams incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: String,
    #[serde(rename = "@context")]
    pub context: String,
    pub theme_color: String,
    pub summary: String,
    pub sections: Vec<Section>,
    pub potential_action: Vec<PotentialAction>,
}
