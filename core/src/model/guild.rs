// Discord guild entities served by the backend

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Other,
}

// The backend grows channel kinds faster than this crate cares about;
// anything unrecognized is lumped into Other.
impl From<String> for ChannelKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => ChannelKind::Text,
            "voice" => ChannelKind::Voice,
            "category" => ChannelKind::Category,
            _ => ChannelKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildChannel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRole {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_channel_kind_maps_to_other() {
        let channel: GuildChannel = serde_json::from_value(json!({
            "id": "1", "name": "forum", "type": "forum"
        }))
        .unwrap();
        assert_eq!(channel.kind, ChannelKind::Other);
    }
}
