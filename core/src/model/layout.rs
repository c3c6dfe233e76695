// Layout and sidebar descriptors
//
// Server-driven page descriptions. The client renders whatever blocks the
// backend sends and never mutates them; a missing or failed fetch degrades
// to the empty descriptor.

use serde::{Deserialize, Serialize};

use super::settings::FeatureKey;

/// Ordered display blocks for one settings page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
}

impl LayoutDescriptor {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutBlock {
    Header {
        title: String,
        #[serde(default)]
        description: Option<String>,
    },
    Cards {
        cards: Vec<LayoutCard>,
    },
    Panel {
        feature: FeatureKey,
        fields: Vec<FieldSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutCard {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One form control inside a panel block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Toggle,
    Text,
    Number,
    ChannelSelect,
    RoleSelect,
    CategorySelect,
}

/// Navigation menu definition, fetched once per session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SidebarDescriptor {
    #[serde(default)]
    pub sections: Vec<SidebarSection>,
}

impl SidebarDescriptor {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarSection {
    pub name: String,
    pub entries: Vec<SidebarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarEntry {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_blocks_deserialize_by_tag() {
        let raw = json!({
            "blocks": [
                {"type": "header", "title": "Temp Voice"},
                {"type": "panel", "feature": "temp-voice", "fields": [
                    {"id": "categoryID", "label": "Category", "kind": "category_select"}
                ]}
            ]
        });

        let layout: LayoutDescriptor = serde_json::from_value(raw).unwrap();
        assert_eq!(layout.blocks.len(), 2);
        match &layout.blocks[1] {
            LayoutBlock::Panel { feature, fields } => {
                assert_eq!(*feature, FeatureKey::TempVoice);
                assert_eq!(fields[0].kind, FieldKind::CategorySelect);
            }
            other => panic!("wrong block: {:?}", other),
        }
    }

    #[test]
    fn test_default_descriptor_is_empty() {
        assert!(LayoutDescriptor::default().is_empty());
        assert!(SidebarDescriptor::default().is_empty());
    }
}
