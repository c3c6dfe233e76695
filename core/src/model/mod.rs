// Wire models for the dashboard
//
// Everything here mirrors what the backend REST API serves or accepts.

mod admin;
mod badge;
mod guild;
mod layout;
mod settings;

pub use admin::{CommandInfo, DetailedStats};
pub use badge::{Badge, NewBadge};
pub use guild::{ChannelKind, GuildChannel, GuildRole};
pub use layout::{
    FieldKind, FieldSpec, LayoutBlock, LayoutCard, LayoutDescriptor, SidebarDescriptor,
    SidebarEntry, SidebarSection,
};
pub use settings::{
    BadgeFeedSettings, FeatureKey, FeatureSettings, LayoutSettings, TempVoiceSettings,
    WelcomeSettings,
};
