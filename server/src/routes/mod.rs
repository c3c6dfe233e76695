pub mod admin;
pub mod badges;
pub mod guild;
pub mod layout;
pub mod notices;
pub mod session;
pub mod settings;
