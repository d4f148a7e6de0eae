pub mod broadcast;
pub mod telegram;
