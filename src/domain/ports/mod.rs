pub mod command_inbox;
pub mod keyword_repository;
pub mod message_channel;
pub mod posting_source;
pub mod sent_link_repository;
