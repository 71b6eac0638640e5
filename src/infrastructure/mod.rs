pub mod channels;
pub mod sources;
pub mod sqlite;
pub mod telegram;
