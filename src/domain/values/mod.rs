pub mod keyword_kind;
pub mod keyword_set;
