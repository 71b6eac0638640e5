pub mod commands;
pub mod cycle;
pub mod keywords;
pub mod ledger;
pub mod listener;
pub mod notify;
pub mod scheduler;
pub mod shutdown;
