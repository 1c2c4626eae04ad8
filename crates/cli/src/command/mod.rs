pub mod create;
pub mod definition;
pub mod links;
pub mod watch;
