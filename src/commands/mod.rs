pub mod apply;
pub mod email;
pub mod script;
pub mod server;
