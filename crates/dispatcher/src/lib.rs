pub mod cli;
pub mod dispatcher;
pub mod logging;

pub use dispatcher::Dispatcher;
