//! Chain handlers: request logging, session touch, command dispatch and its error boundary.

mod command_handler;
mod error_boundary;
mod logging;
mod session_handler;

pub use command_handler::CommandHandler;
pub use error_boundary::ErrorBoundary;
pub use logging::LoggingHandler;
pub use session_handler::SessionHandler;
