//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries the response body; the runner sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Stop the chain and send this HTML text back to the chat.
    Reply(String),
}
