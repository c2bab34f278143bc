mod handler_chain;
mod restore_names;

pub use handler_chain::HandlerChain;
pub use restore_names::restore_names;
