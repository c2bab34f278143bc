mod exchange_provider;
mod query_handler;

pub use exchange_provider::ExchangeProvider;
pub use query_handler::{QueryContext, QueryHandler, Served};
