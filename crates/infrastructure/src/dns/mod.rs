pub mod endpoints;
pub mod exchange;
pub mod server;
pub mod transport;

pub use endpoints::EndpointResolver;
pub use exchange::NetworkExchangeProvider;
pub use server::DnsServerHandler;
