pub mod forward_query;

pub use forward_query::{response_code_for, ForwardQueryUseCase, Forwarded};
