mod zones;

pub use zones::build_server_handler;
