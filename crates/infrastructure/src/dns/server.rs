use hickory_proto::op::{Message, MessageType, ResponseCode};
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use zonealias_application::ports::{QueryContext, Served};
use zonealias_application::services::HandlerChain;
use zonealias_domain::{canonical_name, is_subdomain};

/// Size of the fixed DNS header.
const HEADER_LEN: usize = 12;

struct ZoneRoute {
    zone: String,
    chain: HandlerChain,
}

/// Wire-level entry point: picks the served zone for a query, runs its
/// handler chain and encodes whatever comes back.
#[derive(Default)]
pub struct DnsServerHandler {
    routes: Vec<ZoneRoute>,
}

impl DnsServerHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler chain serving `zone`.
    pub fn add_zone(&mut self, zone: &str, chain: HandlerChain) {
        self.routes.push(ZoneRoute {
            zone: canonical_name(zone),
            chain,
        });
        // Longest zone first so the most specific one wins.
        self.routes.sort_by(|a, b| b.zone.len().cmp(&a.zone.len()));
    }

    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.zone.as_str())
    }

    fn route_for(&self, qname: &str) -> Option<&ZoneRoute> {
        self.routes
            .iter()
            .find(|route| is_subdomain(&route.zone, qname))
    }

    /// Handles one query in wire format. `None` means nothing is sent back.
    pub async fn handle_raw(
        &self,
        bytes: &[u8],
        client_ip: IpAddr,
        cancel: CancellationToken,
    ) -> Option<Vec<u8>> {
        let query = match Message::from_vec(bytes) {
            Ok(query) => query,
            Err(e) => {
                if bytes.len() < HEADER_LEN {
                    debug!(client = %client_ip, len = bytes.len(), "Dropping runt packet");
                    return None;
                }
                warn!(client = %client_ip, error = %e, "Failed to parse query");
                return encode(&format_error(bytes));
            }
        };

        if query.message_type() == MessageType::Response {
            debug!(client = %client_ip, id = query.id(), "Ignoring response packet");
            return None;
        }

        let response = self.handle_message(&query, client_ip, cancel).await;
        match encode(&response) {
            Some(bytes) => Some(bytes),
            None => encode(&error_reply(&query, ResponseCode::ServFail)),
        }
    }

    /// Runs the handler chain of the zone that serves `query`.
    pub async fn handle_message(
        &self,
        query: &Message,
        client_ip: IpAddr,
        cancel: CancellationToken,
    ) -> Message {
        let Some(question) = query.queries().first() else {
            debug!(client = %client_ip, id = query.id(), "Query without question");
            return error_reply(query, ResponseCode::FormErr);
        };

        let qname = question.name().to_lowercase().to_ascii();
        debug!(
            client = %client_ip,
            query = %qname,
            qtype = %question.query_type(),
            "DNS query received"
        );

        let Some(route) = self.route_for(&canonical_name(&qname)) else {
            debug!(client = %client_ip, query = %qname, "No zone serves query");
            return error_reply(query, ResponseCode::Refused);
        };

        let ctx = QueryContext::new(client_ip, cancel);
        match route.chain.serve(&ctx, query).await {
            Served::Reply(response) => response,
            Served::Status(code, err) => {
                debug!(
                    client = %client_ip,
                    query = %qname,
                    zone = %route.zone,
                    code = %code,
                    error = %err,
                    "Sending error response"
                );
                error_reply(query, code)
            }
            Served::Next => {
                error!(zone = %route.zone, "Handler chain passed on a query");
                error_reply(query, ResponseCode::ServFail)
            }
        }
    }
}

/// Empty response echoing the query's ID, opcode, flags and question.
pub fn error_reply(query: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new();
    response
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(query.op_code())
        .set_recursion_desired(query.recursion_desired())
        .set_checking_disabled(query.checking_disabled())
        .set_response_code(code);
    response.add_queries(query.queries().to_vec());
    response
}

/// FORMERR for a packet whose header could be read but whose body could not.
fn format_error(bytes: &[u8]) -> Message {
    let mut response = Message::new();
    response
        .set_id(u16::from_be_bytes([bytes[0], bytes[1]]))
        .set_message_type(MessageType::Response)
        .set_recursion_desired(bytes[2] & 0x01 != 0)
        .set_response_code(ResponseCode::FormErr);
    response
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    match message.to_vec() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(id = message.id(), error = %e, "Failed to encode response");
            None
        }
    }
}
