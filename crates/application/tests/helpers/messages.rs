use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, CNAME, NS};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::str::FromStr;
use std::sync::Arc;
use zonealias_domain::ZoneMapping;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn query(qname: &str, qtype: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(0x1234)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(name(qname), qtype));
    message
}

pub fn query_with_class(qname: &str, class: DNSClass) -> Message {
    let mut message = query(qname, RecordType::A);
    let mut queries = message.take_queries();
    queries[0].set_query_class(class);
    message.add_queries(queries);
    message
}

pub fn a_record(owner: &str, last_octet: u8) -> Record {
    Record::from_rdata(name(owner), 300, RData::A(A::new(10, 0, 0, last_octet)))
}

pub fn cname_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn ns_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::NS(NS(name(target))))
}

/// Builds a backend reply to `request` with the given sections.
pub fn upstream_reply(
    request: &Message,
    rcode: ResponseCode,
    answers: Vec<Record>,
    authorities: Vec<Record>,
    additionals: Vec<Record>,
) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_authoritative(true)
        .set_recursion_available(true)
        .set_response_code(rcode);
    reply.add_queries(request.queries().to_vec());
    reply.insert_answers(answers);
    reply.insert_name_servers(authorities);
    reply.insert_additionals(additionals);
    reply
}

pub fn dev_corp_mapping(prefix_len: usize) -> Arc<ZoneMapping> {
    Arc::new(ZoneMapping::new("dev.corp.net.", "corp.net", prefix_len).unwrap())
}
