use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;
use std::time::Duration;
use zonealias_domain::ExchangeEndpointSet;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn query(qname: &str, qtype: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(0x4242)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(name(qname), qtype));
    message
}

/// Answers every question with a CNAME to `www.<question>` and its A record.
pub fn answer_with_cname(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_authoritative(true)
        .set_response_code(ResponseCode::NoError);
    reply.add_queries(request.queries().to_vec());

    if let Some(question) = request.queries().first() {
        let owner = question.name().clone();
        let target = name(&format!("www.{}", owner.to_ascii()));
        reply.add_answer(Record::from_rdata(
            owner,
            60,
            RData::CNAME(CNAME(target.clone())),
        ));
        reply.add_answer(Record::from_rdata(target, 60, RData::A(A::new(10, 1, 2, 3))));
    }
    reply
}

/// Answers the question with `count` A records for its name.
pub fn answer_with_a_records(request: &Message, count: usize) -> Message {
    let mut reply = answer_with_cname(request);
    reply.take_answers();
    if let Some(question) = request.queries().first() {
        for i in 0..count {
            let octets = (i as u32).to_be_bytes();
            reply.add_answer(Record::from_rdata(
                question.name().clone(),
                60,
                RData::A(A::new(10, octets[1], octets[2], octets[3])),
            ));
        }
    }
    reply
}

pub fn endpoint_set(endpoint: &str, timeout: Duration) -> ExchangeEndpointSet {
    ExchangeEndpointSet::new(vec![endpoint.to_string()], timeout).unwrap()
}
