use crate::ports::{ExchangeProvider, QueryContext, QueryHandler, Served};
use crate::services::restore_names;
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{DNSClass, Name};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zonealias_domain::{DomainError, ZoneMapping};

/// Outcome of [`ForwardQueryUseCase::handle`].
#[derive(Debug)]
pub enum Forwarded {
    /// The query is not for this handler.
    PassThrough,
    Reply(Message),
}

/// Response code the client receives for a forwarding failure.
pub fn response_code_for(err: &DomainError) -> ResponseCode {
    match err {
        DomainError::LoopDetected => ResponseCode::Refused,
        _ => ResponseCode::ServFail,
    }
}

/// Rewrites queries into the backend zone, forwards them and maps the answer
/// back to the name the client asked for.
pub struct ForwardQueryUseCase {
    mapping: Arc<ZoneMapping>,
    provider: Arc<dyn ExchangeProvider>,
}

impl ForwardQueryUseCase {
    pub fn new(mapping: Arc<ZoneMapping>, provider: Arc<dyn ExchangeProvider>) -> Self {
        Self { mapping, provider }
    }

    pub fn mapping(&self) -> &ZoneMapping {
        &self.mapping
    }

    pub async fn handle(
        &self,
        cancel: &CancellationToken,
        query: &Message,
    ) -> Result<Forwarded, DomainError> {
        let question = match query.queries().first() {
            Some(question) if question.query_class() == DNSClass::IN => question.clone(),
            _ => return Ok(Forwarded::PassThrough),
        };

        let orig_name = question.name().clone();
        let qname = orig_name.to_lowercase().to_ascii();
        if !self.mapping.serves(&qname) {
            return Ok(Forwarded::PassThrough);
        }

        let lookup = match self.mapping.derive_lookup_name(&qname) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(
                    query = %qname,
                    zone = self.mapping.from_zone(),
                    error = %e,
                    "Rejecting query"
                );
                return Err(e);
            }
        };
        let lookup_name = Name::from_ascii(&lookup)
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", lookup, e)))?;

        debug!(
            query = %qname,
            lookup = %lookup,
            qtype = %question.query_type(),
            "Forwarding query"
        );

        let mut outbound = query.clone();
        let mut queries = outbound.take_queries();
        if let Some(first) = queries.first_mut() {
            first.set_name(lookup_name.clone());
        }
        outbound.add_queries(queries);

        let mut response = match self.provider.exchange(cancel, &outbound).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    query = %qname,
                    lookup = %lookup,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Exchange failed"
                );
                return Err(e);
            }
        };

        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_recursion_desired(query.recursion_desired())
            .set_checking_disabled(query.checking_disabled())
            .set_authoritative(false);

        response.take_queries();
        response.add_query(question);

        let mut answers = response.take_answers();
        restore_names(&mut answers, &lookup_name, &orig_name);
        response.insert_answers(answers);

        let mut authorities = response.take_name_servers();
        restore_names(&mut authorities, &lookup_name, &orig_name);
        response.insert_name_servers(authorities);

        let mut additionals = response.take_additionals();
        restore_names(&mut additionals, &lookup_name, &orig_name);
        response.insert_additionals(additionals);

        debug!(
            query = %qname,
            rcode = %response.response_code(),
            answers = response.answers().len(),
            "Forwarded query answered"
        );

        Ok(Forwarded::Reply(response))
    }
}

#[async_trait]
impl QueryHandler for ForwardQueryUseCase {
    fn name(&self) -> &str {
        "forward"
    }

    async fn serve(&self, ctx: &QueryContext, query: &Message) -> Served {
        match self.handle(&ctx.cancel, query).await {
            Ok(Forwarded::PassThrough) => Served::Next,
            Ok(Forwarded::Reply(response)) => Served::Reply(response),
            Err(e) => Served::Status(response_code_for(&e), e),
        }
    }
}
