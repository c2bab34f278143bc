use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;
use zonealias_infrastructure::dns::transport::tcp::{read_message, send_with_length_prefix};

pub type Responder = Arc<dyn Fn(&Message) -> Message + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Answer over UDP and TCP.
    Normal,
    /// Answer UDP with an empty truncated reply; the full reply only over TCP.
    TruncateUdp,
    /// Send a reply with a foreign ID before the real one over UDP.
    WrongIdFirst,
}

/// Local upstream serving UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<(&'static str, Message)>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(mode: MockMode, responder: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&Message) -> Message + Send + Sync + 'static,
    {
        let responder: Responder = Arc::new(responder);
        let udp = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_requests = Arc::clone(&requests);
        let udp_responder = Arc::clone(&responder);
        let tcp_requests = Arc::clone(&requests);
        let tcp_responder = responder;

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = udp.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let Ok(query) = Message::from_vec(&buf[..len]) else { continue };
                        udp_requests.lock().unwrap().push(("udp", query.clone()));

                        let mut reply = udp_responder(&query);
                        match mode {
                            MockMode::TruncateUdp => {
                                reply.take_answers();
                                reply.set_truncated(true);
                            }
                            MockMode::WrongIdFirst => {
                                let mut spoofed = reply.clone();
                                spoofed.set_id(reply.id().wrapping_add(1));
                                let _ = udp.send_to(&spoofed.to_vec().unwrap(), peer).await;
                            }
                            MockMode::Normal => {}
                        }
                        let _ = udp.send_to(&reply.to_vec().unwrap(), peer).await;
                    }
                    accepted = tcp.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let requests = Arc::clone(&tcp_requests);
                        let responder = Arc::clone(&tcp_responder);
                        tokio::spawn(async move {
                            while let Ok(Some(bytes)) = read_message(&mut stream).await {
                                let Ok(query) = Message::from_vec(&bytes) else { break };
                                requests.lock().unwrap().push(("tcp", query.clone()));
                                let reply = responder(&query).to_vec().unwrap();
                                if send_with_length_prefix(&mut stream, &reply).await.is_err() {
                                    break;
                                }
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Received queries tagged with the transport they arrived on.
    pub fn requests(&self) -> Vec<(&'static str, Message)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A bound UDP socket that never answers.
pub struct SilentEndpoint {
    socket: UdpSocket,
}

impl SilentEndpoint {
    pub async fn bind() -> Result<Self, std::io::Error> {
        Ok(Self {
            socket: UdpSocket::bind("127.0.0.1:0").await?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.socket.local_addr().unwrap()
    }
}
