use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use zonealias_infrastructure::dns::transport::tcp::{read_message, send_with_length_prefix};
use zonealias_infrastructure::dns::DnsServerHandler;

/// Largest datagram accepted from a client.
const MAX_UDP_PAYLOAD: usize = 4096;

/// Idle time after which a client TCP connection is closed.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<DnsServerHandler>,
    num_workers: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(bind_address = %socket_addr, num_workers, "Starting DNS server with SO_REUSEPORT");

    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..num_workers {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        let shutdown_udp = shutdown.clone();
        join_set.spawn(async move {
            run_udp_worker(udp_socket, handler_udp, shutdown_udp, i).await;
        });

        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        let handler_tcp = handler.clone();
        let shutdown_tcp = shutdown.clone();
        join_set.spawn(async move {
            run_tcp_worker(tcp_listener, handler_tcp, shutdown_tcp, i).await;
        });
    }

    info!(workers = num_workers, address = %socket_addr, "DNS server ready");

    while join_set.join_next().await.is_some() {}
    info!("DNS server stopped");
    Ok(())
}

async fn run_udp_worker(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
    worker_id: usize,
) {
    let mut recv_buf = [0u8; MAX_UDP_PAYLOAD];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) => {
                    error!(worker = worker_id, error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let handler_clone = handler.clone();
        let socket_clone = socket.clone();
        let cancel = shutdown.child_token();
        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        tokio::spawn(async move {
            if let Some(response) = handler_clone.handle_raw(&query, from.ip(), cancel).await {
                if let Err(e) = socket_clone.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send UDP response");
                }
            }
        });
    }
}

async fn run_tcp_worker(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
    worker_id: usize,
) {
    loop {
        let (stream, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(worker = worker_id, error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler_clone = handler.clone();
        let cancel = shutdown.child_token();
        tokio::spawn(async move {
            serve_tcp_connection(stream, from, handler_clone, cancel).await;
        });
    }
}

async fn serve_tcp_connection(
    mut stream: TcpStream,
    from: SocketAddr,
    handler: Arc<DnsServerHandler>,
    cancel: CancellationToken,
) {
    let _ = stream.set_nodelay(true);

    loop {
        let query = tokio::select! {
            _ = cancel.cancelled() => return,
            read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_message(&mut stream)) => match read {
                Ok(Ok(Some(query))) => query,
                Ok(Ok(None)) => return,
                Ok(Err(e)) => {
                    debug!(client = %from, error = %e, "TCP read error");
                    return;
                }
                Err(_) => {
                    debug!(client = %from, "Closing idle TCP connection");
                    return;
                }
            },
        };

        let Some(response) = handler.handle_raw(&query, from.ip(), cancel.child_token()).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            warn!(client = %from, error = %e, "Failed to send TCP response");
            return;
        }
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
