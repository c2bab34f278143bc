//! Length-prefixed DNS message framing over streams (RFC 1035 §4.2.2).
//!
//! Shared by the DNS-over-TLS transport and the TCP listener.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Writes a DNS message with its two-byte length prefix (RFC 1035 §4.2.2).
pub async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), std::io::Error>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("message too large: {} bytes", message_bytes.len()),
        )
    })?;

    let mut framed = Vec::with_capacity(message_bytes.len() + 2);
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream.write_all(&framed).await?;
    stream.flush().await
}

/// Reads one length-prefixed DNS message.
///
/// Returns `Ok(None)` when the peer closed the stream before a new message
/// started.
pub async fn read_message<S>(stream: &mut S) -> Result<Option<Vec<u8>>, std::io::Error>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let message_len = u16::from_be_bytes(len_buf) as usize;

    let mut message = vec![0u8; message_len];
    stream.read_exact(&mut message).await?;
    Ok(Some(message))
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, std::io::Error>
where
    S: AsyncReadExt + Unpin,
{
    read_message(stream).await?.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before response",
        )
    })
}
