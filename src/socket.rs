use async_trait::async_trait;
#[cfg(test)] use mockall::automock;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{error, trace};

/// This is an abstraction for the raw datagram transport, introduced to
///  facilitate mocking the I/O part away for testing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatagramSocket: Send + Sync + 'static {
    /// Waits for the next inbound datagram, copying it into `buf` and
    ///  returning the number of bytes received. A datagram larger than `buf`
    ///  is truncated by the socket and fails structural decoding downstream.
    async fn recv_datagram(&self, buf: &mut [u8]) -> anyhow::Result<usize>;

    /// Best-effort send: errors are logged, not surfaced. A lost ACK is
    ///  recovered by the peer retransmitting its unit.
    async fn send_datagram(&self, to: SocketAddr, buf: &[u8]);
}

#[async_trait]
impl DatagramSocket for Arc<UdpSocket> {
    async fn recv_datagram(&self, buf: &mut [u8]) -> anyhow::Result<usize> {
        let (len, from) = self.recv_from(buf).await?;
        trace!("UDP socket: received {} bytes from {:?}", len, from);
        Ok(len)
    }

    async fn send_datagram(&self, to: SocketAddr, buf: &[u8]) {
        trace!("UDP socket: sending {} bytes to {:?}", buf.len(), to);

        if let Err(e) = self.send_to(buf, to).await {
            error!("error sending UDP datagram to {:?}: {}", to, e);
        }
    }
}
