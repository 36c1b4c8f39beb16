use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;

use crate::packet::MIN_DATA_DATAGRAM_LEN;

/// Per-session configuration. One instance configures exactly one receiving
///  session; overlapping sessions get fully independent instances.
pub struct ReceiverConfig {
    /// Local address the receive socket binds to. Its port becomes the
    ///  source port of outgoing acknowledgments.
    pub bind_addr: SocketAddr,

    /// Where acknowledgments are sent. Its port becomes the destination port
    ///  of outgoing acknowledgments.
    pub peer_addr: SocketAddr,

    /// The protocol has no explicit end-of-transfer message: absence of any
    ///  inbound datagram for this long ends the session. This is the normal
    ///  termination, not an error - choosing it too small truncates slow
    ///  transfers, choosing it too big delays the final artifact.
    pub idle_timeout: Duration,

    /// Size of the receive buffer, i.e. the largest inbound datagram the
    ///  session accepts. The peer's framing must agree; a bigger datagram is
    ///  truncated by the socket and then dropped as malformed.
    pub max_datagram_size: usize,

    /// Where the reassembled stream is persisted when the session ends.
    pub output_path: PathBuf,
}

impl ReceiverConfig {
    /// Both endpoints on the loopback interface, with the protocol's
    ///  canonical port pair and a 10 second idle timeout.
    pub fn default_localhost(output_path: PathBuf) -> ReceiverConfig {
        ReceiverConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 2121)),
            peer_addr: SocketAddr::from(([127, 0, 0, 1], 4242)),
            idle_timeout: Duration::from_secs(10),
            max_datagram_size: 1400,
            output_path,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_datagram_size < MIN_DATA_DATAGRAM_LEN {
            bail!("max datagram size {} cannot hold even an empty data datagram of {} bytes", self.max_datagram_size, MIN_DATA_DATAGRAM_LEN);
        }
        if self.idle_timeout.is_zero() {
            bail!("idle timeout must be positive");
        }

        Ok(())
    }
}
