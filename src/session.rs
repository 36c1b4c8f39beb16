use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::time::timeout;
use tracing::{debug, info, trace};

use crate::config::ReceiverConfig;
use crate::fsm::{ReceiverAction, ReceiverEvent, ReceiverState};
use crate::packet::{decode_data, encode_ack, is_corrupt, SequenceBit};
use crate::socket::DatagramSocket;

/// Classifies one inbound datagram against the bit the receiver is waiting
///  for, returning the classification and, for an accepted datagram, its
///  payload. Corruption is ruled out before the sequence bit is compared; a
///  malformed frame is handled exactly like a corrupt one.
pub fn classify(datagram: &[u8], expected: SequenceBit) -> (ReceiverEvent, Option<&[u8]>) {
    let (header, _, payload) = match decode_data(datagram) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("malformed datagram - treating as corrupt: {:#}", e);
            return (ReceiverEvent::IsCorrupt, None);
        }
    };

    if is_corrupt(datagram) {
        debug!("datagram failed checksum verification");
        return (ReceiverEvent::IsCorrupt, None);
    }

    if header.sequence_bit != expected {
        debug!("datagram carries bit {:?} while waiting for {:?} - retransmission of an acknowledged unit", header.sequence_bit, expected);
        return (ReceiverEvent::WrongAlternating, None);
    }

    (ReceiverEvent::AllFine, Some(payload))
}

/// What one finished session leaves behind: the reassembled stream and the
///  accept/reject counters for the summary.
#[derive(Debug)]
pub struct SessionOutcome {
    pub assembled: Bytes,
    pub packets_ok: u64,
    pub packets_wrong: u64,
}

/// One receiving session, from socket open to idle timeout. Owns all session
///  state exclusively: the wait state, the append-only output buffer and the
///  counters. Strictly one receive-classify-transition-acknowledge-append
///  cycle at a time.
pub struct ReceiveSession {
    config: ReceiverConfig,
    socket: Arc<dyn DatagramSocket>,
    state: ReceiverState,
    assembled: BytesMut,
    ack_zero: Bytes,
    ack_one: Bytes,
    packets_ok: u64,
    packets_wrong: u64,
}

impl ReceiveSession {
    pub fn new(config: ReceiverConfig, socket: Arc<dyn DatagramSocket>) -> ReceiveSession {
        let source_port = config.bind_addr.port();
        let dest_port = config.peer_addr.port();

        ReceiveSession {
            config,
            socket,
            state: ReceiverState::WaitForZero,
            assembled: BytesMut::new(),
            ack_zero: encode_ack(source_port, dest_port, SequenceBit::Zero),
            ack_one: encode_ack(source_port, dest_port, SequenceBit::One),
            packets_ok: 0,
            packets_wrong: 0,
        }
    }

    /// Drives the session until the peer falls silent: waits for a datagram,
    ///  classifies it, lets the state machine decide the reaction and
    ///  performs it. The idle timeout on the wait is the session's sole
    ///  termination condition and its sole suspension point.
    pub async fn run(mut self) -> anyhow::Result<SessionOutcome> {
        info!("receiving from {:?}, ending after {:?} idle", self.config.peer_addr, self.config.idle_timeout);

        let mut buf = vec![0u8; self.config.max_datagram_size];
        loop {
            match timeout(self.config.idle_timeout, self.socket.recv_datagram(&mut buf)).await {
                Err(_elapsed) => {
                    debug!("no datagram for {:?} - transfer is complete", self.config.idle_timeout);
                    break;
                }
                Ok(Err(e)) => {
                    return Err(e.context("receiving datagram"));
                }
                Ok(Ok(len)) => {
                    self.handle_datagram(&buf[..len]).await;
                }
            }
        }

        info!("session finished: {} datagrams accepted, {} rejected, {} bytes reassembled", self.packets_ok, self.packets_wrong, self.assembled.len());

        Ok(SessionOutcome {
            assembled: self.assembled.freeze(),
            packets_ok: self.packets_ok,
            packets_wrong: self.packets_wrong,
        })
    }

    async fn handle_datagram(&mut self, datagram: &[u8]) {
        let (event, payload) = classify(datagram, self.state.expected_bit());
        let (action, next_state) = self.state.on_event(event);
        self.state = next_state;

        match action {
            ReceiverAction::Deliver { ack } => {
                if let Some(payload) = payload {
                    trace!("delivering {} payload bytes for bit {:?}", payload.len(), ack);
                    self.assembled.put_slice(payload);
                }
                self.send_ack(ack).await;
                self.packets_ok += 1;
            }
            ReceiverAction::Ignore => {
                self.packets_wrong += 1;
            }
            ReceiverAction::ResendLastAck { ack } => {
                self.send_ack(ack).await;
                self.packets_wrong += 1;
            }
        }
    }

    async fn send_ack(&self, bit: SequenceBit) {
        let ack = match bit {
            SequenceBit::Zero => &self.ack_zero,
            SequenceBit::One => &self.ack_one,
        };

        trace!("sending ACK for bit {:?} to {:?}", bit, self.config.peer_addr);
        self.socket.send_datagram(self.config.peer_addr, ack).await;
    }
}
