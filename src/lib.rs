//! Receiving endpoint of a stop-and-wait ("alternating bit") transfer
//!  protocol layered over UDP. The peer sends one data datagram at a time and
//!  retransmits it until the matching acknowledgment arrives; this crate
//!  accepts the inbound datagrams, detects corruption and replays, sends the
//!  acknowledgments and reassembles the accepted payloads into a single byte
//!  stream that is persisted once the peer falls silent.
//!
//! ## Design goals
//!
//! * At most one unacknowledged unit is in flight at any time, so the entire
//!   ordering mechanism is a single sequence bit toggled on every successful
//!   delivery. The receiver tracks which bit it is waiting for and treats a
//!   repeat of the previous bit as a retransmission of an already delivered
//!   unit (the peer missed the ACK), to be re-acknowledged but not delivered
//!   again.
//! * Every datagram carries a checksum over all transmitted fields, so
//!   corruption is detected before the sequence bit is ever looked at - a
//!   corrupted datagram's own sequence bit cannot be trusted, and nothing is
//!   acknowledged against it.
//! * There is no explicit end-of-transfer message: the session ends when no
//!   datagram arrives within the configured idle interval, which is the
//!   normal termination and not an error.
//! * One session is one single logical thread of control - receive, classify,
//!   transition, acknowledge, append - with no shared mutable state. A future
//!   extension to overlapping sessions gets fully independent session
//!   instances.
//!
//! ## Data datagram
//!
//! All numbers in network byte order (BE):
//! ```ascii
//! 0:  source port (u16)
//! 2:  destination port (u16)
//! 4:  sequence bit (u8, 0 or 1)
//! 5:  flag (u8, reserved)
//! 6:  payload length (u16)
//! 8:  CRC-32 checksum over bytes 0-7 and the payload (u32)
//! 12: payload
//! ```
//!
//! The checksum covers everything that is transmitted except the checksum
//!  field itself. The payload ends exactly where the declared payload length
//!  says it does; a datagram whose actual length disagrees is malformed.
//!
//! ## Acknowledgment datagram (9 bytes, no payload)
//!
//! ```ascii
//! 0: source port (u16)
//! 2: destination port (u16)
//! 4: sequence bit (u8) - the bit being confirmed
//! 5: CRC-32 checksum over bytes 0-4 (u32)
//! ```
//!
//! ## Receiver reactions
//!
//! ```ascii
//! event                                    reaction
//! checksum valid, bit as expected          deliver payload, ACK the bit, flip
//! checksum valid, bit not as expected      resend the previous ACK, stay
//! checksum invalid (or malformed frame)    nothing, stay
//! ```

pub mod config;
pub mod fsm;
pub mod output;
pub mod packet;
pub mod session;
pub mod socket;
