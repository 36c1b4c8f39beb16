use std::fmt::{Debug, Formatter};

use anyhow::bail;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use crc::Crc;
use num_enum::TryFromPrimitive;

pub const DATA_HEADER_LEN: usize = 8;
pub const CHECKSUM_LEN: usize = size_of::<u32>();
/// header + checksum tail, i.e. a data datagram with an empty payload
pub const MIN_DATA_DATAGRAM_LEN: usize = DATA_HEADER_LEN + CHECKSUM_LEN;
pub const ACK_HEADER_LEN: usize = 5;
pub const ACK_DATAGRAM_LEN: usize = ACK_HEADER_LEN + CHECKSUM_LEN;

/// The protocol's sole ordering token: a single bit, toggled per successfully
///  delivered unit. It distinguishes "next expected unit" from
///  "retransmission of the unit that was already acknowledged".
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum SequenceBit {
    Zero = 0,
    One = 1,
}
impl SequenceBit {
    pub fn flipped(self) -> SequenceBit {
        match self {
            SequenceBit::Zero => SequenceBit::One,
            SequenceBit::One => SequenceBit::Zero,
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Checksum(pub u32);
impl Debug for Checksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x?}", self.0)
    }
}
impl Checksum {
    /// CRC-32 over the byte-exact concatenation of header and payload. The
    ///  checksum field itself is never part of the digest.
    pub fn of(header: &[u8], payload: &[u8]) -> Checksum {
        let hasher = Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
        let mut digest = hasher.digest();

        digest.update(header);
        digest.update(payload);

        Checksum(digest.finalize())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataHeader {
    pub source_port: u16,
    pub dest_port: u16,
    pub sequence_bit: SequenceBit,
    /// reserved, ignored on receive
    pub flag: u8,
    pub payload_len: u16,
}
impl DataHeader {
    pub const SERIALIZED_LEN: usize = DATA_HEADER_LEN;

    pub fn ser(&self, buf: &mut BytesMut) {
        buf.put_u16(self.source_port);
        buf.put_u16(self.dest_port);
        buf.put_u8(self.sequence_bit as u8);
        buf.put_u8(self.flag);
        buf.put_u16(self.payload_len);
    }

    pub fn deser(buf: &mut impl Buf) -> anyhow::Result<DataHeader> {
        let source_port = buf.try_get_u16()?;
        let dest_port = buf.try_get_u16()?;
        let sequence_bit = SequenceBit::try_from(buf.try_get_u8()?)?;
        let flag = buf.try_get_u8()?;
        let payload_len = buf.try_get_u16()?;

        Ok(DataHeader {
            source_port,
            dest_port,
            sequence_bit,
            flag,
            payload_len,
        })
    }
}

/// Structural decode of a data datagram: slices header, claimed checksum and
///  payload at their fixed offsets. This judges well-formedness only, not
///  corruption - the caller verifies the checksum separately with
///  [`is_corrupt`].
///
/// The payload boundary is derived solely from the declared payload length;
///  a datagram whose actual length disagrees with it is malformed.
pub fn decode_data(datagram: &[u8]) -> anyhow::Result<(DataHeader, Checksum, &[u8])> {
    if datagram.len() < MIN_DATA_DATAGRAM_LEN {
        bail!("datagram of {} bytes is shorter than the minimum frame of {} bytes", datagram.len(), MIN_DATA_DATAGRAM_LEN);
    }

    let header = DataHeader::deser(&mut &datagram[..DATA_HEADER_LEN])?;
    let claimed_checksum = Checksum((&datagram[DATA_HEADER_LEN..]).get_u32());
    let payload = &datagram[MIN_DATA_DATAGRAM_LEN..];

    if payload.len() != header.payload_len as usize {
        bail!("declared payload length {} disagrees with actual payload of {} bytes", header.payload_len, payload.len());
    }

    Ok((header, claimed_checksum, payload))
}

/// Recomputes the checksum over the received header and payload and compares
///  it with the claimed checksum. Any mismatch counts, covering bit flips,
///  truncation and reordering of the integrity tail itself.
pub fn is_corrupt(datagram: &[u8]) -> bool {
    if datagram.len() < MIN_DATA_DATAGRAM_LEN {
        return true;
    }

    let claimed = Checksum((&datagram[DATA_HEADER_LEN..]).get_u32());
    let actual = Checksum::of(&datagram[..DATA_HEADER_LEN], &datagram[MIN_DATA_DATAGRAM_LEN..]);

    claimed != actual
}

/// Builds a complete data datagram with a freshly computed checksum. The
///  receiver never sends these; the codec keeps both directions of the wire
///  format together, and the protocol tests drive a session with it.
pub fn encode_data(source_port: u16, dest_port: u16, sequence_bit: SequenceBit, payload: &[u8]) -> anyhow::Result<Bytes> {
    if payload.len() > u16::MAX as usize {
        bail!("payload of {} bytes exceeds the length field's maximum of {}", payload.len(), u16::MAX);
    }

    let header = DataHeader {
        source_port,
        dest_port,
        sequence_bit,
        flag: 0,
        payload_len: payload.len() as u16,
    };

    let mut buf = BytesMut::with_capacity(MIN_DATA_DATAGRAM_LEN + payload.len());
    header.ser(&mut buf);
    let checksum = Checksum::of(&buf, payload);
    buf.put_u32(checksum.0);
    buf.put_slice(payload);

    Ok(buf.freeze())
}

/// Builds the 9-byte acknowledgment datagram confirming a sequence bit. Pure
///  function of the bit and the two port values, so a session precomputes
///  both possible ACKs once.
pub fn encode_ack(source_port: u16, dest_port: u16, sequence_bit: SequenceBit) -> Bytes {
    let mut buf = BytesMut::with_capacity(ACK_DATAGRAM_LEN);
    buf.put_u16(source_port);
    buf.put_u16(dest_port);
    buf.put_u8(sequence_bit as u8);

    let checksum = Checksum::of(&buf, &[]);
    buf.put_u32(checksum.0);

    buf.freeze()
}
