use crate::packet::SequenceBit;

/// The receiver's wait state. The state *is* the bit the receiver accepts
///  next - there is no second tracker that could drift out of lockstep.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiverState {
    WaitForZero,
    WaitForOne,
}

/// Classification of one inbound datagram. The driver decides this in order:
///  structural well-formedness and checksum first, sequence bit second - a
///  corrupted datagram's sequence bit cannot be trusted, so it must never be
///  classified as merely out of sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiverEvent {
    /// checksum valid and the sequence bit matches the expectation
    AllFine,
    /// checksum invalid, or the frame was malformed
    IsCorrupt,
    /// checksum valid but the sequence bit does not match the expectation
    WrongAlternating,
}

/// The driver's reaction to an event. `ack` is the bit to confirm on the
///  wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiverAction {
    /// append the payload to the output and acknowledge it
    Deliver { ack: SequenceBit },
    /// no reaction at all - in particular, no ACK
    Ignore,
    /// answer a retransmitted unit with the same ACK as before, without
    ///  advancing - this is how a peer that missed the previous ACK recovers
    ResendLastAck { ack: SequenceBit },
}

impl ReceiverState {
    /// The bit the receiver is waiting for. Derived from the state, which
    ///  keeps the two trivially consistent.
    pub fn expected_bit(self) -> SequenceBit {
        match self {
            ReceiverState::WaitForZero => SequenceBit::Zero,
            ReceiverState::WaitForOne => SequenceBit::One,
        }
    }

    /// Pure transition function over the full event set. Mutates nothing -
    ///  the caller installs the returned state and performs the action's
    ///  side effect.
    pub fn on_event(self, event: ReceiverEvent) -> (ReceiverAction, ReceiverState) {
        let expected = self.expected_bit();

        match event {
            ReceiverEvent::AllFine => {
                let next = match self {
                    ReceiverState::WaitForZero => ReceiverState::WaitForOne,
                    ReceiverState::WaitForOne => ReceiverState::WaitForZero,
                };
                (ReceiverAction::Deliver { ack: expected }, next)
            }
            ReceiverEvent::IsCorrupt => (ReceiverAction::Ignore, self),
            // the ACK sent last always carries the complement of the bit
            // still being waited for
            ReceiverEvent::WrongAlternating => (
                ReceiverAction::ResendLastAck { ack: expected.flipped() },
                self,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_fine(ReceiverState::WaitForZero, ReceiverEvent::AllFine, ReceiverAction::Deliver { ack: SequenceBit::Zero }, ReceiverState::WaitForOne)]
    #[case::one_fine(ReceiverState::WaitForOne, ReceiverEvent::AllFine, ReceiverAction::Deliver { ack: SequenceBit::One }, ReceiverState::WaitForZero)]
    #[case::zero_corrupt(ReceiverState::WaitForZero, ReceiverEvent::IsCorrupt, ReceiverAction::Ignore, ReceiverState::WaitForZero)]
    #[case::one_corrupt(ReceiverState::WaitForOne, ReceiverEvent::IsCorrupt, ReceiverAction::Ignore, ReceiverState::WaitForOne)]
    #[case::zero_wrong_alternating(ReceiverState::WaitForZero, ReceiverEvent::WrongAlternating, ReceiverAction::ResendLastAck { ack: SequenceBit::One }, ReceiverState::WaitForZero)]
    #[case::one_wrong_alternating(ReceiverState::WaitForOne, ReceiverEvent::WrongAlternating, ReceiverAction::ResendLastAck { ack: SequenceBit::Zero }, ReceiverState::WaitForOne)]
    fn test_transition_table(
        #[case] state: ReceiverState,
        #[case] event: ReceiverEvent,
        #[case] expected_action: ReceiverAction,
        #[case] expected_next: ReceiverState,
    ) {
        let (action, next) = state.on_event(event);
        assert_eq!(action, expected_action);
        assert_eq!(next, expected_next);
    }

    #[rstest]
    #[case(ReceiverState::WaitForZero, SequenceBit::Zero)]
    #[case(ReceiverState::WaitForOne, SequenceBit::One)]
    fn test_expected_bit(#[case] state: ReceiverState, #[case] expected: SequenceBit) {
        assert_eq!(state.expected_bit(), expected);
    }

    /// a full round of alternating deliveries toggles through both states
    #[rstest]
    fn test_alternating_rounds() {
        let state = ReceiverState::WaitForZero;

        let (action, state) = state.on_event(ReceiverEvent::AllFine);
        assert_eq!(action, ReceiverAction::Deliver { ack: SequenceBit::Zero });

        let (action, state) = state.on_event(ReceiverEvent::AllFine);
        assert_eq!(action, ReceiverAction::Deliver { ack: SequenceBit::One });

        assert_eq!(state, ReceiverState::WaitForZero);
    }
}
