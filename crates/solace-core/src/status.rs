// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message delivery lifecycle.
//!
//! [`MessageStatus`] is the closed set of states a message can be in. The
//! numeric ids are stable and are what the storage layer persists. External
//! transport vocabulary is folded into this enum by
//! [`MessageStatus::from_transport`], which never fails: anything it does not
//! recognize becomes [`MessageStatus::Unknown`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Delivery state of a single message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum MessageStatus {
    /// Created but not yet handed to anyone.
    #[strum(serialize = "Pending Activation")]
    Pending,
    Sent,
    Received,
    Delivered,
    Canceled,
    Failed,
    Accepted,
    Queued,
    Receiving,
    Read,
    Sending,
    Unknown,
}

/// Side effect the reconciler owes once a status has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    /// Charge the recipient and close the owning conversation.
    DeductAndClose,
    /// Close the owning conversation without charging.
    Close,
    /// Persist only.
    None,
}

impl MessageStatus {
    /// Stable storage id.
    pub fn id(self) -> i64 {
        match self {
            MessageStatus::Pending => 1,
            MessageStatus::Sent => 2,
            MessageStatus::Received => 3,
            MessageStatus::Delivered => 4,
            MessageStatus::Canceled => 5,
            MessageStatus::Failed => 6,
            MessageStatus::Accepted => 7,
            MessageStatus::Queued => 8,
            MessageStatus::Receiving => 9,
            MessageStatus::Read => 10,
            MessageStatus::Sending => 11,
            MessageStatus::Unknown => 12,
        }
    }

    /// Inverse of [`MessageStatus::id`]. Unrecognized ids map to `Unknown`.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => MessageStatus::Pending,
            2 => MessageStatus::Sent,
            3 => MessageStatus::Received,
            4 => MessageStatus::Delivered,
            5 => MessageStatus::Canceled,
            6 => MessageStatus::Failed,
            7 => MessageStatus::Accepted,
            8 => MessageStatus::Queued,
            9 => MessageStatus::Receiving,
            10 => MessageStatus::Read,
            11 => MessageStatus::Sending,
            _ => MessageStatus::Unknown,
        }
    }

    /// Map a status string reported by the SMS transport.
    ///
    /// Case and surrounding whitespace are ignored. `undelivered` is folded
    /// into `Failed`.
    pub fn from_transport(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" => MessageStatus::Accepted,
            "queued" => MessageStatus::Queued,
            "sending" => MessageStatus::Sending,
            "sent" => MessageStatus::Sent,
            "failed" | "undelivered" => MessageStatus::Failed,
            "delivered" => MessageStatus::Delivered,
            "receiving" => MessageStatus::Receiving,
            "received" => MessageStatus::Received,
            "read" => MessageStatus::Read,
            "canceled" => MessageStatus::Canceled,
            _ => MessageStatus::Unknown,
        }
    }

    /// Terminal statuses end the delivery lifecycle of an outbound message.
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageStatus::Delivered | MessageStatus::Failed)
    }

    /// What the reconciler must do after persisting this status.
    pub fn effect(self) -> StatusEffect {
        match self {
            MessageStatus::Delivered => StatusEffect::DeductAndClose,
            MessageStatus::Failed => StatusEffect::Close,
            _ => StatusEffect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn ids_are_stable_and_invertible() {
        for status in MessageStatus::iter() {
            assert_eq!(MessageStatus::from_id(status.id()), status);
        }
        assert_eq!(MessageStatus::Pending.id(), 1);
        assert_eq!(MessageStatus::Delivered.id(), 4);
        assert_eq!(MessageStatus::Failed.id(), 6);
        assert_eq!(MessageStatus::Sending.id(), 11);
        assert_eq!(MessageStatus::Unknown.id(), 12);
    }

    #[test]
    fn transport_vocabulary_maps_to_defined_statuses() {
        let cases = [
            ("accepted", MessageStatus::Accepted),
            ("queued", MessageStatus::Queued),
            ("sending", MessageStatus::Sending),
            ("sent", MessageStatus::Sent),
            ("failed", MessageStatus::Failed),
            ("delivered", MessageStatus::Delivered),
            ("undelivered", MessageStatus::Failed),
            ("receiving", MessageStatus::Receiving),
            ("received", MessageStatus::Received),
            ("read", MessageStatus::Read),
        ];
        for (raw, expected) in cases {
            assert_eq!(MessageStatus::from_transport(raw), expected, "{raw}");
        }
    }

    #[test]
    fn transport_mapping_ignores_case_and_whitespace() {
        assert_eq!(
            MessageStatus::from_transport("  Delivered\n"),
            MessageStatus::Delivered
        );
        assert_eq!(
            MessageStatus::from_transport("UNDELIVERED"),
            MessageStatus::Failed
        );
    }

    #[test]
    fn unrecognized_status_is_unknown() {
        assert_eq!(
            MessageStatus::from_transport("partially_delivered"),
            MessageStatus::Unknown
        );
        assert_eq!(MessageStatus::from_transport(""), MessageStatus::Unknown);
    }

    #[test]
    fn effects_for_terminal_statuses() {
        assert_eq!(
            MessageStatus::Delivered.effect(),
            StatusEffect::DeductAndClose
        );
        assert_eq!(MessageStatus::Failed.effect(), StatusEffect::Close);
        for status in MessageStatus::iter().filter(|s| !s.is_terminal()) {
            assert_eq!(status.effect(), StatusEffect::None, "{status}");
        }
    }

    #[test]
    fn pending_displays_legacy_label() {
        assert_eq!(MessageStatus::Pending.to_string(), "Pending Activation");
        assert_eq!(MessageStatus::Delivered.to_string(), "Delivered");
    }

    proptest! {
        #[test]
        fn mapping_is_total(raw in ".*") {
            let status = MessageStatus::from_transport(&raw);
            prop_assert_eq!(MessageStatus::from_id(status.id()), status);
        }

        #[test]
        fn unknown_ids_never_panic(id in any::<i64>()) {
            let status = MessageStatus::from_id(id);
            if !(1..=12).contains(&id) {
                prop_assert_eq!(status, MessageStatus::Unknown);
            }
        }
    }
}
