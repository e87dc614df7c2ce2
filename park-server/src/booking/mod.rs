//! 预约核心 - 车位分配与生命周期
//!
//! # 模块结构
//!
//! - [`engine`] - 分配引擎：原子地选位、锁位、建立预约
//! - [`lifecycle`] - 生命周期控制：结账完成、取消
//!
//! Slot status and booking payment state always change in the same
//! transaction; the pair is never observably split.

pub mod engine;
pub mod lifecycle;

pub use engine::{Allocation, allocate};
pub use lifecycle::{cancel, complete};

use shared::models::{BookingKind, PaymentStatus, SlotStatus};

/// Entry-state transition table: booking kind decides both sides of the
/// slot/booking pair at creation.
///
/// | kind      | slot     | payment |
/// |-----------|----------|---------|
/// | scheduled | booked   | pending |
/// | walkin    | occupied | active  |
pub fn entry_states(kind: BookingKind) -> (SlotStatus, PaymentStatus) {
    match kind {
        BookingKind::Scheduled => (SlotStatus::Booked, PaymentStatus::Pending),
        BookingKind::Walkin => (SlotStatus::Occupied, PaymentStatus::Active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_states_pair_slot_and_payment() {
        assert_eq!(
            entry_states(BookingKind::Scheduled),
            (SlotStatus::Booked, PaymentStatus::Pending)
        );
        assert_eq!(
            entry_states(BookingKind::Walkin),
            (SlotStatus::Occupied, PaymentStatus::Active)
        );
    }
}
