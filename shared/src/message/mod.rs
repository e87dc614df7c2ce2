//! 消息总线消息类型定义
//!
//! 这些类型在 park-server 和 clients 之间共享，用于
//! 进程内（内存）和网络（TCP）通信。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 消息总线事件类型
///
/// Every server-side event carries a full snapshot; observers reconcile by
/// replacing their local view wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 握手消息 (客户端 -> 服务端)
    Handshake = 0,
    /// 车位统计快照 (服务端 -> 客户端)
    Availability = 1,
    /// 预约列表快照 (服务端 -> 客户端)
    Bookings = 2,
    /// 路边车位快照 (服务端 -> 客户端)
    StreetSlots = 3,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::Availability),
            2 => Ok(EventType::Bookings),
            3 => Ok(EventType::StreetSlots),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::Availability => write!(f, "availability"),
            EventType::Bookings => write!(f, "bookings"),
            EventType::StreetSlots => write!(f, "street_slots"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub payload: Vec<u8>,
}

impl BusMessage {
    /// 创建新消息
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            payload,
        }
    }

    /// 从可序列化数据创建消息
    pub fn from_data<T: Serialize>(
        event_type: EventType,
        data: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event_type, serde_json::to_vec(data)?))
    }

    /// 握手消息 (客户端 -> 服务端)
    pub fn handshake(payload: &HandshakePayload) -> Result<Self, serde_json::Error> {
        Self::from_data(EventType::Handshake, payload)
    }

    /// 车位统计快照
    pub fn availability(snapshot: &crate::models::Availability) -> Result<Self, serde_json::Error> {
        Self::from_data(EventType::Availability, snapshot)
    }

    /// 预约列表快照
    pub fn bookings(listing: &[crate::models::BookingWithSlot]) -> Result<Self, serde_json::Error> {
        Self::from_data(EventType::Bookings, &listing)
    }

    /// 路边车位快照
    pub fn street_slots(listing: &[crate::models::StreetSlot]) -> Result<Self, serde_json::Error> {
        Self::from_data(EventType::StreetSlots, &listing)
    }

    /// 解析业务载荷
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
