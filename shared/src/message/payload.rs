use serde::{Deserialize, Serialize};

/// 握手载荷 (客户端 -> 服务端)
///
/// 包含客户端的协议版本信息，用于服务端进行版本校验。
/// A handshake also asks the server to re-publish the current snapshots so
/// a (re)connecting observer starts from fresh state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// 协议版本
    pub version: u16,
    /// 客户端名称/标识
    pub client_name: Option<String>,
    /// 客户端唯一标识 (UUID)
    pub client_id: Option<String>,
}

impl Default for HandshakePayload {
    fn default() -> Self {
        Self {
            version: super::PROTOCOL_VERSION,
            client_name: None,
            client_id: None,
        }
    }
}
