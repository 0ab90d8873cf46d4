//! Xen Orchestra 客户端句柄
//!
//! 只负责保存连接地址和会话凭据；实际的 RPC 传输不在本 crate 范围内。

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct XoSession {
    token: RwLock<Option<String>>,
}

impl XoSession {
    pub fn sign_in_with_token(&self, token: &str) {
        tracing::debug!("signing in with session token");
        *self.token.write() = Some(token.to_string());
    }

    pub fn sign_out(&self) {
        *self.token.write() = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[derive(Debug)]
pub struct XoClient {
    url: String,
    pub session: XoSession,
}

impl XoClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session: XoSession::default(),
        }
    }

    /// 构造客户端；给出会话令牌时立即登录
    pub fn connect(url: impl Into<String>, token: Option<&str>) -> Self {
        let client = Self::new(url);
        if let Some(token) = token {
            client.session.sign_in_with_token(token);
        }
        client
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
