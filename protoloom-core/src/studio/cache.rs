//! Redis read-through cache for session lists. Cache trouble degrades to
//! a warning and a database read, never to a failed request.

use redis::AsyncCommands;
use uuid::Uuid;

/// Session list entries live this long before the next DB read refills them.
const SESSION_LIST_TTL_SECS: u64 = 300;

pub struct SessionCache {
    client: redis::Client,
}

impl SessionCache {
    pub fn connect(url: &str) -> Result<SessionCache, redis::RedisError> {
        Ok(SessionCache {
            client: redis::Client::open(url)?,
        })
    }

    fn key(account_id: Uuid) -> String {
        format!("sessions:{}", account_id)
    }

    /// Cached JSON for the account's session list, if present.
    pub async fn get_session_list(&self, account_id: Uuid) -> Option<String> {
        let mut conn = match self.client.get_async_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::warn!("redis connection failed: {}", err);
                return None;
            }
        };
        match conn.get::<_, Option<String>>(Self::key(account_id)).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("redis GET failed: {}", err);
                None
            }
        }
    }

    pub async fn put_session_list(&self, account_id: Uuid, json: &str) {
        let mut conn = match self.client.get_async_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::warn!("redis connection failed: {}", err);
                return;
            }
        };
        if let Err(err) = conn
            .set_ex::<_, _, ()>(Self::key(account_id), json, SESSION_LIST_TTL_SECS as usize)
            .await
        {
            log::warn!("redis SETEX failed: {}", err);
        }
    }

    /// Drop the cached list after any session mutation.
    pub async fn invalidate(&self, account_id: Uuid) {
        let mut conn = match self.client.get_async_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::warn!("redis connection failed: {}", err);
                return;
            }
        };
        if let Err(err) = conn.del::<_, ()>(Self::key(account_id)).await {
            log::warn!("redis DEL failed: {}", err);
        }
    }
}
