use uuid::Uuid;

use crate::api::error;

/// Unit of work shared by every repository trait.
///
/// All reads and writes of one operation go through the same `Tx`. Dropping a
/// `Tx` without [`Store::commit`] rolls it back.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, error::SystemError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), error::SystemError>;

    /// Blocks until no other open transaction holds any of `keys`; held until
    /// `tx` ends. Writers that decide on overlap checks lock the sitter and
    /// pet ids they are about to check.
    async fn lock_keys(&self, keys: &[Uuid], tx: &mut Self::Tx) -> Result<(), error::SystemError>;
}
