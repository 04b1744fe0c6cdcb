use hey_lens::EvmAddress;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
#[error("account connection closed")]
pub struct AccountClosed;

/// Owner side of the wallet connection.
#[derive(Debug)]
pub struct AccountHandle {
    tx: watch::Sender<Option<EvmAddress>>,
}

/// Observer side of the wallet connection: the current viewer, if any.
#[derive(Debug, Clone)]
pub struct AccountConnection {
    rx: watch::Receiver<Option<EvmAddress>>,
}

pub fn connection(initial: Option<EvmAddress>) -> (AccountHandle, AccountConnection) {
    let (tx, rx) = watch::channel(initial);
    (AccountHandle { tx }, AccountConnection { rx })
}

impl AccountHandle {
    pub fn connect(&self, address: EvmAddress) {
        self.set(Some(address));
    }

    pub fn disconnect(&self) {
        self.set(None);
    }

    pub fn address(&self) -> Option<EvmAddress> {
        self.tx.borrow().clone()
    }

    fn set(&self, address: Option<EvmAddress>) {
        self.tx.send_if_modified(|current| {
            if *current == address {
                return false;
            }
            *current = address;
            true
        });
    }
}

impl AccountConnection {
    pub fn address(&self) -> Option<EvmAddress> {
        self.rx.borrow().clone()
    }

    /// Wait for the connected account to change.
    pub async fn changed(&mut self) -> Result<Option<EvmAddress>, AccountClosed> {
        self.rx.changed().await.map_err(|_| AccountClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(n: u8) -> EvmAddress {
        format!("0x{:040x}", n).parse().unwrap()
    }

    #[tokio::test]
    async fn test_changes_are_observed() {
        let (handle, mut account) = connection(None);
        assert!(account.address().is_none());

        handle.connect(address(1));
        assert_eq!(account.changed().await.unwrap(), Some(address(1)));

        handle.disconnect();
        assert_eq!(account.changed().await.unwrap(), None);
        assert!(handle.address().is_none());
    }

    #[tokio::test]
    async fn test_reconnecting_same_address_is_not_a_change() {
        let (handle, mut account) = connection(Some(address(1)));
        handle.connect(address(1));
        handle.connect(address(2));

        assert_eq!(account.changed().await.unwrap(), Some(address(2)));
    }

    #[tokio::test]
    async fn test_dropped_handle_closes_connection() {
        let (handle, mut account) = connection(None);
        drop(handle);

        assert!(account.changed().await.is_err());
    }
}
