//! The wishlist session.
//!
//! Same local-first shape as the cart session, but with a different
//! reconciliation rule at login: the guest wishlist is merged as a
//! per-item union. Every guest entry the server does not already have is
//! added with its own remote call, regardless of what else the server
//! holds. Adds are idempotent server-side, so replaying a merge is
//! harmless.

use chrono::Utc;

use volt_core::{Catalog, ProductId, WishlistEntry};

use crate::error::ClientError;
use crate::storage::{GuestStore, WISHLIST_KEY};
use crate::transport::WishlistTransport;

/// A wishlist with local-first mutations and union merge on login.
pub struct WishlistSession<T: WishlistTransport, S: GuestStore> {
    transport: T,
    store: S,
    entries: Vec<WishlistEntry>,
    authed: bool,
}

impl<T: WishlistTransport, S: GuestStore> WishlistSession<T, S> {
    /// Open a guest session, restoring any persisted guest wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the guest store fails.
    pub fn new(transport: T, store: S) -> Result<Self, ClientError> {
        let entries = load_guest_entries(&store)?;
        Ok(Self {
            transport,
            store,
            entries,
            authed: false,
        })
    }

    /// Current entries.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product_id == product_id)
    }

    /// Whether the session is logged in.
    #[must_use]
    pub const fn is_authed(&self) -> bool {
        self.authed
    }

    /// Save a product. Saving an already-saved product is a no-op and
    /// keeps the original timestamp.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails. Remote
    /// push failures are logged, not returned.
    pub async fn add(&mut self, product_id: ProductId) -> Result<(), ClientError> {
        if !self.contains(&product_id) {
            self.entries.push(WishlistEntry {
                product_id: product_id.clone(),
                added_at: Utc::now(),
            });
        }
        self.persist_guest()?;

        if self.authed {
            if let Err(e) = self.transport.add_to_wishlist(&product_id).await {
                tracing::warn!(error = %e, "wishlist add push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Unsave a product. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails.
    pub async fn remove(&mut self, product_id: &ProductId) -> Result<(), ClientError> {
        self.entries.retain(|e| &e.product_id != product_id);
        self.persist_guest()?;

        if self.authed {
            if let Err(e) = self.transport.remove_from_wishlist(product_id).await {
                tracing::warn!(error = %e, "wishlist remove push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Reconcile after a login: union-merge the guest entries into the
    /// server wishlist, adopt the result, and erase guest storage.
    ///
    /// Each guest entry the server lacks is pushed with its own add call;
    /// entries the server already has are left alone. Failed adds are
    /// logged and skipped, so a partial merge can be completed by a later
    /// login.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the initial server fetch fails; the
    /// guest state is untouched in that case.
    pub async fn merge_on_login(&mut self) -> Result<(), ClientError> {
        let server = self.transport.fetch_wishlist().await?;
        let mut merged = server.products;

        for entry in &self.entries {
            if merged.iter().any(|e| e.product_id == entry.product_id) {
                continue;
            }
            match self.transport.add_to_wishlist(&entry.product_id).await {
                Ok(_) => merged.push(entry.clone()),
                Err(e) => {
                    tracing::warn!(
                        product_id = %entry.product_id,
                        error = %e,
                        "wishlist merge add failed, entry skipped"
                    );
                }
            }
        }

        self.entries = merged;
        self.authed = true;
        self.store.remove(WISHLIST_KEY)?;
        Ok(())
    }

    /// Fetch the server wishlist and adopt it. No-op for guests.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the fetch fails.
    pub async fn hydrate(&mut self) -> Result<(), ClientError> {
        if !self.authed {
            return Ok(());
        }
        let server = self.transport.fetch_wishlist().await?;
        self.entries = server.products;
        Ok(())
    }

    /// Reset to an empty guest session after logout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest storage cannot be cleared.
    pub fn reset(&mut self) -> Result<(), ClientError> {
        self.entries.clear();
        self.authed = false;
        self.store.remove(WISHLIST_KEY)
    }

    fn persist_guest(&self) -> Result<(), ClientError> {
        if self.authed {
            return Ok(());
        }
        let json = serde_json::to_string(&self.entries)?;
        self.store.set(WISHLIST_KEY, &json)
    }
}

/// Read and sanitize the persisted guest wishlist.
fn load_guest_entries<S: GuestStore>(store: &S) -> Result<Vec<WishlistEntry>, ClientError> {
    let Some(json) = store.get(WISHLIST_KEY)? else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<WishlistEntry> = match serde_json::from_str(&json) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "guest wishlist unreadable, starting empty");
            return Ok(Vec::new());
        }
    };

    entries.retain(|e| Catalog::get(&e.product_id).is_some());
    Ok(entries)
}
