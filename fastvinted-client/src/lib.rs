//! FastVinted API client
//!
//! A typed `reqwest` wrapper over the REST API, covering the calls the
//! dashboard makes.
//!
//! # Example
//!
//! ```no_run
//! use fastvinted_client::{ApiClient, NewSearchItem};
//! use fastvinted_shared::pagination::ItemQuery;
//!
//! # async fn example() -> fastvinted_client::ClientResult<()> {
//! let mut client = ApiClient::new("http://localhost:4200")?;
//! client.login("user@example.com", "secret1").await?;
//!
//! client
//!     .create_search_item(&NewSearchItem {
//!         search_text: "levis 501".to_string(),
//!         max_price: Some(40.0),
//!         tags: vec!["jeans".to_string()],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let total = client.count_items().await?;
//! let pages = fastvinted_client::total_pages(total, 12);
//! let first = client.list_items(&ItemQuery::default()).await?;
//! println!("{} items on {} pages, showing {}", total, pages, first.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{ApiClient, Health, LoginResponse, NewSearchItem, SearchItemChanges};
pub use error::{ClientError, ClientResult};
pub use fastvinted_shared::pagination::total_pages;
