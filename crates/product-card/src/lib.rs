//! Product card component.
//!
//! A card shows a product's image, price, title, description, variant chips
//! and buy/add-to-cart actions, and forwards add-to-cart intents with the
//! chosen variant attached to a caller-supplied handler.
//!
//! - **Record**: [`ProductRecord`], a loosely-shaped caller-owned record
//! - **Resolve**: [`resolve`] derives title, price, stock and variant options
//! - **Selection**: [`Selection`], the chosen variant
//! - **Dispatch**: [`dispatch::activate`], the stock-gated add-to-cart path
//! - **Render**: [`render`] produces a [`ViewNode`] tree; [`ViewNode::to_html`]
//!   serializes it
//! - **Card**: [`ProductCard`] ties the above together with click routing and
//!   render subscriptions
//!
//! # Example
//!
//! ```rust
//! use product_card::prelude::*;
//!
//! let product = ProductRecord::new()
//!     .with_title("Shoe")
//!     .with_price(49)
//!     .with_variants(["8", "9"]);
//!
//! let mut card = ProductCard::builder(product)
//!     .on_add_to_cart(|selected| {
//!         assert_eq!(selected.selected_variant.as_deref(), Some("8"));
//!     })
//!     .mount();
//!
//! assert_eq!(card.click(Control::AddToCart), ClickOutcome::Dispatched(DispatchOutcome::Dispatched));
//! assert!(card.to_html().contains("Add to cart"));
//! ```

pub mod card;
pub mod classes;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod record;
pub mod render;
pub mod resolve;
pub mod selection;
pub mod view;

pub use card::{ClickOutcome, ProductCard, ProductCardBuilder, SubscriptionId};
pub use config::{CardConfig, SelectionPolicy};
pub use dispatch::{BuyAction, Destination, DispatchOutcome};
pub use error::CardError;
pub use record::{ProductId, ProductRecord, SelectedProduct, StockIndicator, VariantSource};
pub use render::{
    add_to_cart_label, description_text, price_label, render, truncate_description, RenderInput,
};
pub use resolve::{resolve, resolve_with, DerivedDisplay};
pub use selection::Selection;
pub use view::{Control, Element, ViewNode};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::card::{ClickOutcome, ProductCard};
    pub use crate::config::{CardConfig, SelectionPolicy};
    pub use crate::dispatch::{Destination, DispatchOutcome};
    pub use crate::error::CardError;
    pub use crate::logging::{LogLevel, LogSink, MemoryLog};
    pub use crate::record::{ProductRecord, SelectedProduct};
    pub use crate::resolve::{resolve, DerivedDisplay};
    pub use crate::view::{Control, ViewNode};
}
