//! CSS class names of the card markup.
//!
//! Shared by the [`render`](crate::render) module and framework bindings so
//! every rendition carries the same classes.

pub const CARD: &str = "card product-card text-center h-100 border-0";
pub const MEDIA: &str = "position-relative product-card__media rounded-4";
pub const BADGE: &str = "badge rounded-pill product-card__badge";
pub const IMAGE: &str = "card-img-top p-3";
pub const OUT_OF_STOCK_OVERLAY: &str = "badge bg-secondary position-absolute product-card__oos";
pub const BODY: &str = "card-body d-flex flex-column";
pub const PRICE: &str = "price-top text-start";
pub const TITLE: &str = "card-title mb-1 text-start";
pub const DESCRIPTION: &str = "text-muted small text-start mb-3";
pub const CHIP_ROW: &str = "d-flex flex-wrap gap-2 mb-3";
pub const CHIP: &str = "variant-chip";
pub const CHIP_ACTIVE: &str = "variant-chip active";
/// Marker added to the selected chip.
pub const ACTIVE: &str = "active";
pub const ACTION_ROW: &str = "mt-auto d-flex gap-2 action-row";
pub const BUY: &str = "btn buy-btn action-btn";
pub const ADD_TO_CART: &str = "btn btn-dark action-btn";
