//! Add-to-cart dispatch and buy-control routing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{ProductRecord, SelectedProduct};
use crate::resolve::DerivedDisplay;
use crate::selection::Selection;

/// Opaque navigation target for the Buy control (e.g. `/product/42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Destination {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What activating the Buy control does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyAction {
    /// Follow the destination. Not gated by stock.
    Navigate(Destination),
    /// Run the add-to-cart dispatcher.
    Dispatch,
}

impl BuyAction {
    pub fn for_destination(destination: Option<&Destination>) -> Self {
        match destination {
            Some(dest) => Self::Navigate(dest.clone()),
            None => Self::Dispatch,
        }
    }
}

/// Result of one add-to-cart activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler was invoked once.
    Dispatched,
    /// In stock but no handler was supplied; the record was built and dropped.
    Unhandled,
    /// The product is out of stock; nothing was built or invoked.
    OutOfStock,
}

/// Merge the selection into the product and hand it to `handler`.
///
/// Out-of-stock products never reach the handler, whatever state the
/// controls are in.
pub fn activate<F>(
    product: &ProductRecord,
    display: &DerivedDisplay,
    selection: &Selection,
    handler: Option<F>,
) -> DispatchOutcome
where
    F: FnOnce(SelectedProduct),
{
    if !display.in_stock {
        return DispatchOutcome::OutOfStock;
    }

    let selected = product.with_selection(selection.current().map(str::to_string));
    match handler {
        Some(handler) => {
            handler(selected);
            DispatchOutcome::Dispatched
        }
        None => DispatchOutcome::Unhandled,
    }
}
