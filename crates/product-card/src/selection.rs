//! Variant selection state.

use crate::config::SelectionPolicy;
use crate::resolve::DerivedDisplay;

/// The variant currently chosen on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    /// Initial selection for a freshly mounted card: the first option, if any.
    ///
    /// An empty first label selects nothing.
    pub fn initial(display: &DerivedDisplay) -> Self {
        Self {
            current: first_label(display),
        }
    }

    /// The chosen label.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether `label` is the chosen one.
    pub fn is_selected(&self, label: &str) -> bool {
        self.current.as_deref() == Some(label)
    }

    /// Replace the selection unconditionally, returning the previous one.
    pub fn select(&mut self, label: impl Into<String>) -> Option<String> {
        self.current.replace(label.into())
    }

    /// Apply `policy` after the product changed. Returns true if the
    /// selection was modified.
    pub fn reconcile(&mut self, display: &DerivedDisplay, policy: SelectionPolicy) -> bool {
        match policy {
            SelectionPolicy::Retain => false,
            SelectionPolicy::Resync => {
                let still_offered = self
                    .current
                    .as_deref()
                    .map(|label| display.offers(label))
                    .unwrap_or(false);
                if still_offered {
                    return false;
                }
                let next = first_label(display);
                if next == self.current {
                    return false;
                }
                self.current = next;
                true
            }
        }
    }
}

fn first_label(display: &DerivedDisplay) -> Option<String> {
    display
        .first_option()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}
