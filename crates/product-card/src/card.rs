//! Mounted product card.
//!
//! [`ProductCard`] is the stateful half of the component: it owns the props,
//! the derived display values and the selection, routes clicks, and re-renders
//! to its subscribers after every state change. Everything runs synchronously
//! on the caller's thread.

use std::fmt;

use crate::config::CardConfig;
use crate::dispatch::{self, BuyAction, Destination, DispatchOutcome};
use crate::logging::{CardLogger, LogSink};
use crate::record::{ProductRecord, SelectedProduct};
use crate::render::{render, RenderInput};
use crate::resolve::{resolve_with, DerivedDisplay};
use crate::selection::Selection;
use crate::view::{Control, ViewNode};

/// Receives the product with the selected variant attached.
pub type AddToCartHandler = Box<dyn FnMut(SelectedProduct)>;

/// Observes Buy-link activations.
pub type NavigateHandler = Box<dyn FnMut(&Destination)>;

/// Receives the re-rendered tree after a state change.
pub type RenderListener = Box<dyn FnMut(&ViewNode)>;

/// Handle returned by [`ProductCard::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Result of clicking a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The add-to-cart dispatcher ran.
    Dispatched(DispatchOutcome),
    /// The Buy link was followed.
    Navigated(Destination),
    /// A chip was clicked and its label is now selected.
    Selected(String),
    /// The control is disabled or does not exist.
    Ignored,
}

/// Builder for [`ProductCard`].
pub struct ProductCardBuilder {
    product: ProductRecord,
    destination: Option<Destination>,
    class_name: Option<String>,
    config: CardConfig,
    on_add_to_cart: Option<AddToCartHandler>,
    on_navigate: Option<NavigateHandler>,
    log_sink: LogSink,
}

impl ProductCardBuilder {
    /// Make the Buy control a link to `destination`.
    pub fn destination(mut self, destination: impl Into<Destination>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Override the outer wrapper class.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn config(mut self, config: CardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_add_to_cart(mut self, handler: impl FnMut(SelectedProduct) + 'static) -> Self {
        self.on_add_to_cart = Some(Box::new(handler));
        self
    }

    pub fn on_navigate(mut self, handler: impl FnMut(&Destination) + 'static) -> Self {
        self.on_navigate = Some(Box::new(handler));
        self
    }

    pub fn log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = sink;
        self
    }

    /// Derive display values and the initial selection.
    pub fn mount(self) -> ProductCard {
        let logger = CardLogger::new("product-card")
            .with_min_level(self.config.log_level)
            .with_format(self.config.log_format)
            .with_sink(self.log_sink);

        let display = resolve_with(&self.product, &self.config.placeholder_title);
        let selection = Selection::initial(&display);

        logger
            .debug_builder("card mounted")
            .field("title", display.title.as_str())
            .field_bool("in_stock", display.in_stock)
            .field_usize("variants", display.variant_options.len())
            .field_opt("selected", selection.current())
            .emit();

        ProductCard {
            product: self.product,
            destination: self.destination,
            class_name: self.class_name,
            config: self.config,
            display,
            selection,
            on_add_to_cart: self.on_add_to_cart,
            on_navigate: self.on_navigate,
            listeners: Vec::new(),
            next_subscription: 0,
            logger,
        }
    }
}

/// A mounted product card.
pub struct ProductCard {
    product: ProductRecord,
    destination: Option<Destination>,
    class_name: Option<String>,
    config: CardConfig,
    display: DerivedDisplay,
    selection: Selection,
    on_add_to_cart: Option<AddToCartHandler>,
    on_navigate: Option<NavigateHandler>,
    listeners: Vec<(SubscriptionId, RenderListener)>,
    next_subscription: u64,
    logger: CardLogger,
}

impl fmt::Debug for ProductCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductCard")
            .field("product", &self.product)
            .field("destination", &self.destination)
            .field("display", &self.display)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ProductCard {
    /// Start configuring a card for `product`.
    pub fn builder(product: ProductRecord) -> ProductCardBuilder {
        ProductCardBuilder {
            product,
            destination: None,
            class_name: None,
            config: CardConfig::default(),
            on_add_to_cart: None,
            on_navigate: None,
            log_sink: LogSink::default(),
        }
    }

    /// Mount a card with default settings and no handlers.
    pub fn new(product: ProductRecord) -> Self {
        Self::builder(product).mount()
    }

    pub fn product(&self) -> &ProductRecord {
        &self.product
    }

    pub fn display(&self) -> &DerivedDisplay {
        &self.display
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_variant(&self) -> Option<&str> {
        self.selection.current()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn is_in_stock(&self) -> bool {
        self.display.in_stock
    }

    /// Replace the product record and re-derive display values.
    ///
    /// The selection is only touched under [`SelectionPolicy::Resync`].
    ///
    /// [`SelectionPolicy::Resync`]: crate::config::SelectionPolicy::Resync
    pub fn set_product(&mut self, product: ProductRecord) {
        self.product = product;
        self.display = resolve_with(&self.product, &self.config.placeholder_title);
        let resynced = self
            .selection
            .reconcile(&self.display, self.config.selection_policy);

        self.logger
            .debug_builder("product updated")
            .field("title", self.display.title.as_str())
            .field_bool("in_stock", self.display.in_stock)
            .field_opt("selected", self.selection.current())
            .field_bool("resynced", resynced)
            .emit();

        self.notify();
    }

    /// Switch between link mode and button mode for the Buy control.
    pub fn set_destination(&mut self, destination: Option<Destination>) {
        self.destination = destination;
        self.notify();
    }

    /// Replace or clear the add-to-cart handler.
    pub fn set_on_add_to_cart(&mut self, handler: Option<AddToCartHandler>) {
        self.on_add_to_cart = handler;
    }

    /// Select a variant label. No availability check is made.
    pub fn select_variant(&mut self, label: impl Into<String>) {
        let label = label.into();
        let previous = self.selection.select(label.clone());

        self.logger
            .debug_builder("variant selected")
            .field("variant", label)
            .field_opt("previous", previous.as_deref())
            .emit();

        self.notify();
    }

    /// Run the add-to-cart dispatcher.
    pub fn activate(&mut self) -> DispatchOutcome {
        let outcome = dispatch::activate(
            &self.product,
            &self.display,
            &self.selection,
            self.on_add_to_cart.as_mut(),
        );

        match outcome {
            DispatchOutcome::Dispatched => self
                .logger
                .info_builder("add to cart dispatched")
                .field("title", self.display.title.as_str())
                .field_opt("variant", self.selection.current())
                .emit(),
            DispatchOutcome::Unhandled => self.logger.debug("add to cart without handler"),
            DispatchOutcome::OutOfStock => self.logger.debug("add to cart suppressed: out of stock"),
        }

        outcome
    }

    /// Handle a click on `control`, as a browser would deliver it.
    ///
    /// Clicks on disabled buttons are dropped.
    pub fn click(&mut self, control: Control) -> ClickOutcome {
        match control {
            Control::Buy => match BuyAction::for_destination(self.destination.as_ref()) {
                BuyAction::Navigate(dest) => {
                    self.logger
                        .info_builder("buy link followed")
                        .field("destination", dest.as_str())
                        .emit();
                    if let Some(handler) = self.on_navigate.as_mut() {
                        handler(&dest);
                    }
                    ClickOutcome::Navigated(dest)
                }
                BuyAction::Dispatch if self.display.in_stock => {
                    ClickOutcome::Dispatched(self.activate())
                }
                BuyAction::Dispatch => ClickOutcome::Ignored,
            },
            Control::AddToCart if self.display.in_stock => {
                ClickOutcome::Dispatched(self.activate())
            }
            Control::AddToCart => ClickOutcome::Ignored,
            Control::Chip(index) => match self.display.variant_options.get(index).cloned() {
                Some(label) => {
                    self.select_variant(label.clone());
                    ClickOutcome::Selected(label)
                }
                None => ClickOutcome::Ignored,
            },
        }
    }

    /// Render the current state.
    pub fn render(&self) -> ViewNode {
        render(RenderInput {
            product: &self.product,
            display: &self.display,
            selection: &self.selection,
            destination: self.destination.as_ref(),
            class_name: self.class_name.as_deref(),
            config: &self.config,
        })
    }

    /// Render the current state as HTML.
    pub fn to_html(&self) -> String {
        self.render().to_html()
    }

    /// Register a listener called with a fresh render after each change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewNode) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let view = self.render();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionPolicy;
    use crate::logging::{LogFormat, LogLevel, MemoryLog};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shoe() -> ProductRecord {
        ProductRecord::new()
            .with_title("Shoe")
            .with_price(49)
            .with_in_stock(true)
            .with_variants(["8", "9"])
    }

    #[test]
    fn test_click_chip_selects_and_notifies() {
        let mut card = ProductCard::new(shoe());
        let renders = Rc::new(RefCell::new(Vec::new()));
        let sink = renders.clone();
        card.subscribe(move |view| sink.borrow_mut().push(view.to_html()));

        assert_eq!(card.click(Control::Chip(1)), ClickOutcome::Selected("9".to_string()));
        assert_eq!(card.selected_variant(), Some("9"));
        assert_eq!(renders.borrow().len(), 1);
        assert!(renders.borrow()[0].contains(r#"<button type="button" class="variant-chip active">9</button>"#));
    }

    #[test]
    fn test_unknown_chip_is_ignored() {
        let mut card = ProductCard::new(shoe());
        assert_eq!(card.click(Control::Chip(5)), ClickOutcome::Ignored);
        assert_eq!(card.selected_variant(), Some("8"));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut card = ProductCard::new(shoe());
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = card.subscribe(move |_| *counter.borrow_mut() += 1);

        card.select_variant("9");
        assert!(card.unsubscribe(id));
        assert!(!card.unsubscribe(id));
        card.select_variant("8");

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_disabled_clicks_are_dropped() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let mut card = ProductCard::builder(shoe().with_in_stock(false))
            .on_add_to_cart(move |_| *counter.borrow_mut() += 1)
            .mount();

        assert_eq!(card.click(Control::Buy), ClickOutcome::Ignored);
        assert_eq!(card.click(Control::AddToCart), ClickOutcome::Ignored);
        assert_eq!(card.activate(), DispatchOutcome::OutOfStock);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_retain_policy_keeps_stale_selection() {
        let mut card = ProductCard::new(shoe());
        card.set_product(ProductRecord::new().with_sizes(["S", "M"]));

        assert_eq!(card.display().variant_options, vec!["S", "M"]);
        assert_eq!(card.selected_variant(), Some("8"));
        let chips = card.render();
        assert!(chips.find_by_class("active").is_none());
    }

    #[test]
    fn test_resync_policy_resets_selection() {
        let mut card = ProductCard::builder(shoe())
            .config(CardConfig::new().with_selection_policy(SelectionPolicy::Resync))
            .mount();
        card.set_product(ProductRecord::new().with_sizes(["S", "M"]));
        assert_eq!(card.selected_variant(), Some("S"));
    }

    #[test]
    fn test_destination_toggle() {
        let mut card = ProductCard::new(shoe());
        card.set_destination(Some(Destination::from("/product/7")));
        assert_eq!(card.render().find_control(Control::Buy).unwrap().tag, "a");
        card.set_destination(None);
        assert_eq!(card.render().find_control(Control::Buy).unwrap().tag, "button");
    }

    #[test]
    fn test_class_name_override() {
        let card = ProductCard::builder(shoe()).class_name("col-12").mount();
        let view = card.render();
        assert_eq!(view.as_element().unwrap().get_attr("class"), Some("col-12"));
    }

    #[test]
    fn test_logs_dispatch() {
        let memory = MemoryLog::new();
        let mut card = ProductCard::builder(shoe())
            .config(CardConfig::new().with_log_level(LogLevel::Debug))
            .on_add_to_cart(|_| {})
            .log_sink(LogSink::Memory(memory.clone()))
            .mount();

        card.click(Control::AddToCart);

        assert_eq!(
            memory.messages(),
            vec!["card mounted".to_string(), "add to cart dispatched".to_string()]
        );
    }

    #[test]
    fn test_human_log_lines_carry_instance() {
        let memory = MemoryLog::new();
        let mut card = ProductCard::builder(shoe())
            .config(CardConfig::new().with_log_format(LogFormat::Human))
            .on_add_to_cart(|_| {})
            .log_sink(LogSink::Memory(memory.clone()))
            .mount();

        card.click(Control::Chip(1));
        card.click(Control::AddToCart);

        let instance = memory.entries()[0].instance.clone();
        assert_eq!(
            memory.lines(),
            vec![format!(
                r#"[INFO] {} add to cart dispatched | title="Shoe" variant="9""#,
                instance
            )]
        );
    }
}
