//! Card renderer.

use crate::classes;
use crate::config::CardConfig;
use crate::dispatch::{BuyAction, Destination};
use crate::record::ProductRecord;
use crate::resolve::DerivedDisplay;
use crate::selection::Selection;
use crate::view::{Control, Element, ViewNode};

/// Everything one render reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub product: &'a ProductRecord,
    pub display: &'a DerivedDisplay,
    pub selection: &'a Selection,
    pub destination: Option<&'a Destination>,
    /// Outer wrapper class; the configured default when `None`.
    pub class_name: Option<&'a str>,
    pub config: &'a CardConfig,
}

/// Shorten `text` to `limit` characters followed by `ellipsis`, or return it
/// unchanged when it fits.
pub fn truncate_description(text: &str, limit: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ellipsis),
        None => text.to_string(),
    }
}

/// Currency symbol followed by the price.
pub fn price_label(display: &DerivedDisplay, config: &CardConfig) -> String {
    format!("{}{}", config.currency_symbol, display.price_text())
}

/// Description as shown on the card, truncated; `None` when it is not shown.
pub fn description_text(product: &ProductRecord, config: &CardConfig) -> Option<String> {
    product
        .description()
        .map(|text| truncate_description(&text, config.description_limit, &config.ellipsis))
}

/// Label of the add-to-cart control for the current stock state.
pub fn add_to_cart_label<'a>(display: &DerivedDisplay, config: &'a CardConfig) -> &'a str {
    if display.in_stock {
        &config.add_to_cart_label
    } else {
        &config.out_of_stock_label
    }
}

/// Render a card.
pub fn render(input: RenderInput<'_>) -> ViewNode {
    let RenderInput {
        product,
        display,
        selection,
        destination,
        class_name,
        config,
    } = input;

    let card = Element::new("div")
        .class(classes::CARD)
        .child(render_media(product, display, config))
        .child(render_body(product, display, selection, destination, config));

    Element::new("div")
        .class(class_name.unwrap_or(config.wrapper_class.as_str()))
        .child(card)
        .into()
}

fn render_media(product: &ProductRecord, display: &DerivedDisplay, config: &CardConfig) -> Element {
    let badge = product
        .badge()
        .map(|badge| Element::new("span").class(classes::BADGE).text(badge));

    let image = Element::new("img")
        .class(classes::IMAGE)
        .attr_opt("src", product.image())
        .attr("alt", display.title.as_str());

    let overlay = (!display.in_stock).then(|| {
        Element::new("span")
            .class(classes::OUT_OF_STOCK_OVERLAY)
            .text(config.out_of_stock_label.as_str())
    });

    Element::new("div")
        .class(classes::MEDIA)
        .child_opt(badge)
        .child(image)
        .child_opt(overlay)
}

fn render_body(
    product: &ProductRecord,
    display: &DerivedDisplay,
    selection: &Selection,
    destination: Option<&Destination>,
    config: &CardConfig,
) -> Element {
    let price = Element::new("div")
        .class(classes::PRICE)
        .text(price_label(display, config));

    let title = Element::new("h5")
        .class(classes::TITLE)
        .attr("title", display.title.as_str())
        .text(display.title.as_str());

    let description =
        description_text(product, config).map(|text| Element::new("p").class(classes::DESCRIPTION).text(text));

    Element::new("div")
        .class(classes::BODY)
        .child(price)
        .child(title)
        .child_opt(description)
        .child_opt(render_chips(display, selection))
        .child(render_actions(display, destination, config))
}

fn render_chips(display: &DerivedDisplay, selection: &Selection) -> Option<Element> {
    if display.variant_options.is_empty() {
        return None;
    }

    let chips = display.variant_options.iter().enumerate().map(|(i, opt)| {
        let class = if selection.is_selected(opt) {
            classes::CHIP_ACTIVE
        } else {
            classes::CHIP
        };
        ViewNode::from(
            Element::new("button")
                .attr("type", "button")
                .class(class)
                .control(Control::Chip(i))
                .text(opt.as_str()),
        )
    });

    Some(
        Element::new("div")
            .class(classes::CHIP_ROW)
            .children(chips),
    )
}

fn render_actions(
    display: &DerivedDisplay,
    destination: Option<&Destination>,
    config: &CardConfig,
) -> Element {
    let buy = match BuyAction::for_destination(destination) {
        BuyAction::Navigate(dest) => Element::new("a")
            .attr("href", dest.as_str())
            .class(classes::BUY)
            .attr("aria-label", config.buy_aria_label.as_str())
            .control(Control::Buy)
            .text(config.buy_label.as_str()),
        BuyAction::Dispatch => Element::new("button")
            .attr("type", "button")
            .class(classes::BUY)
            .control(Control::Buy)
            .disabled(!display.in_stock)
            .text(config.buy_label.as_str()),
    };

    let add_to_cart = Element::new("button")
        .class(classes::ADD_TO_CART)
        .control(Control::AddToCart)
        .disabled(!display.in_stock)
        .text(add_to_cart_label(display, config));

    Element::new("div")
        .class(classes::ACTION_ROW)
        .child(buy)
        .child(add_to_cart)
}
