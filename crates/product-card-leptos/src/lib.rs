//! Leptos binding for the product card.
//!
//! Display values are a [`Memo`] over the product signal; the selected
//! variant is an [`RwSignal`] seeded once at mount and, like the core
//! controller's default policy, not re-derived when the product changes.
//! Labels, classes and text formatting come from the core crate, so this
//! component and [`product_card::render`] produce the same card.
//!
//! ```rust,ignore
//! use leptos::prelude::*;
//! use product_card_leptos::ProductCard;
//!
//! view! {
//!     <ProductCard
//!         product=product
//!         to="/product/42"
//!         on_add_to_cart=Callback::new(move |item| cart.update(|c| c.push(item)))
//!     />
//! }
//! ```

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use product_card::{
    add_to_cart_label, classes, description_text, dispatch, price_label, resolve_with,
    CardConfig, DerivedDisplay, DispatchOutcome, ProductRecord, SelectedProduct, Selection,
};

pub use product_card;

/// Reactive state behind one mounted card.
#[derive(Debug, Clone, Copy)]
pub struct CardState {
    pub product: Signal<ProductRecord>,
    pub display: Memo<DerivedDisplay>,
    pub selected: RwSignal<Selection>,
}

impl CardState {
    /// Derive the display from `product` and seed the selection from it once.
    pub fn new(product: Signal<ProductRecord>, placeholder_title: String) -> Self {
        let display = Memo::new(move |_| product.with(|p| resolve_with(p, &placeholder_title)));
        let selected = RwSignal::new(display.with_untracked(Selection::initial));
        Self {
            product,
            display,
            selected,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.display.with(|d| d.in_stock)
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.selected.with(|s| s.is_selected(label))
    }

    /// Select a variant label. No availability check is made.
    pub fn select(&self, label: String) {
        self.selected.update(|s| {
            s.select(label);
        });
    }

    /// Run the add-to-cart dispatcher against the current state.
    pub fn add_to_cart(&self, handler: Option<Callback<SelectedProduct>>) -> DispatchOutcome {
        let display = self.display.get_untracked();
        let selection = self.selected.get_untracked();
        let handler = handler.map(|cb| move |item: SelectedProduct| cb.run(item));
        self.product
            .with_untracked(|p| dispatch::activate(p, &display, &selection, handler))
    }
}

/// Responsive product card.
#[component]
pub fn ProductCard(
    /// Product to display.
    #[prop(into)]
    product: Signal<ProductRecord>,
    /// Details route; turns the Buy control into a link.
    #[prop(optional, into)]
    to: Option<String>,
    /// Receives the product with `selectedVariant` attached.
    #[prop(optional)]
    on_add_to_cart: Option<Callback<SelectedProduct>>,
    /// Classes for the outer wrapper column, not the card.
    #[prop(optional, into)]
    class_name: Option<String>,
    /// Presentation settings.
    #[prop(optional)]
    config: Option<CardConfig>,
) -> impl IntoView {
    let config = StoredValue::new(config.unwrap_or_default());
    let wrapper_class = class_name.unwrap_or_else(|| config.with_value(|c| c.wrapper_class.clone()));

    let state = CardState::new(product, config.with_value(|c| c.placeholder_title.clone()));
    let display = state.display;

    let in_stock = move || state.in_stock();
    let title = move || display.with(|d| d.title.clone());

    let badge = move || product.with(|p| p.badge());
    let image = move || product.with(|p| p.image().map(str::to_string));
    let description = move || product.with(|p| config.with_value(|c| description_text(p, c)));
    let price = move || display.with(|d| config.with_value(|c| price_label(d, c)));
    let add_label =
        move || display.with(|d| config.with_value(|c| add_to_cart_label(d, c).to_string()));
    let oos_label = config.with_value(|c| c.out_of_stock_label.clone());
    let buy_label = config.with_value(|c| c.buy_label.clone());

    let chips = move || {
        let options = display.with(|d| d.variant_options.clone());
        (!options.is_empty()).then(|| {
            view! {
                <div class=classes::CHIP_ROW>
                    {options
                        .into_iter()
                        .map(|opt| {
                            let label = opt.clone();
                            let current = opt.clone();
                            view! {
                                <button
                                    type="button"
                                    class=classes::CHIP
                                    class:active=move || state.is_selected(&current)
                                    on:click=move |_| state.select(label.clone())
                                >
                                    {opt}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    };

    let buy = match to {
        Some(href) => view! {
            <a
                href=href
                class=classes::BUY
                aria-label=config.with_value(|c| c.buy_aria_label.clone())
            >
                {buy_label}
            </a>
        }
        .into_any(),
        None => view! {
            <button
                type="button"
                class=classes::BUY
                disabled=move || !in_stock()
                on:click=move |_| {
                    state.add_to_cart(on_add_to_cart);
                }
            >
                {buy_label}
            </button>
        }
        .into_any(),
    };

    view! {
        <div class=wrapper_class>
            <div class=classes::CARD>
                <div class=classes::MEDIA>
                    {move || badge().map(|b| view! { <span class=classes::BADGE>{b}</span> })}
                    <img class=classes::IMAGE src=image alt=title />
                    {move || (!in_stock()).then(|| view! {
                        <span class=classes::OUT_OF_STOCK_OVERLAY>{oos_label.clone()}</span>
                    })}
                </div>

                <div class=classes::BODY>
                    <div class=classes::PRICE>{price}</div>
                    <h5 class=classes::TITLE title=title>
                        {title}
                    </h5>
                    {move || description().map(|text| view! {
                        <p class=classes::DESCRIPTION>{text}</p>
                    })}
                    {chips}
                    <div class=classes::ACTION_ROW>
                        {buy}
                        <button
                            class=classes::ADD_TO_CART
                            disabled=move || !in_stock()
                            on:click=move |_| {
                                state.add_to_cart(on_add_to_cart);
                            }
                        >
                            {add_label}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    fn record(value: serde_json::Value) -> ProductRecord {
        ProductRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_display_follows_product_and_selection_is_kept() {
        Owner::new().with(|| {
            let product = RwSignal::new(record(json!({"title": "Shoe", "variants": ["8", "9"]})));
            let state = CardState::new(product.into(), "Untitled".to_string());
            assert_eq!(state.selected.get_untracked().current(), Some("8"));

            product.set(record(json!({"name": "Boot", "sizes": ["S", "M"], "stock": 0})));

            let display = state.display.get_untracked();
            assert_eq!(display.title, "Boot");
            assert_eq!(display.variant_options, vec!["S", "M"]);
            assert!(!display.in_stock);
            assert_eq!(state.selected.get_untracked().current(), Some("8"));
        });
    }

    #[test]
    fn test_add_to_cart_passes_selected_variant() {
        Owner::new().with(|| {
            let input = json!({"title": "Shoe", "sizes": [8, 9], "inStock": "yes"});
            let product = RwSignal::new(record(input.clone()));
            let state = CardState::new(product.into(), "Untitled".to_string());
            state.select("9".to_string());

            let received = Arc::new(Mutex::new(Vec::new()));
            let sink = received.clone();
            let handler = Callback::new(move |item: SelectedProduct| {
                sink.lock().unwrap().push(item.to_value().unwrap());
            });

            assert_eq!(state.add_to_cart(Some(handler)), DispatchOutcome::Dispatched);
            let mut expected = input;
            expected["selectedVariant"] = json!("9");
            assert_eq!(*received.lock().unwrap(), vec![expected]);
        });
    }

    #[test]
    fn test_add_to_cart_is_gated_by_stock() {
        Owner::new().with(|| {
            let product = RwSignal::new(record(json!({"inStock": false})));
            let state = CardState::new(product.into(), "Untitled".to_string());

            let calls = Arc::new(Mutex::new(0));
            let counter = calls.clone();
            let handler = Callback::new(move |_: SelectedProduct| *counter.lock().unwrap() += 1);

            assert_eq!(state.add_to_cart(Some(handler)), DispatchOutcome::OutOfStock);
            assert_eq!(state.add_to_cart(None), DispatchOutcome::OutOfStock);
            assert_eq!(*calls.lock().unwrap(), 0);
        });
    }

    #[cfg(feature = "ssr")]
    mod ssr {
        use super::*;
        use leptos::tachys::view::RenderHtml;

        fn render_html(value: serde_json::Value, to: Option<&str>) -> String {
            Owner::new().with(|| {
                let product = Signal::derive(move || record(value.clone()));
                match to {
                    Some(to) => view! { <ProductCard product=product to=to.to_string() /> }
                        .to_html(),
                    None => view! { <ProductCard product=product /> }.to_html(),
                }
            })
        }

        #[test]
        fn test_out_of_stock_disables_both_buttons() {
            let html = render_html(json!({"title": "Shoe", "stock": 0}), None);
            assert_eq!(html.matches("disabled").count(), 2);
            assert!(html.contains(classes::OUT_OF_STOCK_OVERLAY));
            assert!(html.contains("Out of Stock"));
        }

        #[test]
        fn test_destination_renders_link() {
            let html = render_html(json!({"title": "Shoe", "inStock": false}), Some("/product/42"));
            assert!(html.contains(r#"href="/product/42""#));
            assert!(html.contains(r#"aria-label="Buy product""#));
            assert_eq!(html.matches("disabled").count(), 1);
        }

        #[test]
        fn test_markup_matches_core_renderer() {
            let html = render_html(
                json!({
                    "title": "Shoe",
                    "price": 49.0,
                    "badge": 0,
                    "description": "x".repeat(85),
                    "variants": ["S", "M"]
                }),
                None,
            );
            assert!(html.contains("$49"));
            assert!(!html.contains("$49.0"));
            assert!(!html.contains(classes::BADGE));
            assert!(html.contains(&format!("{}...", "x".repeat(70))));
            assert_eq!(html.matches(" active").count(), 1);
            for class in [classes::CARD, classes::PRICE, classes::TITLE, classes::ACTION_ROW] {
                assert!(html.contains(class), "missing {class}");
            }
        }
    }
}
