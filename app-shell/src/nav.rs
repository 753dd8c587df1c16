//! Header navigation, scroll-spy, reveal-on-scroll and the hero parallax.

/// Sections count as reached this many px before their top edge.
pub const SCROLL_SPY_OFFSET: f64 = 100.0;
pub const PARALLAX_SPEED: f64 = 0.5;
pub const REVEAL_SELECTOR: &str = ".feature-card, .security-item, .info-card";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Id of the section under `scroll_y`. With overlapping boxes the last one wins.
pub fn active_section(scroll_y: f64, sections: &[SectionBox]) -> Option<&str> {
    sections
        .iter()
        .filter(|s| {
            let top = s.top - SCROLL_SPY_OFFSET;
            scroll_y >= top && scroll_y < top + s.height
        })
        .last()
        .map(|s| s.id.as_str())
}

pub fn parallax_transform(scroll_y: f64) -> String {
    format!("translateY({}px)", scroll_y * PARALLAX_SPEED)
}

/// In-page target of an `href="#id"` link.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{init_animations, init_navigation};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
        ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    };

    use super::*;
    use crate::dom;
    use crate::ShellError;

    const NAV_LINKS: &str = ".nav-link[href^=\"#\"]";

    pub fn init_navigation() -> Result<(), ShellError> {
        if let (Some(hamburger), Some(menu)) = (dom::query(".hamburger"), dom::query(".nav-menu")) {
            let target = hamburger.clone();
            dom::on(&target, "click", move |_| {
                dom::toggle_class(&menu, "active");
                dom::toggle_class(&hamburger, "active");
            })?;
        }

        for link in dom::query_all(NAV_LINKS) {
            let anchor = link.clone();
            dom::on(&link, "click", move |event| {
                event.prevent_default();
                let href = anchor.get_attribute("href").unwrap_or_default();
                let Some(target) = anchor_target(&href).and_then(dom::by_id) else {
                    return;
                };
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                target.scroll_into_view_with_scroll_into_view_options(&options);
            })?;
        }

        let window = dom::window()?;
        dom::on_passive(&window, "scroll", |_| update_active_link())?;
        Ok(())
    }

    fn update_active_link() {
        let Ok(window) = dom::window() else {
            return;
        };
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let sections: Vec<SectionBox> = dom::query_all("section[id]")
            .into_iter()
            .filter_map(|el| {
                let html = el.dyn_ref::<HtmlElement>()?;
                Some(SectionBox {
                    id: el.id(),
                    top: html.offset_top() as f64,
                    height: html.offset_height() as f64,
                })
            })
            .collect();
        let current = active_section(scroll_y, &sections).map(|id| format!("#{id}"));
        for link in dom::query_all(NAV_LINKS) {
            dom::remove_class(&link, "active");
            if current.is_some() && link.get_attribute("href") == current {
                dom::add_class(&link, "active");
            }
        }
    }

    pub fn init_animations() -> Result<(), ShellError> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::wrap(Box::new(
            |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        dom::add_class(&entry.target(), "animate-in");
                    }
                }
            },
        ));
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        callback.forget();
        for el in dom::query_all(REVEAL_SELECTOR) {
            observer.observe(&el);
        }

        let window = dom::window()?;
        dom::on_passive(&window, "scroll", |_| {
            let Ok(window) = dom::window() else {
                return;
            };
            let transform = parallax_transform(window.page_y_offset().unwrap_or(0.0));
            for el in dom::query_all(".floating-shapes") {
                dom::set_style(&el, "transform", &transform);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_section(id: &str, top: f64, height: f64) -> SectionBox {
        SectionBox {
            id: id.to_string(),
            top,
            height,
        }
    }

    #[test]
    fn section_becomes_active_early() {
        let sections = [mk_section("home", 0.0, 600.0), mk_section("features", 600.0, 800.0)];
        assert_eq!(active_section(0.0, &sections), Some("home"));
        assert_eq!(active_section(499.0, &sections), Some("home"));
        assert_eq!(active_section(500.0, &sections), Some("features"));
        assert_eq!(active_section(1299.0, &sections), Some("features"));
        assert_eq!(active_section(1300.0, &sections), None);
    }

    #[test]
    fn parallax_moves_half_speed() {
        assert_eq!(parallax_transform(0.0), "translateY(0px)");
        assert_eq!(parallax_transform(300.0), "translateY(150px)");
        assert_eq!(parallax_transform(15.0), "translateY(7.5px)");
    }

    #[test]
    fn anchors() {
        assert_eq!(anchor_target("#features"), Some("features"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("login.html"), None);
    }
}
