use market_sim::format::{grouped_int, parse_leading_int};

pub const COUNTER_SELECTOR: &str = "[data-target]";
pub const COUNTER_THRESHOLD: f64 = 0.5;

/// Linear count from zero up to `target` in fixed frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: f64,
    step: f64,
    current: f64,
    decimal: bool,
    done: bool,
}

impl CounterAnimation {
    /// `decimal` keeps one fractional digit, for figures shown with a `.`.
    pub fn new(target: i64, duration_ms: u32, frame_ms: u32, decimal: bool) -> Self {
        let frames = (f64::from(duration_ms) / f64::from(frame_ms.max(1))).max(1.0);
        let target = target as f64;
        Self {
            target,
            step: target / frames,
            current: 0.0,
            decimal,
            done: false,
        }
    }

    /// From the element's `data-target` attribute and current text.
    pub fn from_element_parts(
        data_target: &str,
        current_text: &str,
        duration_ms: u32,
        frame_ms: u32,
    ) -> Option<Self> {
        let target = parse_leading_int(data_target)?;
        Some(Self::new(
            target,
            duration_ms,
            frame_ms,
            current_text.contains('.'),
        ))
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance one frame and return the text to show.
    pub fn advance(&mut self) -> String {
        self.current += self.step;
        let reached = if self.step >= 0.0 {
            self.current >= self.target
        } else {
            self.current <= self.target
        };
        if reached {
            self.current = self.target;
            self.done = true;
        }
        self.text()
    }

    pub fn text(&self) -> String {
        if self.decimal {
            format!("{:.1}", self.current)
        } else {
            grouped_int(self.current.floor() as i64)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn init_counters(duration_ms: u32, frame_ms: u32) -> Result<(), crate::ShellError> {
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

    use crate::dom;

    let counters = dom::query_all(COUNTER_SELECTOR);
    if counters.is_empty() {
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let el = entry.target();
                observer.unobserve(&el);
                let target = el.get_attribute("data-target").unwrap_or_default();
                let Some(mut anim) =
                    CounterAnimation::from_element_parts(&target, &dom::text(&el), duration_ms, frame_ms)
                else {
                    log::warn!("counter skipped, data-target {target:?}");
                    continue;
                };
                spawn_local(async move {
                    while !anim.is_done() {
                        TimeoutFuture::new(frame_ms).await;
                        dom::set_text(&el, &anim.advance());
                    }
                });
            }
        },
    ));
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(COUNTER_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for el in &counters {
        observer.observe(el);
    }
    Ok(())
}
