//! Trading page: live quotes, account header, charts and the order ticket.

use data_feed::CandleWalk;
use market_sim::format::{parse_display_number, parse_leading_int};
use market_sim::{AccountSnapshot, OrderKind, OrderSide, Quote, QuoteTick, SimConfig};
use market_sim::quote::QUOTE_DRIFT;
use rand::Rng;
use ts_core::TimeFrame;

pub const ORDER_SUCCESS_TITLE: &str = "تم تنفيذ الأمر بنجاح!";
pub const LOT_SUFFIX: &str = "لوت";

/// Everything the page ticks, seeded once from the rendered markup.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingState {
    pub cfg: SimConfig,
    /// One slot per watch-list row; rows whose price did not parse stay `None`.
    pub quotes: Vec<Option<Quote>>,
    pub header: Option<Quote>,
    pub account: AccountSnapshot,
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub side: OrderSide,
}

fn read_quote(text: &str) -> Option<Quote> {
    match parse_display_number(text) {
        Ok(price) => Some(Quote::new(price)),
        Err(err) => {
            log::warn!("quote skipped: {err}");
            None
        }
    }
}

impl TradingState {
    pub fn new(cfg: SimConfig) -> Self {
        Self {
            symbol: cfg.symbol.clone(),
            cfg,
            quotes: Vec::new(),
            header: None,
            account: AccountSnapshot::default(),
            timeframe: TimeFrame::default(),
            side: OrderSide::Buy,
        }
    }

    pub fn seed_quotes<'a, I>(&mut self, texts: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.quotes = texts.into_iter().map(read_quote).collect();
    }

    pub fn seed_header(&mut self, text: Option<&str>) {
        self.header = text.and_then(read_quote);
    }

    pub fn tick_quotes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Option<QuoteTick>> {
        self.quotes
            .iter_mut()
            .map(|q| q.as_mut().map(|q| q.tick(rng, &QUOTE_DRIFT)))
            .collect()
    }

    pub fn tick_header<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<QuoteTick> {
        self.header.as_mut().map(|q| q.tick(rng, &QUOTE_DRIFT))
    }

    pub fn tick_account<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.account.tick(rng);
    }

    pub fn select_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }

    /// Unknown or missing timeframes keep the current one.
    pub fn select_timeframe(&mut self, raw: Option<&str>) {
        match raw.and_then(TimeFrame::from_str) {
            Some(tf) => self.timeframe = tf,
            None => log::debug!("timeframe {raw:?} not recognised, keeping {}", self.timeframe.name()),
        }
    }

    pub fn candle_walk(&self) -> CandleWalk {
        CandleWalk::default().with_start_price(self.cfg.start_price)
    }

    pub fn instrument_price_text(&self) -> String {
        self.cfg.instrument_price.to_string()
    }
}

pub fn open_positions_after_fill(text: &str) -> i64 {
    parse_leading_int(text).unwrap_or(0) + 1
}

pub fn limit_group_display(kind: OrderKind) -> &'static str {
    if kind.needs_limit_price() {
        "block"
    } else {
        "none"
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{adjust_volume, close_order_modal, init_trading_page, set_volume};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chart_frontend::{render_performance_chart, render_sparkline, render_trading_chart, CanvasBackend};
    use data_feed::{generate_candles, EquityWalk, SparkWalk};
    use gloo_timers::future::TimeoutFuture;
    use market_sim::order::{execution_delay_ms, step_volume, volume_text};
    use market_sim::{OrderKind, OrderReceipt, OrderSide, OrderTicket, SimConfig};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Element, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use super::*;
    use crate::dom;
    use crate::ShellError;

    /// Elements the tick writes to, looked up once.
    struct TradingView {
        prices: Vec<Element>,
        changes: Vec<Element>,
        header_price: Option<Element>,
        header_change: Option<Element>,
        balance: Option<Element>,
        pnl: Option<Element>,
        margin: Option<Element>,
    }

    impl TradingView {
        fn lookup() -> Self {
            Self {
                prices: dom::query_all(".symbol-item .price"),
                changes: dom::query_all(".symbol-item .change"),
                header_price: dom::query(".current-price"),
                header_change: dom::query(".price-change"),
                balance: dom::by_id("accountBalance"),
                pnl: dom::by_id("dailyPnL"),
                margin: dom::by_id("usedMargin"),
            }
        }

        fn seed(&self, cfg: SimConfig) -> TradingState {
            let mut state = TradingState::new(cfg);
            let price_texts: Vec<String> = self.prices.iter().map(dom::text).collect();
            state.seed_quotes(price_texts.iter().map(String::as_str));
            state.seed_header(self.header_price.as_ref().map(dom::text).as_deref());
            let cell = |el: &Option<Element>| el.as_ref().map(dom::text);
            state.account = market_sim::AccountSnapshot::from_display(
                cell(&self.balance).as_deref(),
                cell(&self.pnl).as_deref(),
                cell(&self.margin).as_deref(),
            );
            if let Some(symbol) = dom::query(".current-symbol").map(|el| dom::text(&el)) {
                if !symbol.trim().is_empty() {
                    state.select_symbol(symbol.trim());
                }
            }
            state
        }

        fn render_tick(&self, state: &mut TradingState) {
            let mut rng = rand::thread_rng();
            for (i, tick) in state.tick_quotes(&mut rng).into_iter().enumerate() {
                let Some(tick) = tick else {
                    continue;
                };
                if let Some(el) = self.prices.get(i) {
                    dom::set_text(el, &tick.price_text());
                }
                if let Some(el) = self.changes.get(i) {
                    dom::set_text(el, &tick.change_text());
                    el.set_class_name(&format!("change {}", tick.direction().class()));
                }
            }

            if let (Some(tick), Some(el)) = (state.tick_header(&mut rng), &self.header_price) {
                dom::set_text(el, &tick.price_text());
                if let Some(change) = &self.header_change {
                    dom::set_text(change, &tick.change_text());
                    change.set_class_name(&format!("price-change {}", tick.direction().class()));
                }
            }

            state.tick_account(&mut rng);
            let account = &state.account;
            if let (Some(el), Some(text)) = (&self.balance, account.balance_text()) {
                dom::set_text(el, &text);
            }
            if let (Some(el), Some(text), Some(dir)) =
                (&self.pnl, account.pnl_text(), account.pnl_direction())
            {
                dom::set_text(el, &text);
                el.set_class_name(&format!("value {}", dir.class()));
            }
            if let (Some(el), Some(text)) = (&self.margin, account.margin_text()) {
                dom::set_text(el, &text);
            }

            draw_mini_charts();
        }
    }

    fn canvas_backend(el: Element) -> Option<CanvasBackend> {
        let canvas = dom::cast::<HtmlCanvasElement>(el)?;
        match CanvasBackend::new(canvas) {
            Ok(backend) => Some(backend),
            Err(err) => {
                web_sys::console::error_1(&err);
                None
            }
        }
    }

    fn draw_main_chart(state: &TradingState) {
        let Some(mut backend) = dom::by_id("tradingChart").and_then(canvas_backend) else {
            return;
        };
        backend.fit_to_layout();
        let mut rng = rand::thread_rng();
        let candles = generate_candles(
            &mut rng,
            state.cfg.candle_count,
            js_sys::Date::now() as i64,
            state.timeframe,
            &state.candle_walk(),
        );
        if let Err(err) = render_trading_chart(&mut backend, &candles, state.cfg.ma_period) {
            log::error!("main chart: {err}");
        }
    }

    fn draw_mini_charts() {
        let mut rng = rand::thread_rng();
        let walk = SparkWalk::default();
        for el in dom::query_all(".mini-chart canvas") {
            if let Some(mut backend) = canvas_backend(el) {
                render_sparkline(&mut backend, &mut rng, &walk);
            }
        }
    }

    fn draw_performance_chart() {
        if let Some(mut backend) = dom::by_id("performanceChart").and_then(canvas_backend) {
            render_performance_chart(&mut backend, &mut rand::thread_rng(), &EquityWalk::default());
        }
    }

    pub fn init_trading_page(cfg: &SimConfig) -> Result<(), ShellError> {
        let view = TradingView::lookup();
        let state = Rc::new(RefCell::new(view.seed(cfg.clone())));

        draw_main_chart(&state.borrow());
        draw_mini_charts();
        draw_performance_chart();

        {
            let state = state.clone();
            crate::with_timers(|timers| {
                timers.every(cfg.tick_interval_ms, move || {
                    view.render_tick(&mut state.borrow_mut());
                })
            });
        }

        init_controls(&state)?;
        log::info!("trading page ready ({} quotes)", state.borrow().quotes.len());
        Ok(())
    }

    // ---------- order ticket -------------------------------------------------

    fn volume_input() -> Option<HtmlInputElement> {
        dom::query(".volume-input").and_then(dom::cast::<HtmlInputElement>)
    }

    fn update_order_summary(cfg: &SimConfig) {
        let Some(input) = volume_input() else {
            return;
        };
        let ticket = OrderTicket::from_input(cfg, &input.value());
        if let Some(el) = dom::by_id("requiredMargin") {
            dom::set_text(&el, &ticket.margin_text());
        }
        if let Some(el) = dom::by_id("pipValue") {
            dom::set_text(&el, &ticket.pip_value_text());
        }
        if let Some(el) = dom::by_id("spread") {
            dom::set_text(&el, &ticket.spread_text());
        }
    }

    pub fn adjust_volume(cfg: &SimConfig, delta: f64) {
        let Some(input) = volume_input() else {
            return;
        };
        input.set_value(&volume_text(step_volume(&input.value(), delta)));
        update_order_summary(cfg);
    }

    pub fn set_volume(cfg: &SimConfig, volume: f64) {
        let Some(input) = volume_input() else {
            return;
        };
        input.set_value(&volume_text(volume));
        update_order_summary(cfg);
    }

    fn set_button_disabled(el: &Element, disabled: bool) {
        if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
            btn.set_disabled(disabled);
        }
    }

    fn execute_order(state: Rc<RefCell<TradingState>>) {
        let Some(btn) = dom::by_id("executeBtn") else {
            return;
        };
        dom::add_class(&btn, "loading");
        set_button_disabled(&btn, true);
        let delay = execution_delay_ms(&mut rand::thread_rng(), &state.borrow().cfg);
        log::debug!("order fills in {delay} ms");

        spawn_local(async move {
            TimeoutFuture::new(delay).await;
            dom::remove_class(&btn, "loading");
            set_button_disabled(&btn, false);

            let (receipt, close_after) = {
                let s = state.borrow();
                let volume = volume_input().map(|i| i.value()).unwrap_or_default();
                let receipt = OrderReceipt::new(
                    dom::now_ms(),
                    s.symbol.clone(),
                    s.side,
                    &volume,
                    s.instrument_price_text(),
                );
                (receipt, s.cfg.modal_close_ms)
            };
            if let Err(err) = show_order_modal(&receipt, close_after) {
                log::error!("order modal: {err}");
            }
            add_position();
        });
    }

    fn detail_row(label: &str, value: &str) -> Result<Element, ShellError> {
        let row = dom::create("div", "detail-row")?;
        let name = dom::create("span", "")?;
        dom::set_text(&name, label);
        let val = dom::create("span", "")?;
        dom::set_text(&val, value);
        row.append_child(&name)?;
        row.append_child(&val)?;
        Ok(row)
    }

    fn show_order_modal(receipt: &OrderReceipt, close_after_ms: u32) -> Result<(), ShellError> {
        let modal = dom::create("div", "order-modal")?;
        let content = dom::create("div", "modal-content")?;
        let success = dom::create("div", "order-success")?;
        success.append_child(&dom::create("i", "fas fa-check-circle")?)?;
        let title = dom::create("h3", "")?;
        dom::set_text(&title, ORDER_SUCCESS_TITLE);
        success.append_child(&title)?;

        let details = dom::create("div", "order-details")?;
        details.append_child(&detail_row("الرمز:", &receipt.symbol)?)?;
        details.append_child(&detail_row("النوع:", receipt.side.display_name())?)?;
        details.append_child(&detail_row(
            "الحجم:",
            &format!("{} {LOT_SUFFIX}", receipt.volume),
        )?)?;
        details.append_child(&detail_row("السعر:", &receipt.price)?)?;
        details.append_child(&detail_row("رقم الأمر:", &receipt.id_text())?)?;
        success.append_child(&details)?;

        let ok = dom::create("button", "btn-primary")?;
        dom::set_text(&ok, "موافق");
        dom::on(&ok, "click", |_| close_order_modal())?;
        success.append_child(&ok)?;

        content.append_child(&success)?;
        modal.append_child(&content)?;
        dom::append_to_body(&modal)?;

        spawn_local(async move {
            TimeoutFuture::new(close_after_ms).await;
            modal.remove();
        });
        Ok(())
    }

    pub fn close_order_modal() {
        if let Some(modal) = dom::query(".order-modal") {
            modal.remove();
        }
    }

    fn add_position() {
        if let Some(el) = dom::query(".position-summary .value") {
            let next = open_positions_after_fill(&dom::text(&el));
            dom::set_text(&el, &next.to_string());
        }
    }

    fn select_side(state: &Rc<RefCell<TradingState>>, btn: &Element) {
        let raw = btn.get_attribute("data-type").unwrap_or_default();
        let side = match raw.parse::<OrderSide>() {
            Ok(side) => side,
            Err(err) => {
                log::warn!("{err}");
                return;
            }
        };
        dom::activate_exclusive(".order-type-btn", btn);
        state.borrow_mut().side = side;

        if let Err(err) = rebuild_execute_button(side) {
            log::error!("execute button: {err}");
        }
    }

    fn rebuild_execute_button(side: OrderSide) -> Result<(), ShellError> {
        let Some(execute) = dom::by_id("executeBtn") else {
            return Ok(());
        };
        execute.set_class_name(&side.execute_class());
        execute.set_inner_html("");
        execute.append_child(&dom::create("i", "fas fa-bolt")?)?;
        let label = dom::create("span", "")?;
        dom::set_text(&label, side.execute_label());
        execute.append_child(&label)?;
        Ok(())
    }

    fn switch_tab(btn: &Element) {
        let Some(tab) = btn.get_attribute("data-tab") else {
            return;
        };
        for el in dom::query_all(".tab-btn") {
            dom::remove_class(&el, "active");
        }
        for el in dom::query_all(".tab-content") {
            dom::remove_class(&el, "active");
        }
        dom::add_class(btn, "active");
        if let Some(content) = dom::by_id(&format!("{tab}-tab")) {
            dom::add_class(&content, "active");
        }
    }

    fn init_controls(state: &Rc<RefCell<TradingState>>) -> Result<(), ShellError> {
        if let Some(input) = dom::query(".volume-input") {
            let cfg = state.borrow().cfg.clone();
            dom::on(&input, "input", move |_| update_order_summary(&cfg))?;
        }

        if let Some(select) = dom::by_id("orderTypeSelect") {
            let target = select.clone();
            dom::on(&target, "change", move |_| {
                let Some(select) = select.dyn_ref::<HtmlSelectElement>() else {
                    return;
                };
                let kind = OrderKind::from_select(&select.value());
                if let Some(group) = dom::by_id("limitPriceGroup") {
                    dom::set_style(&group, "display", limit_group_display(kind));
                }
            })?;
        }

        if let Some(btn) = dom::by_id("executeBtn") {
            let state = state.clone();
            dom::on(&btn, "click", move |_| execute_order(state.clone()))?;
        }

        for btn in dom::query_all(".tab-btn") {
            let this = btn.clone();
            dom::on(&btn, "click", move |_| switch_tab(&this))?;
        }

        for item in dom::query_all(".symbol-item") {
            let this = item.clone();
            let state = state.clone();
            dom::on(&item, "click", move |_| {
                let Some(symbol) = this.get_attribute("data-symbol") else {
                    return;
                };
                dom::activate_exclusive(".symbol-item", &this);
                if let Some(header) = dom::query(".current-symbol") {
                    dom::set_text(&header, &symbol);
                }
                state.borrow_mut().select_symbol(&symbol);
                draw_main_chart(&state.borrow());
            })?;
        }

        for btn in dom::query_all(".order-type-btn") {
            let this = btn.clone();
            let state = state.clone();
            dom::on(&btn, "click", move |_| select_side(&state, &this))?;
        }

        for btn in dom::query_all(".timeframe-btn") {
            let this = btn.clone();
            let state = state.clone();
            dom::on(&btn, "click", move |_| {
                dom::activate_exclusive(".timeframe-btn", &this);
                let raw = this.get_attribute("data-timeframe");
                state.borrow_mut().select_timeframe(raw.as_deref());
                draw_main_chart(&state.borrow());
            })?;
        }
        Ok(())
    }
}
