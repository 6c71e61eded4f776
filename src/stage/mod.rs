//! Browser wiring: page elements, event listeners and the trace animation loop.
//!
//! The page provides the elements by id (`ladderCanvas`, `nameInput`,
//! `resultInput`, `topLabels`, `bottomLabels`, `ladderStage`, the two range
//! sliders with their value spans, `status`, `versionInfo` and the five
//! buttons). Only the canvas is created when missing; any other absent element
//! simply has no effect.
//!
//! One [`LadderGame`] lives in a thread-local slot. Listeners borrow it, apply
//! an operation and repaint; the animation loop re-borrows it every frame and
//! stops as soon as its token goes stale.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlButtonElement,
    HtmlCanvasElement, HtmlElement, HtmlInputElement, window,
};

use crate::animation::{Frame, PathAnimation};
use crate::config::LadderConfig;
use crate::error::LadderError;
use crate::game::LadderGame;
use crate::rng::SeededRng;

mod draw;

const CANVAS_ID: &str = "ladderCanvas";

struct Stage {
    game: LadderGame,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

thread_local! {
    static STAGE: RefCell<Option<Stage>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen]
pub fn start_ladder() -> Result<(), JsValue> {
    start_with(LadderConfig::default())
}

/// Same as [`start_ladder`] with the fixed-speed, denser preset.
#[wasm_bindgen]
pub fn start_classic_ladder() -> Result<(), JsValue> {
    start_with(LadderConfig::classic())
}

/// Start with a JSON `LadderConfig`; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_ladder_with_config(json: &str) -> Result<(), JsValue> {
    let config = LadderConfig::from_json(json)?;
    start_with(config)
}

fn start_with(config: LadderConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        let parent: Element = match doc.get_element_by_id("ladderStage") {
            Some(stage) => stage,
            None => doc
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .into(),
        };
        parent.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    configure_sliders(&doc, &config);
    if let Some(el) = doc.get_element_by_id("versionInfo") {
        el.set_text_content(Some(&format!("v{}", crate::APP_VERSION_DATE)));
    }

    let game = LadderGame::new(config, SeededRng::from_entropy())?;
    let stage = Stage { game, canvas, ctx };
    repaint(&stage, &doc)?;
    STAGE.with(|cell| cell.replace(Some(stage)));

    wire_controls(&doc)?;
    crate::log("ladder stage started");
    Ok(())
}

// --- Rendering ----------------------------------------------------------------

/// Full repaint after a regeneration: canvas size, ladder, labels, inputs, status.
fn repaint(stage: &Stage, doc: &Document) -> Result<(), JsValue> {
    let layout = stage.game.layout();
    stage.canvas.set_width(layout.width as u32);
    stage.canvas.set_height(layout.height as u32);
    if let Some(el) = element::<HtmlElement>(doc, "ladderStage") {
        el.style()
            .set_property("width", &format!("{}px", layout.width))?;
    }
    draw::draw_base_ladder(&stage.ctx, layout, stage.game.grid());
    render_labels(doc, &stage.game)?;
    if let Some(input) = element::<HtmlInputElement>(doc, "nameInput") {
        input.set_value(&stage.game.names_text());
    }
    if let Some(input) = element::<HtmlInputElement>(doc, "resultInput") {
        input.set_value(&stage.game.results_text());
    }
    set_status(doc, stage.game.status());
    Ok(())
}

/// Ladder and labels only (resize, skip).
fn redraw(stage: &Stage, doc: &Document) -> Result<(), JsValue> {
    draw::draw_base_ladder(&stage.ctx, stage.game.layout(), stage.game.grid());
    render_labels(doc, &stage.game)
}

fn render_labels(doc: &Document, game: &LadderGame) -> Result<(), JsValue> {
    let tracks = game.layout().label_tracks();
    let (active_top, active_bottom) = match game.highlight() {
        Some((t, b)) => (Some(t), Some(b)),
        None => (None, None),
    };
    fill_label_row(doc, "topLabels", game.names(), active_top, &tracks)?;
    fill_label_row(doc, "bottomLabels", game.results(), active_bottom, &tracks)
}

fn fill_label_row(
    doc: &Document,
    id: &str,
    labels: &[String],
    active: Option<usize>,
    tracks: &str,
) -> Result<(), JsValue> {
    let Some(row) = element::<HtmlElement>(doc, id) else {
        return Ok(());
    };
    row.style().set_property("grid-template-columns", tracks)?;
    row.set_inner_html("");

    let lead = spacer(doc)?;
    row.append_child(&lead)?;
    for (index, text) in labels.iter().enumerate() {
        let chip: HtmlButtonElement = doc.create_element("button")?.dyn_into()?;
        chip.set_type("button");
        chip.set_class_name(if active == Some(index) {
            "label-chip interactive active"
        } else {
            "label-chip interactive"
        });
        chip.set_attribute("data-index", &index.to_string())?;
        chip.set_text_content(Some(text));
        row.append_child(&chip)?;
    }
    let trail = spacer(doc)?;
    row.append_child(&trail)?;
    Ok(())
}

fn spacer(doc: &Document) -> Result<Element, JsValue> {
    let span = doc.create_element("div")?;
    span.set_class_name("label-spacer");
    Ok(span)
}

fn set_status(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id("status") {
        el.set_text_content(Some(text));
    }
}

fn configure_sliders(doc: &Document, config: &LadderConfig) {
    if let Some(range) = element::<HtmlInputElement>(doc, "complexityRange") {
        range.set_min(&config.complexity_min.to_string());
        range.set_max(&config.complexity_max.to_string());
        range.set_value(&config.default_complexity.to_string());
    }
    if let Some(el) = doc.get_element_by_id("complexityValue") {
        el.set_text_content(Some(&config.default_complexity.to_string()));
    }
    if let Some(range) = element::<HtmlInputElement>(doc, "speedRange") {
        range.set_min(&config.speed_min.to_string());
        range.set_max(&config.speed_max.to_string());
        range.set_value(&config.default_speed.to_string());
        range.set_hidden(!config.speed_control);
    }
    if let Some(el) = element::<HtmlElement>(doc, "speedValue") {
        el.set_text_content(Some(&config.default_speed.to_string()));
        el.set_hidden(!config.speed_control);
    }
}

// --- Event wiring -------------------------------------------------------------

fn wire_controls(doc: &Document) -> Result<(), JsValue> {
    on_click(doc, "applyNamesBtn", |stage, doc| {
        let text = input_value(doc, "nameInput");
        apply_roster_edit(stage, doc, |game| game.apply_names(&text))
    })?;
    on_click(doc, "applyResultsBtn", |stage, doc| {
        let text = input_value(doc, "resultInput");
        apply_roster_edit(stage, doc, |game| game.apply_results(&text))
    })?;
    on_click(doc, "generateBtn", |stage, doc| {
        stage.game.regenerate("Ladder regenerated.");
        repaint(stage, doc)
    })?;
    on_click(doc, "addPersonBtn", |stage, doc| {
        stage.game.add_person();
        repaint(stage, doc)
    })?;
    on_click(doc, "skipBtn", |stage, doc| {
        stage.game.skip_animation();
        redraw(stage, doc)?;
        set_status(doc, stage.game.status());
        Ok(())
    })?;

    if let Some(range) = doc.get_element_by_id("complexityRange") {
        listen(&range, "input", |event| {
            let Some(value) = slider_value(&event) else { return };
            with_stage(|stage, doc| {
                let c = stage.game.set_complexity(value);
                if let Some(el) = doc.get_element_by_id("complexityValue") {
                    el.set_text_content(Some(&c.to_string()));
                }
                Ok(())
            });
        })?;
    }
    if let Some(range) = doc.get_element_by_id("speedRange") {
        listen(&range, "input", |event| {
            let Some(value) = slider_value(&event) else { return };
            with_stage(|stage, doc| {
                let s = stage.game.set_speed(value);
                if let Some(el) = doc.get_element_by_id("speedValue") {
                    el.set_text_content(Some(&s.to_string()));
                }
                Ok(())
            });
        })?;
    }

    // Chips are rebuilt on every repaint, so clicks are delegated to the rows.
    if let Some(row) = doc.get_element_by_id("topLabels") {
        listen(&row, "click", |event| {
            if let Some(index) = chip_index(&event) {
                start_trace(|game| game.begin_trace(index));
            }
        })?;
    }
    if let Some(row) = doc.get_element_by_id("bottomLabels") {
        listen(&row, "click", |event| {
            if let Some(index) = chip_index(&event) {
                start_trace(|game| game.begin_trace_to(index));
            }
        })?;
    }

    if let Some(win) = window() {
        listen(&win, "resize", |_| {
            with_stage(|stage, doc| redraw(stage, doc));
        })?;
    }
    Ok(())
}

fn apply_roster_edit(
    stage: &mut Stage,
    doc: &Document,
    edit: impl FnOnce(&mut LadderGame) -> Result<(), LadderError>,
) -> Result<(), JsValue> {
    match edit(&mut stage.game) {
        Ok(()) => repaint(stage, doc),
        Err(_) => {
            // Rejected input keeps the previous ladder; only the status changes.
            set_status(doc, stage.game.status());
            Ok(())
        }
    }
}

fn on_click(
    doc: &Document,
    id: &str,
    action: impl Fn(&mut Stage, &Document) -> Result<(), JsValue> + 'static,
) -> Result<(), JsValue> {
    let Some(button) = doc.get_element_by_id(id) else {
        return Ok(());
    };
    listen(&button, "click", move |_| {
        with_stage(|stage, doc| action(stage, doc));
    })
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run `f` against the live stage, logging any DOM error it returns.
fn with_stage(f: impl FnOnce(&mut Stage, &Document) -> Result<(), JsValue>) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    STAGE.with(|cell| {
        if let Some(stage) = cell.borrow_mut().as_mut() {
            if let Err(err) = f(stage, &doc) {
                crate::log(&format!("stage update failed: {:?}", err));
            }
        }
    });
}

fn element<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

fn input_value(doc: &Document, id: &str) -> String {
    element::<HtmlInputElement>(doc, id)
        .map(|input| input.value())
        .unwrap_or_default()
}

fn slider_value(event: &Event) -> Option<u32> {
    event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .and_then(|input| input.value().parse().ok())
}

fn chip_index(event: &Event) -> Option<usize> {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("[data-index]").ok().flatten())
        .and_then(|el| el.get_attribute("data-index"))
        .and_then(|v| v.parse().ok())
}

// --- Trace animation ----------------------------------------------------------

fn start_trace(begin: impl FnOnce(&mut LadderGame) -> Result<PathAnimation, LadderError>) {
    let mut animation = None;
    with_stage(|stage, doc| {
        let anim = begin(&mut stage.game)?;
        render_labels(doc, &stage.game)?;
        set_status(doc, stage.game.status());
        animation = Some(anim);
        Ok(())
    });
    if let Some(anim) = animation {
        run_trace(anim);
    }
}

/// Drive one trace with requestAnimationFrame until it finishes or goes stale.
fn run_trace(mut anim: PathAnimation) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let mut keep_going = false;
        with_stage(|stage, doc| {
            match stage.game.advance(&mut anim) {
                Frame::Cancelled => {}
                Frame::Running { .. } => {
                    draw::draw_path(
                        &stage.ctx,
                        stage.game.layout(),
                        stage.game.grid(),
                        &anim.visible(),
                    );
                    keep_going = true;
                }
                Frame::Finished => {
                    draw::draw_path(
                        &stage.ctx,
                        stage.game.layout(),
                        stage.game.grid(),
                        anim.segments(),
                    );
                    if stage.game.finish_trace(&anim) {
                        set_status(doc, stage.game.status());
                    }
                }
            }
            Ok(())
        });
        if keep_going {
            request_frame(&f);
        } else {
            // Break the Rc cycle so the closure is freed.
            let _ = f.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(closure)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}
