use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use winit::dpi::LogicalSize;

use horologe_core::{ClockConfig, ClockTicker, LocalTimeSource, RunLoop, TimeSource};
use horologe_engine::core::{App as EngineApp, AppControl, FrameCtx};
use horologe_engine::device::GpuInit;
use horologe_engine::render::shapes::circle::CircleRenderer;
use horologe_engine::render::shapes::hand::HandRenderer;
use horologe_engine::render::shapes::text::TextRenderer;
use horologe_engine::scene::DrawList;
use horologe_engine::text::{FontId, FontSystem};
use horologe_engine::window::{Runtime, RuntimeConfig};

use crate::face::{paint_face, FaceLayout, FaceText, BACKGROUND};
use crate::presenter::FacePresenter;

// ── Application ───────────────────────────────────────────────────────────

/// Clock window builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("Horologe")
///     .font("body", load_font())
///     .run()?;
/// ```
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    fonts: Vec<(String, Vec<u8>)>,
    clock: ClockConfig,
}

impl Application {
    pub fn new() -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            title: defaults.title,
            width: defaults.initial_size.width,
            height: defaults.initial_size.height,
            fonts: Vec::new(),
            clock: ClockConfig::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Registers a font candidate. The first one that loads draws all text.
    pub fn font(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.fonts.push((name.into(), bytes));
        self
    }

    pub fn clock(mut self, config: ClockConfig) -> Self {
        self.clock = config;
        self
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
            ..RuntimeConfig::default()
        };
        let app = ClockApp::new(&self.fonts, self.clock, LocalTimeSource::new());
        Runtime::run(config, GpuInit::default(), app)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── ClockApp ──────────────────────────────────────────────────────────────

/// Implements the engine `App` for the clock window.
///
/// Owns the run loop that the ticker's timer lives on; the engine drives it
/// from `poll_timers` whenever the event loop is about to sleep.
struct ClockApp<T: TimeSource + 'static> {
    run_loop: RunLoop,
    ticker: ClockTicker<T>,
    presenter: Rc<RefCell<FacePresenter>>,

    fonts: FontSystem,
    font: Option<FontId>,

    draw_list: DrawList,
    circle_renderer: CircleRenderer,
    text_renderer: TextRenderer,
    hand_renderer: HandRenderer,
}

impl<T: TimeSource + 'static> ClockApp<T> {
    fn new(font_data: &[(String, Vec<u8>)], config: ClockConfig, source: T) -> Self {
        let (fonts, font) = load_fonts(font_data);
        let run_loop = RunLoop::new();
        let presenter = Rc::new(RefCell::new(FacePresenter::new(config.animation_duration)));

        log::info!(
            "clock configured: tick {:?}, animation {:?}, {:?} text",
            config.tick_period,
            config.animation_duration,
            config.text_style,
        );

        Self {
            ticker: ClockTicker::new(run_loop.clone(), source, config),
            run_loop,
            presenter,
            fonts,
            font,
            draw_list: DrawList::new(),
            circle_renderer: CircleRenderer::new(),
            text_renderer: TextRenderer::new(),
            hand_renderer: HandRenderer::new(),
        }
    }
}

fn load_fonts(candidates: &[(String, Vec<u8>)]) -> (FontSystem, Option<FontId>) {
    let mut fonts = FontSystem::new();
    for (name, bytes) in candidates {
        match fonts.load_font(bytes) {
            Ok(id) => {
                log::debug!("loaded font '{name}'");
                return (fonts, Some(id));
            }
            Err(err) => log::warn!("failed to load font '{name}': {err}"),
        }
    }
    log::warn!("no usable font; the clock is drawn without text");
    (fonts, None)
}

impl<T: TimeSource + 'static> EngineApp for ClockApp<T> {
    fn on_resumed(&mut self) {
        if let Err(err) = self.ticker.start(&self.presenter) {
            log::error!("cannot start clock ticker: {err}");
        }
    }

    fn poll_timers(&mut self, now: Instant) -> Option<Instant> {
        let fired = self.run_loop.run_due(now);
        if fired > 0 {
            log::trace!("{fired} timer(s) fired");
        }
        self.run_loop.next_deadline()
    }

    fn needs_redraw(&self) -> bool {
        self.presenter.borrow().needs_redraw()
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (angles, label, stale) = {
            let mut presenter = self.presenter.borrow_mut();
            presenter.advance(ctx.time.dt);
            presenter.mark_drawn();
            (presenter.displayed_angles(), presenter.label().to_owned(), presenter.is_stale())
        };

        let layout = FaceLayout::new(ctx.window.viewport());
        let text = self.font.map(|font| FaceText { fonts: &self.fonts, font });

        self.draw_list.clear();
        paint_face(&mut self.draw_list, &layout, &angles, &label, stale, text);

        let draw_list = &mut self.draw_list;
        let fonts = &self.fonts;
        let circles = &mut self.circle_renderer;
        let texts = &mut self.text_renderer;
        let hands = &mut self.hand_renderer;

        // Hands go last so they cover the numerals.
        ctx.render(BACKGROUND, |rctx, target| {
            circles.render(rctx, target, draw_list);
            texts.render(rctx, target, draw_list, fonts);
            hands.render(rctx, target, draw_list);
        })
    }

    fn on_exit(&mut self) {
        self.ticker.stop();
        log::info!("horologe shutting down");
    }
}
