// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod assets;
pub mod canvas;
pub mod colormap;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod labels;
pub mod layout;
pub mod plot;
pub mod prompt;
pub mod renderer;
pub mod series;
pub mod session;

pub use colormap::{Color, Gradient};
pub use config::CurveConfig;
pub use error::{CurveError, Result};
pub use interpolate::{EdgeMode, Pchip};
pub use labels::{Label, LabelChange, LabelStore};
pub use prompt::{ConsolePrompter, Field, NoPrompter, Prompter};
pub use renderer::{CurveFrame, CurveRenderer, CurveSample};
pub use series::{TimeSeries, HOURS};
pub use session::{CurveCommand, DragSession, PointerButton, Response, Session};

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info, warn};

// Standard library imports
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::assets::Assets;
use crate::canvas::Canvas;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Interactive 24-hour emotion curve window.
pub struct EmotionCurve {
    config: CurveConfig,
    session: Session,
    prompter: Box<dyn Prompter>,
}

impl EmotionCurve {
    pub fn new(config: CurveConfig) -> Self {
        let session = Session::new(TimeSeries::default(), 0.0, config.offset_range);
        Self {
            config,
            session,
            prompter: Box::new(NoPrompter),
        }
    }

    pub fn with_series(mut self, series: TimeSeries) -> Self {
        self.session.series = series;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.session.set_offset(offset);
        self
    }

    /// Where label text and icon choices come from. Without one, label
    /// editing is a no-op.
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn apply(&mut self, command: CurveCommand) -> Result<()> {
        self.session.apply(command)
    }

    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(&mut self, receiver: Receiver<CurveCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<CurveCommand>>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_min_inner_size(LogicalSize::new(320.0, 240.0))
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let font = assets::find_font(self.config.font_path.as_deref());
        let mut assets = Assets::new(font, self.config.icon_size);
        let renderer = self.config.renderer();

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut receiver = receiver;
        let mut dirty = true;
        // winit reports button presses without coordinates
        let mut pointer = (f64::NAN, f64::NAN);

        info!(
            width = fb_width,
            height = fb_height,
            samples = self.config.samples,
            edge = ?self.config.edge_mode,
            "opening emotion curve window"
        );

        event_loop.run(move |event, window_target| {
            match event {
                Event::WindowEvent { event, .. } => {
                    let layout = self.config.layout(fb_width, fb_height);
                    let response = match event {
                        WindowEvent::CloseRequested => {
                            window_target.exit();
                            Response::Ignored
                        }
                        WindowEvent::Resized(new_size) => {
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                                warn!("failed to resize buffer: {e}");
                            }
                            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height)
                            {
                                warn!("failed to resize surface: {e}");
                            }
                            Response::Redraw
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            pointer = (position.x, position.y);
                            self.session.motion(&layout, position.x, position.y)
                        }
                        WindowEvent::CursorLeft { .. } => self.session.release(),
                        WindowEvent::MouseInput { state, button, .. } => {
                            match (state, pointer_button(button)) {
                                (ElementState::Pressed, Some(button)) => {
                                    self.session.press(&layout, pointer.0, pointer.1, button)
                                }
                                (ElementState::Released, Some(_)) => self.session.release(),
                                _ => Response::Ignored,
                            }
                        }
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed =>
                        {
                            if event.logical_key == Key::Named(NamedKey::Escape) {
                                window_target.exit();
                                Response::Ignored
                            } else {
                                self.handle_key(&event.logical_key)
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            let frame = pixels.frame_mut();
                            let mut canvas = Canvas::new(frame, fb_width, fb_height);
                            plot::render_chart(
                                &mut canvas,
                                &self.session,
                                &renderer,
                                &self.config,
                                &mut assets,
                            );
                            if let Err(e) = pixels.render() {
                                warn!("failed to present frame: {e}");
                                window_target.exit();
                            }
                            last_frame = Instant::now();
                            dirty = false;
                            Response::Ignored
                        }
                        _ => Response::Ignored,
                    };
                    match response {
                        Response::Ignored => {}
                        Response::Redraw => dirty = true,
                        Response::EditLabel(hour) => {
                            self.edit_label(hour);
                            dirty = true;
                        }
                    }
                }
                Event::AboutToWait => {
                    if let Some(rx) = &receiver {
                        match drain_commands(&mut self.session, rx) {
                            Ok(changed) => dirty |= changed,
                            Err(()) => {
                                debug!("command channel closed");
                                receiver = None;
                            }
                        }
                    }
                    let wake = plan_wake(
                        Instant::now(),
                        last_frame,
                        frame_duration,
                        dirty,
                        receiver.is_some(),
                    );
                    if wake.redraw {
                        window_clone.request_redraw();
                    }
                    window_target.set_control_flow(match wake.until {
                        Some(deadline) => ControlFlow::WaitUntil(deadline),
                        None => ControlFlow::Wait,
                    });
                }
                _ => {}
            }
        })?;

        Ok(())
    }

    /// Keyboard shortcuts other than Escape.
    pub fn handle_key(&mut self, key: &Key) -> Response {
        let step = self.config.offset_step;
        let changed = match key {
            Key::Named(NamedKey::ArrowUp) => self.session.nudge_offset(step),
            Key::Named(NamedKey::ArrowDown) => self.session.nudge_offset(-step),
            Key::Character(c) => match c.to_lowercase().as_str() {
                "0" => self.session.set_offset(0.0),
                "z" => {
                    let had_values = self.session.series.amplitudes().iter().any(|v| *v != 0.0);
                    self.session.series.reset();
                    had_values
                }
                "l" => {
                    return match self.session.hover() {
                        Some(hour) => Response::EditLabel(hour),
                        None => Response::Ignored,
                    };
                }
                _ => false,
            },
            _ => false,
        };
        if changed {
            Response::Redraw
        } else {
            Response::Ignored
        }
    }

    pub fn edit_label(&mut self, hour: usize) {
        if let Err(e) = self.session.edit_label(hour, self.prompter.as_mut()) {
            warn!(hour, "label edit rejected: {e}");
        }
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// What the event loop does before going idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wake {
    redraw: bool,
    /// `None` sleeps until the next window event.
    until: Option<Instant>,
}

/// Redraws at most once per frame interval. While a command channel is
/// attached the loop wakes once per interval to drain it. Deadlines are never
/// in the past.
fn plan_wake(
    now: Instant,
    last_frame: Instant,
    frame_duration: Duration,
    dirty: bool,
    polling: bool,
) -> Wake {
    let next_frame = last_frame + frame_duration;
    if dirty && now < next_frame {
        return Wake {
            redraw: false,
            until: Some(next_frame),
        };
    }
    Wake {
        redraw: dirty,
        until: (dirty || polling).then(|| now + frame_duration),
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Applies every queued command. `Ok` carries whether anything arrived,
/// `Err` means the sender hung up.
fn drain_commands(session: &mut Session, receiver: &Receiver<CurveCommand>) -> std::result::Result<bool, ()> {
    let mut changed = false;
    loop {
        match receiver.try_recv() {
            Ok(command) => {
                if let Err(e) = session.apply(command) {
                    warn!("ignoring command: {e}");
                }
                changed = true;
            }
            Err(TryRecvError::Empty) => return Ok(changed),
            Err(TryRecvError::Disconnected) => return if changed { Ok(true) } else { Err(()) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn curve() -> EmotionCurve {
        EmotionCurve::new(CurveConfig::default())
    }

    #[test]
    fn keys_nudge_and_reset_offset() {
        let mut curve = curve();
        assert_eq!(curve.handle_key(&Key::Named(NamedKey::ArrowUp)), Response::Redraw);
        assert!((curve.session().offset() - 0.1).abs() < 1e-12);
        assert_eq!(curve.handle_key(&Key::Character("0".into())), Response::Redraw);
        assert_eq!(curve.session().offset(), 0.0);
        assert_eq!(curve.handle_key(&Key::Character("0".into())), Response::Ignored);
    }

    #[test]
    fn z_zeroes_amplitudes() {
        let mut series = TimeSeries::default();
        series.set(3, 1.5).unwrap();
        let mut curve = curve().with_series(series);
        assert_eq!(curve.handle_key(&Key::Character("Z".into())), Response::Redraw);
        assert!(curve.session().series.amplitudes().iter().all(|v| *v == 0.0));
        assert_eq!(curve.handle_key(&Key::Character("z".into())), Response::Ignored);
    }

    #[test]
    fn label_key_needs_hover() {
        let mut curve = curve();
        assert_eq!(curve.handle_key(&Key::Character("l".into())), Response::Ignored);
    }

    #[test]
    fn idle_channel_wait_is_always_in_the_future() {
        let frame = Duration::from_millis(16);
        let last_frame = Instant::now();
        let now = last_frame + Duration::from_millis(84);
        let wake = plan_wake(now, last_frame, frame, false, true);
        assert!(!wake.redraw);
        assert_eq!(wake.until, Some(now + frame));
        assert!(wake.until.unwrap() > now);
    }

    #[test]
    fn dirty_frames_are_paced() {
        let frame = Duration::from_millis(16);
        let last_frame = Instant::now();

        let early = last_frame + Duration::from_millis(5);
        let wake = plan_wake(early, last_frame, frame, true, false);
        assert!(!wake.redraw);
        assert_eq!(wake.until, Some(last_frame + frame));

        let late = last_frame + Duration::from_millis(40);
        let wake = plan_wake(late, last_frame, frame, true, false);
        assert!(wake.redraw);
        assert!(wake.until.unwrap() > late);
    }

    #[test]
    fn nothing_to_do_waits_for_events() {
        let now = Instant::now();
        let wake = plan_wake(now, now, Duration::from_millis(16), false, false);
        assert_eq!(
            wake,
            Wake {
                redraw: false,
                until: None
            }
        );
    }

    #[test]
    fn drained_commands_update_session() {
        let mut session = Session::new(TimeSeries::default(), 0.0, (-3.0, 3.0));
        let (tx, rx) = mpsc::channel();
        tx.send(CurveCommand::SetAmplitude(12, 2.0)).unwrap();
        tx.send(CurveCommand::SetAmplitude(99, 2.0)).unwrap();
        tx.send(CurveCommand::SetOffset(1.0)).unwrap();
        assert_eq!(drain_commands(&mut session, &rx), Ok(true));
        assert_eq!(session.series.get(12), Some(2.0));
        assert_eq!(session.offset(), 1.0);
        assert_eq!(drain_commands(&mut session, &rx), Ok(false));
        drop(tx);
        assert_eq!(drain_commands(&mut session, &rx), Err(()));
    }
}
