// ============================================================================
// INPUT TYPES
// ============================================================================

use tracing::{debug, info};

use crate::colormap::VALUE_LIMIT;
use crate::error::Result;
use crate::labels::{Label, LabelChange, LabelStore};
use crate::layout::Layout;
use crate::prompt::{Field, Prompter, ICON_EXTENSIONS};
use crate::series::{TimeSeries, HOURS};

/// Which control, if any, the pointer is currently dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    /// Dragging the control point of one hour.
    Point { index: usize },
    /// Dragging the offset slider.
    Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// What the event loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Redraw,
    /// Open the label editor for this hour.
    EditLabel(usize),
}

/// Command enum for driving the chart from outside the event loop
#[derive(Debug, Clone)]
pub enum CurveCommand {
    SetAmplitude(usize, f64),
    SetAmplitudes([f64; HOURS]),
    SetOffset(f64),
    SetLabel(usize, Label),
    ClearLabel(usize),
    /// Zero every amplitude, the offset and all labels.
    Reset,
}

// ============================================================================
// SESSION STATE
// ============================================================================

/// All mutable state of one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    pub series: TimeSeries,
    pub labels: LabelStore,
    offset: f64,
    offset_range: (f64, f64),
    drag: DragSession,
    hover: Option<usize>,
}

impl Session {
    pub fn new(series: TimeSeries, offset: f64, offset_range: (f64, f64)) -> Self {
        let (lo, hi) = if offset_range.0.is_finite() && offset_range.1.is_finite() {
            (offset_range.0.min(offset_range.1), offset_range.0.max(offset_range.1))
        } else {
            (-VALUE_LIMIT, VALUE_LIMIT)
        };
        let offset = if offset.is_finite() { offset } else { 0.0 };
        Self {
            series,
            labels: LabelStore::default(),
            offset: offset.clamp(lo, hi),
            offset_range: (lo, hi),
            drag: DragSession::Idle,
            hover: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn drag(&self) -> DragSession {
        self.drag
    }

    /// Hour last under the pointer inside the plot.
    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    /// Returns whether the offset actually changed.
    pub fn set_offset(&mut self, offset: f64) -> bool {
        if !offset.is_finite() {
            return false;
        }
        let clamped = offset.clamp(self.offset_range.0, self.offset_range.1);
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    pub fn nudge_offset(&mut self, delta: f64) -> bool {
        self.set_offset(self.offset + delta)
    }

    pub fn press(&mut self, layout: &Layout, px: f64, py: f64, button: PointerButton) -> Response {
        match button {
            PointerButton::Primary => {
                if layout.slider.hit(px, py) {
                    self.drag = DragSession::Offset;
                    debug!("start dragging offset slider");
                    self.set_offset(layout.slider.value_at(py));
                    return Response::Redraw;
                }
                match layout.plot.hour_at(px, py) {
                    Some(index) => {
                        self.drag = DragSession::Point { index };
                        debug!(index, "start dragging point");
                        Response::Redraw
                    }
                    None => Response::Ignored,
                }
            }
            PointerButton::Secondary => match layout.plot.hour_at(px, py) {
                Some(hour) => Response::EditLabel(hour),
                None => Response::Ignored,
            },
        }
    }

    pub fn motion(&mut self, layout: &Layout, px: f64, py: f64) -> Response {
        if let Some(hour) = layout.plot.hour_at(px, py) {
            self.hover = Some(hour);
        }
        match self.drag {
            DragSession::Idle => Response::Ignored,
            DragSession::Offset => {
                if self.set_offset(layout.slider.value_at(py)) {
                    Response::Redraw
                } else {
                    Response::Ignored
                }
            }
            DragSession::Point { index } => match layout.plot.to_data(px, py) {
                Some((_, y)) => match self.series.set(index, y - self.offset) {
                    Ok(()) => Response::Redraw,
                    Err(_) => Response::Ignored,
                },
                None => Response::Ignored,
            },
        }
    }

    pub fn release(&mut self) -> Response {
        match std::mem::take(&mut self.drag) {
            DragSession::Idle => Response::Ignored,
            DragSession::Point { index } => {
                debug!(index, "released point");
                Response::Redraw
            }
            DragSession::Offset => {
                debug!(offset = self.offset, "released offset slider");
                Response::Redraw
            }
        }
    }

    /// Asks the prompter for the label at `hour` and stores the result.
    ///
    /// Cancelling leaves the label alone, a blank title deletes it and an
    /// unanswered icon question keeps the previous icon.
    pub fn edit_label(&mut self, hour: usize, prompter: &mut dyn Prompter) -> Result<LabelChange> {
        let existing = self.labels.get(hour).cloned();
        let (title, content) = existing
            .as_ref()
            .map(|l| (l.title.clone(), l.content.clone()))
            .unwrap_or_default();
        let fields = [
            Field::new(format!("Label for {hour:02}:00 title (\"-\" deletes)"), title),
            Field::new("Content", content),
        ];
        let Some(answers) = prompter.prompt_text(&fields) else {
            return Ok(LabelChange::Unchanged);
        };
        let mut answers = answers.into_iter();
        let title = answers.next().unwrap_or_default();
        let content = answers.next().unwrap_or_default();

        let change = if title.trim().is_empty() {
            self.labels.remove(hour)
        } else {
            let icon = prompter
                .choose_file(ICON_EXTENSIONS)
                .or_else(|| existing.and_then(|l| l.icon));
            self.labels.set(hour, Label { title, content, icon })?
        };
        info!(hour, ?change, "label edited");
        Ok(change)
    }

    pub fn apply(&mut self, command: CurveCommand) -> Result<()> {
        match command {
            CurveCommand::SetAmplitude(hour, value) => self.series.set(hour, value)?,
            CurveCommand::SetAmplitudes(values) => self.series = TimeSeries::new(values)?,
            CurveCommand::SetOffset(value) => {
                self.set_offset(value);
            }
            CurveCommand::SetLabel(hour, label) => {
                self.labels.set(hour, label)?;
            }
            CurveCommand::ClearLabel(hour) => {
                self.labels.remove(hour);
            }
            CurveCommand::Reset => {
                self.series.reset();
                self.labels.clear();
                self.offset = 0.0_f64.clamp(self.offset_range.0, self.offset_range.1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margins;
    use std::path::PathBuf;

    fn layout() -> Layout {
        Layout::new(960, 600, Margins::default(), 3.0, (-3.0, 3.0))
    }

    fn session() -> Session {
        Session::new(TimeSeries::default(), 0.0, (-3.0, 3.0))
    }

    struct Scripted {
        answers: Option<Vec<String>>,
        file: Option<PathBuf>,
    }

    impl Prompter for Scripted {
        fn prompt_text(&mut self, _fields: &[Field]) -> Option<Vec<String>> {
            self.answers.take()
        }

        fn choose_file(&mut self, _extensions: &[&str]) -> Option<PathBuf> {
            self.file.take()
        }
    }

    fn scripted(answers: &[&str], file: Option<&str>) -> Scripted {
        Scripted {
            answers: Some(answers.iter().map(|s| s.to_string()).collect()),
            file: file.map(PathBuf::from),
        }
    }

    #[test]
    fn drag_cycle_edits_one_hour() {
        let layout = layout();
        let mut session = session();
        let (px, py) = layout.plot.to_pixel(12.2, 0.0);
        assert_eq!(session.press(&layout, px, py, PointerButton::Primary), Response::Redraw);
        assert_eq!(session.drag(), DragSession::Point { index: 12 });

        let (px, py) = layout.plot.to_pixel(14.0, 2.0);
        assert_eq!(session.motion(&layout, px, py), Response::Redraw);
        // still bound to hour 12 even though the pointer moved over hour 14
        assert!((session.series.get(12).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(session.series.get(14), Some(0.0));

        assert_eq!(session.release(), Response::Redraw);
        assert_eq!(session.drag(), DragSession::Idle);
        assert_eq!(session.motion(&layout, px, py - 50.0), Response::Ignored);
    }

    #[test]
    fn press_outside_plot_selects_nothing() {
        let layout = layout();
        let mut session = session();
        assert_eq!(session.press(&layout, 2.0, 2.0, PointerButton::Primary), Response::Ignored);
        assert_eq!(session.drag(), DragSession::Idle);
    }

    #[test]
    fn stale_pointer_outside_plot_is_ignored() {
        let layout = layout();
        let mut session = session();
        let (px, py) = layout.plot.to_pixel(3.0, 1.0);
        session.press(&layout, px, py, PointerButton::Primary);
        assert_eq!(session.motion(&layout, px, layout.plot.bottom + 20.0), Response::Ignored);
        assert_eq!(session.series.get(3), Some(0.0));
    }

    #[test]
    fn dragging_under_offset_stores_unshifted_amplitude() {
        let layout = layout();
        let mut session = Session::new(TimeSeries::default(), 1.0, (-3.0, 3.0));
        let (px, py) = layout.plot.to_pixel(5.0, 0.0);
        session.press(&layout, px, py, PointerButton::Primary);
        let (px, py) = layout.plot.to_pixel(5.0, 2.5);
        session.motion(&layout, px, py);
        assert!((session.series.get(5).unwrap() - 1.5).abs() < 1e-9);
        assert_eq!(session.offset(), 1.0);
    }

    #[test]
    fn slider_drag_changes_offset_only() {
        let layout = layout();
        let mut session = session();
        let slider = layout.slider;
        session.press(&layout, slider.x, slider.pixel_for(0.0), PointerButton::Primary);
        assert_eq!(session.drag(), DragSession::Offset);
        assert_eq!(
            session.motion(&layout, slider.x + 200.0, slider.pixel_for(1.5)),
            Response::Redraw
        );
        assert!((session.offset() - 1.5).abs() < 1e-9);
        assert_eq!(session.series, TimeSeries::default());
        session.release();
        assert_eq!(session.drag(), DragSession::Idle);
    }

    #[test]
    fn offset_is_clamped_to_range() {
        let mut session = session();
        assert!(session.set_offset(10.0));
        assert_eq!(session.offset(), 3.0);
        assert!(!session.nudge_offset(0.1));
        assert!(!session.set_offset(f64::NAN));
    }

    #[test]
    fn secondary_press_requests_label_edit() {
        let layout = layout();
        let mut session = session();
        let (px, py) = layout.plot.to_pixel(9.0, -1.0);
        assert_eq!(
            session.press(&layout, px, py, PointerButton::Secondary),
            Response::EditLabel(9)
        );
        assert_eq!(session.drag(), DragSession::Idle);
    }

    #[test]
    fn edit_label_create_update_delete() {
        let mut session = session();
        let change = session
            .edit_label(7, &mut scripted(&["Breakfast", "eggs"], Some("egg.png")))
            .unwrap();
        assert_eq!(change, LabelChange::Created);
        assert_eq!(session.labels.get(7).unwrap().icon, Some(PathBuf::from("egg.png")));

        let change = session
            .edit_label(7, &mut scripted(&["Brunch", "eggs"], None))
            .unwrap();
        assert_eq!(change, LabelChange::Updated);
        let label = session.labels.get(7).unwrap();
        assert_eq!(label.title, "Brunch");
        assert_eq!(label.icon, Some(PathBuf::from("egg.png")));

        let change = session.edit_label(7, &mut scripted(&["", ""], None)).unwrap();
        assert_eq!(change, LabelChange::Removed);
        assert!(session.labels.is_empty());
    }

    #[test]
    fn cancelled_prompt_changes_nothing() {
        let mut session = session();
        session.labels.set(2, Label::new("Sleep", "")).unwrap();
        let mut cancelled = Scripted { answers: None, file: None };
        assert_eq!(session.edit_label(2, &mut cancelled).unwrap(), LabelChange::Unchanged);
        assert_eq!(session.labels.get(2).unwrap().title, "Sleep");
    }

    #[test]
    fn commands_apply_in_order() {
        let mut session = session();
        session.apply(CurveCommand::SetAmplitude(4, 1.0)).unwrap();
        session.apply(CurveCommand::SetAmplitude(4, -2.0)).unwrap();
        session.apply(CurveCommand::SetOffset(0.5)).unwrap();
        session.apply(CurveCommand::SetLabel(4, Label::new("Dip", ""))).unwrap();
        assert_eq!(session.series.get(4), Some(-2.0));
        assert_eq!(session.offset(), 0.5);
        assert_eq!(session.labels.len(), 1);

        assert!(session.apply(CurveCommand::SetAmplitude(30, 1.0)).is_err());

        session.apply(CurveCommand::Reset).unwrap();
        assert_eq!(session.series, TimeSeries::default());
        assert_eq!(session.offset(), 0.0);
        assert!(session.labels.is_empty());
    }

    #[test]
    fn non_finite_commands_leave_series_intact() {
        let mut session = session();
        session.apply(CurveCommand::SetAmplitude(5, 1.0)).unwrap();
        assert!(session.apply(CurveCommand::SetAmplitude(5, f64::NAN)).is_err());

        let mut values = [1.0; HOURS];
        values[0] = f64::INFINITY;
        assert!(session.apply(CurveCommand::SetAmplitudes(values)).is_err());
        assert_eq!(session.series.get(5), Some(1.0));
        assert_eq!(session.series.get(0), Some(0.0));

        let frame = crate::renderer::CurveRenderer::default().render(&session.series, 0.0);
        assert!(frame.samples.iter().all(|s| s.value.is_finite()));
    }

    #[test]
    fn non_finite_offset_range_falls_back() {
        let session = Session::new(TimeSeries::default(), f64::NAN, (f64::NAN, f64::NAN));
        assert_eq!(session.offset(), 0.0);
        let mut session = session;
        assert!(session.set_offset(10.0));
        assert_eq!(session.offset(), 3.0);
    }
}
