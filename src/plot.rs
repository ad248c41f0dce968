// ============================================================================
// CHART SCENE CONSTRUCTION
// ============================================================================

use crate::assets::Assets;
use crate::canvas::{Anchor, Canvas, DrawCommand, Scene};
use crate::colormap::Color;
use crate::config::CurveConfig;
use crate::layout::Layout;
use crate::renderer::{CurveFrame, CurveRenderer};
use crate::series::HOURS;
use crate::session::{DragSession, Session};

/// Renders the whole chart for the current session into `canvas`.
pub fn render_chart(
    canvas: &mut Canvas,
    session: &Session,
    renderer: &CurveRenderer,
    config: &CurveConfig,
    assets: &mut Assets,
) -> CurveFrame {
    let layout = config.layout(canvas.width, canvas.height);
    let frame = renderer.render(&session.series, session.offset());
    let scene = build_scene(&layout, session, &frame, config, assets);
    scene.render(canvas, assets);
    frame
}

pub fn build_scene(
    layout: &Layout,
    session: &Session,
    frame: &CurveFrame,
    config: &CurveConfig,
    assets: &mut Assets,
) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color));

    add_axes(&mut scene, layout, config);
    add_fill(&mut scene, layout, frame);
    add_curve(&mut scene, layout, frame, config);
    if config.show_control_points {
        add_markers(&mut scene, layout, session, frame, config);
    }
    add_labels(&mut scene, layout, session, frame, config, assets);
    add_slider(&mut scene, layout, session, config);

    scene
}

fn add_axes(scene: &mut Scene, layout: &Layout, config: &CurveConfig) {
    let plot = &layout.plot;
    let baseline = plot.y_to_pixel(0.0) as f32;
    scene.add_command(DrawCommand::DashedLine {
        x0: plot.left as f32,
        x1: plot.right as f32,
        y: baseline,
        dash: 6.0,
        color: config.baseline_color,
    });

    scene.add_command(DrawCommand::Text {
        x: (plot.left + plot.width() / 2.0) as i32,
        y: (plot.top / 2.0) as i32,
        text: config.title.clone(),
        font_size: config.title_font_size,
        color: config.text_color,
        anchor: Anchor::Center,
    });

    let step = config.tick_every_hours.max(1);
    for hour in (0..HOURS).step_by(step) {
        scene.add_command(DrawCommand::Text {
            x: plot.x_to_pixel(hour as f64) as i32,
            y: (plot.bottom + 18.0) as i32,
            text: hour.to_string(),
            font_size: config.tick_font_size,
            color: config.text_color,
            anchor: Anchor::Center,
        });
    }
    scene.add_command(DrawCommand::Text {
        x: (plot.left + plot.width() / 2.0) as i32,
        y: (plot.bottom + 42.0) as i32,
        text: "Time (t) [hours]".to_string(),
        font_size: config.tick_font_size,
        color: config.text_color,
        anchor: Anchor::Center,
    });

    for (value, mood) in &config.mood_ticks {
        scene.add_command(DrawCommand::Text {
            x: (plot.left - 12.0) as i32,
            y: plot.y_to_pixel(*value) as i32,
            text: mood.clone(),
            font_size: config.tick_font_size,
            color: config.text_color,
            anchor: Anchor::Right,
        });
    }
}

/// One fill column per pixel between the curve and the baseline, color and
/// alpha interpolated between the neighbouring samples.
fn add_fill(scene: &mut Scene, layout: &Layout, frame: &CurveFrame) {
    if frame.flat {
        return;
    }
    let plot = &layout.plot;
    let baseline = plot.y_to_pixel(0.0) as f32;
    for pair in frame.samples.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (xa, xb) = (plot.x_to_pixel(a.x), plot.x_to_pixel(b.x));
        let first = xa.floor() as i32;
        let last = (xb.floor() as i32).max(first);
        for px in first..last {
            let t = ((px as f64 + 0.5 - xa) / (xb - xa)).clamp(0.0, 1.0);
            let value = a.value + (b.value - a.value) * t;
            let alpha = a.fill_alpha + (b.fill_alpha - a.fill_alpha) * t;
            if alpha <= 0.0 {
                continue;
            }
            scene.add_command(DrawCommand::Fill {
                x: px,
                y0: plot.y_to_pixel(value) as f32,
                y1: baseline,
                color: a.color.lerp(b.color, t),
                alpha: alpha as f32,
            });
        }
    }
}

fn add_curve(scene: &mut Scene, layout: &Layout, frame: &CurveFrame, config: &CurveConfig) {
    let plot = &layout.plot;
    for pair in frame.samples.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (xa, ya) = plot.to_pixel(a.x, a.value);
        let (xb, yb) = plot.to_pixel(b.x, b.value);
        scene.add_command(DrawCommand::Line {
            from: (xa as f32, ya as f32),
            to: (xb as f32, yb as f32),
            thickness: config.line_thickness,
            color: a.color,
        });
    }
}

fn add_markers(
    scene: &mut Scene,
    layout: &Layout,
    session: &Session,
    frame: &CurveFrame,
    config: &CurveConfig,
) {
    let active = match session.drag() {
        DragSession::Point { index } => Some(index),
        _ => None,
    };
    let gradient = config.gradient();
    for hour in 0..HOURS {
        let value = frame.value_at(hour as f64);
        let (cx, cy) = layout.plot.to_pixel(hour as f64, value);
        let color = if frame.flat {
            gradient.neutral
        } else {
            gradient.color(value)
        };
        if active == Some(hour) {
            scene.add_command(DrawCommand::Circle {
                cx: cx as f32,
                cy: cy as f32,
                radius: config.active_marker_radius,
                color: config.text_color,
            });
        }
        scene.add_command(DrawCommand::Circle {
            cx: cx as f32,
            cy: cy as f32,
            radius: config.marker_radius,
            color,
        });
    }
}

fn add_labels(
    scene: &mut Scene,
    layout: &Layout,
    session: &Session,
    frame: &CurveFrame,
    config: &CurveConfig,
    assets: &mut Assets,
) {
    assets
        .icons
        .retain(session.labels.iter().filter_map(|(_, l)| l.icon.as_deref()));

    for (hour, label) in session.labels.iter() {
        let value = frame.value_at(hour as f64);
        let (cx, cy) = layout.plot.to_pixel(hour as f64, value);
        // text goes on the side away from the baseline
        let above = value >= 0.0;
        let dir = if above { -1.0 } else { 1.0 };

        scene.add_command(DrawCommand::Line {
            from: (cx as f32, cy as f32),
            to: (cx as f32, (cy + dir * 18.0) as f32),
            thickness: 1.0,
            color: config.label_color,
        });
        scene.add_command(DrawCommand::Circle {
            cx: cx as f32,
            cy: cy as f32,
            radius: config.marker_radius + 1.0,
            color: config.label_color,
        });

        let title_y = cy + dir * 28.0;
        let content_y = title_y + dir * (config.label_font_size as f64 + 4.0);
        let (title_y, content_y) = if above {
            (content_y, title_y)
        } else {
            (title_y, content_y)
        };

        let mut text_x = cx as i32;
        if let Some(path) = &label.icon {
            if assets.icons.load(path) {
                let half = config.icon_size as i32 / 2;
                scene.add_command(DrawCommand::Icon {
                    x: cx as i32 - config.icon_size as i32 - 4,
                    y: title_y as i32 - half,
                    path: path.clone(),
                });
                text_x = cx as i32 - 2;
            }
        }
        let anchor = if text_x == cx as i32 {
            Anchor::Center
        } else {
            Anchor::Left
        };
        scene.add_command(DrawCommand::Text {
            x: text_x,
            y: title_y as i32,
            text: label.title.clone(),
            font_size: config.label_font_size,
            color: config.label_color,
            anchor,
        });
        if !label.content.is_empty() {
            scene.add_command(DrawCommand::Text {
                x: text_x,
                y: content_y as i32,
                text: label.content.clone(),
                font_size: config.label_font_size * 0.85,
                color: config.text_color,
                anchor,
            });
        }
    }
}

fn add_slider(scene: &mut Scene, layout: &Layout, session: &Session, config: &CurveConfig) {
    let slider = &layout.slider;
    scene.add_command(DrawCommand::Line {
        from: (slider.x as f32, slider.top as f32),
        to: (slider.x as f32, slider.bottom as f32),
        thickness: 3.0,
        color: config.baseline_color,
    });
    let knob_y = slider.pixel_for(session.offset()) as f32;
    let dragging = session.drag() == DragSession::Offset;
    scene.add_command(DrawCommand::Circle {
        cx: slider.x as f32,
        cy: knob_y,
        radius: if dragging { 12.0 } else { 10.0 },
        color: config.slider_color,
    });
    scene.add_command(DrawCommand::Circle {
        cx: slider.x as f32,
        cy: knob_y,
        radius: 4.0,
        color: Color::new(0xff, 0xff, 0xff),
    });
    scene.add_command(DrawCommand::Text {
        x: slider.x as i32,
        y: (slider.bottom + 18.0) as i32,
        text: format!("{:+.1}", session.offset()),
        font_size: config.tick_font_size,
        color: config.text_color,
        anchor: Anchor::Center,
    });
}
