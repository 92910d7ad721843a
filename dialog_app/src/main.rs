//! Settings dialog demo
//!
//! Builds a draggable "Config" window with hue and contrast sliders plus a
//! confirm dialog, then runs a short headless frame loop, feeding synthesized
//! pointer input through the shell. Run with `RUST_LOG=debug` to watch the
//! dispatch and bus traffic.

use widget_engine::prelude::*;
use widget_engine::widgets::window::HEADER_HEIGHT;

const FRAMES: u32 = 120;

fn main() {
    widget_engine::foundation::logging::init();

    let config = ToolkitConfig::load_or_default("dialog.toml");
    let mut shell = Shell::new(config);

    let settings = GuiBuilder::create(Rect::new(120, 80, 420, 260))
        .with_title("Config")
        .with_toolbar(3)
        .with_controls()
        .build(&mut shell);

    let confirm = GuiBuilder::create(Rect::new(320, 380, 340, 200))
        .with_title("Confirm")
        .as_dialog("Apply the new palette to every open window? This cannot be undone from here.")
        .build(&mut shell);

    let mut surface = LoggingSurface::new(
        shell.config().window.width,
        shell.config().window.height,
    );

    for frame in 0..FRAMES {
        for event in script(&mut shell, &settings, &confirm, frame) {
            let consumed = shell.process_event(&event);
            log::debug!("frame {frame}: {event:?} consumed={consumed}");
        }
        shell.tick();
        shell.draw(&mut surface);

        if !shell.running() {
            break;
        }
    }

    shell.quit();
    log::info!("done: {} nodes left in the tree", shell.tree().len());
}

/// Synthesized pointer input for the given frame
fn script(
    shell: &mut Shell,
    settings: &BuiltWindow,
    confirm: &BuiltWindow,
    frame: u32,
) -> Vec<InputEvent> {
    match frame {
        // Drag the settings window by its header toward the dialog.
        10 => vec![press(header_point(shell, settings.window))],
        11..=30 => {
            let p = header_point(shell, settings.window);
            vec![InputEvent::PointerMove {
                pos: Point {
                    x: p.x + 4,
                    y: p.y + 2,
                },
            }]
        }
        31 => vec![lift(header_point(shell, settings.window))],

        // Sweep the hue slider.
        40 => settings
            .hue_slider
            .map(|key| press(center(shell, key)))
            .into_iter()
            .collect(),
        41..=60 => settings
            .hue_slider
            .map(|key| {
                let pos = center(shell, key);
                InputEvent::PointerMove {
                    pos: Point {
                        x: pos.x + (frame as i32 - 50) * 8,
                        y: pos.y,
                    },
                }
            })
            .into_iter()
            .collect(),
        61 => settings
            .hue_slider
            .map(|key| lift(center(shell, key)))
            .into_iter()
            .collect(),

        // Ask the bus who is alive.
        70 => {
            shell.ping();
            Vec::new()
        }

        // Confirm the dialog, which tears its window down.
        90 => confirm_ok_point(shell, confirm).map(press).into_iter().collect(),
        91 => confirm_ok_point(shell, confirm).map(lift).into_iter().collect(),

        _ => Vec::new(),
    }
}

fn press(pos: Point) -> InputEvent {
    InputEvent::PointerDown {
        pos,
        button: PointerButton::Left,
    }
}

fn lift(pos: Point) -> InputEvent {
    InputEvent::PointerUp {
        pos,
        button: PointerButton::Left,
    }
}

fn header_point(shell: &mut Shell, window: NodeId) -> Point {
    let rect = shell.tree().absolute_rect(window).unwrap_or_default();
    Point {
        x: rect.x + rect.width() as i32 / 2,
        y: rect.y + HEADER_HEIGHT as i32 / 2,
    }
}

fn center(shell: &mut Shell, key: NodeId) -> Point {
    let rect = shell.tree().absolute_rect(key).unwrap_or_default();
    Point {
        x: rect.x + rect.width() as i32 / 2,
        y: rect.y + rect.height() as i32 / 2,
    }
}

fn confirm_ok_point(shell: &mut Shell, confirm: &BuiltWindow) -> Option<Point> {
    let rect = shell.tree().absolute_rect(confirm.window)?;
    Some(Point {
        x: rect.right() - 18,
        y: rect.bottom() - 18,
    })
}
