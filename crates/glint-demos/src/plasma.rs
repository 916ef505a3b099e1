//! Default renderer only: a fullscreen plasma shader driven by time.
//!
//! Esc quits. Resizes are logged.

use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::{Event, EventControl, Graphics, GraphicsConfig, Key};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = GraphicsConfig::new().title("glint plasma").size(960, 540);
    let mut gfx = Graphics::new(config, ())?;

    gfx.set_event_handler(|gfx, event| match event {
        Event::KeyDown(key) if key.keycode == Key::Escape => {
            gfx.quit();
            EventControl::Handled
        }
        Event::WindowResized { width, height } => {
            log::info!("resized to {width}x{height}");
            EventControl::Handled
        }
        _ => EventControl::Unhandled,
    });

    gfx.run()?;

    log::info!("plasma ran for {:.1}s", gfx.elapsed_time());
    gfx.teardown();
    Ok(())
}
