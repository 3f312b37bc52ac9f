use tracing::info;
use tracing_subscriber::EnvFilter;

use wireview::prelude::*;
use wireview::render::COLOR_BACKGROUND;
use wireview::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

fn load_scene() -> Result<Scene, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {path}: {e}"))?;
            let scene = Scene::from_json(&text).map_err(|e| e.to_string())?;
            info!(%path, models = scene.models.len(), "loaded scene");
            Ok(scene)
        }
        None => {
            info!("no scene file given, using the built-in demo scene");
            Ok(Scene::demo())
        }
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scene = load_scene()?;

    let mut window = Window::new("wireview", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(scene, WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut renderer = Renderer::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut limiter = FrameLimiter::new(&window);

    let mut is_running = true;
    while is_running {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => is_running = false,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h)?;
                    renderer.resize(w, h);
                    engine.resize(w, h);
                }
                WindowEvent::Nav(nav) => engine.navigate(nav),
            }
        }

        let delta_ms = limiter.wait_and_get_delta(&window);
        engine.advance(delta_ms as f32);

        renderer.clear(COLOR_BACKGROUND);
        engine.render(&mut renderer);
        window.present(renderer.as_bytes())?;
    }

    Ok(())
}
