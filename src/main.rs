//! Soap Bubbles entry point
//!
//! Native builds run a headless field and log what happened. The wasm32 build
//! puts the field on a full-page canvas.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use soap_bubbles::platform::{self, HeadlessSurface};
    use soap_bubbles::{BubbleResult, Field, FieldOptions};

    const DEFAULT_TARGET_COUNT: usize = 20;
    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;
    const FRAMES: u32 = 600;

    /// Options from the first argument as JSON, or a 20 bubble field
    fn options() -> BubbleResult<FieldOptions> {
        match std::env::args().nth(1) {
            Some(json) => FieldOptions::from_json(&json),
            None => Ok(FieldOptions::default().with_target_count(DEFAULT_TARGET_COUNT)),
        }
    }

    pub fn run() -> BubbleResult<()> {
        let options = options()?;
        let mut surface = HeadlessSurface::new(WIDTH, HEIGHT, 1.0);
        let mut field = Field::new(WIDTH, HEIGHT, options)?;
        field.start()?;

        for frame in 0..FRAMES {
            platform::tick(&mut field, &mut surface);

            // Poke the middle of the screen every couple of seconds
            if frame % 120 == 119 {
                let popped = platform::pick(
                    &mut field,
                    &surface,
                    f64::from(WIDTH) / 2.0,
                    f64::from(HEIGHT) / 2.0,
                );
                log::info!("Frame {}: popped {} bubbles", frame + 1, popped);
            }
        }
        field.stop()?;

        let largest = field
            .bubbles()
            .iter()
            .map(|bubble| bubble.radius)
            .fold(0.0, f64::max);
        log::info!(
            "{} frames presented: {} bubbles, largest radius {:.1} of {}, {} popped, speed x{}, {} sprites cached",
            surface.presented(),
            field.len(),
            largest,
            field.params().max_radius,
            field.removed_total(),
            field.speed_multiplier(),
            field.sprite_cache().len()
        );
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::{Clamped, JsCast};
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData, KeyboardEvent,
        MouseEvent, Window,
    };

    use soap_bubbles::platform::{self, Surface};
    use soap_bubbles::renderer::Pixmap;
    use soap_bubbles::{BubbleError, Field, FieldOptions};

    const DEFAULT_TARGET_COUNT: usize = 20;

    /// A canvas filling the page, presented through `putImageData`
    struct CanvasSurface {
        window: Window,
        canvas: HtmlCanvasElement,
        context: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        fn create(window: Window, document: &Document) -> Result<Self, JsValue> {
            let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
            let style = canvas.style();
            for (name, value) in [
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
            ] {
                style.set_property(name, value)?;
            }

            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("document has no body"))?;
            body.append_child(&canvas)?;

            let context: CanvasRenderingContext2d = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("no 2d context"))?
                .dyn_into()?;

            let surface = Self {
                window,
                canvas,
                context,
            };
            surface.sync_size();
            Ok(surface)
        }

        /// Match the backing store to the CSS box at the current pixel ratio
        fn sync_size(&self) {
            let (width, height) = platform::device_size(
                f64::from(self.canvas.client_width()),
                f64::from(self.canvas.client_height()),
                self.pixel_ratio(),
            );
            if self.canvas.width() != width {
                self.canvas.set_width(width);
            }
            if self.canvas.height() != height {
                self.canvas.set_height(height);
            }
        }
    }

    impl Surface for CanvasSurface {
        fn size(&self) -> (u32, u32) {
            (self.canvas.width(), self.canvas.height())
        }

        fn pixel_ratio(&self) -> f64 {
            self.window.device_pixel_ratio()
        }

        fn present(&mut self, frame: &Pixmap) {
            if frame.width() == 0 || frame.height() == 0 {
                return;
            }
            let bytes = frame.to_straight_rgba();
            let image = match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&bytes),
                frame.width(),
                frame.height(),
            ) {
                Ok(image) => image,
                Err(err) => {
                    log::warn!("ImageData rejected frame: {:?}", err);
                    return;
                }
            };
            if let Err(err) = self.context.put_image_data(&image, 0.0, 0.0) {
                log::warn!("putImageData failed: {:?}", err);
            }
        }
    }

    struct App {
        field: Field,
        surface: CanvasSurface,
    }

    impl App {
        fn toggle(&mut self) {
            let result = if self.field.is_running() {
                self.field.stop()
            } else {
                self.field.start()
            };
            if let Err(err) = result {
                log::warn!("Toggle failed: {}", err);
            }
        }
    }

    fn js_error(err: BubbleError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// `<body data-options='{"target_count": 30}'>` overrides the defaults
    fn read_options(document: &Document) -> Result<FieldOptions, JsValue> {
        let json = document.body().and_then(|body| body.dataset().get("options"));
        match json {
            Some(json) => FieldOptions::from_json(&json).map_err(js_error),
            None => Ok(FieldOptions::default().with_target_count(DEFAULT_TARGET_COUNT)),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let options = read_options(&document)?;
        let surface = CanvasSurface::create(window.clone(), &document)?;
        let (width, height) = surface.size();
        let mut field = Field::new(width, height, options).map_err(js_error)?;
        field.start().map_err(js_error)?;

        let app = Rc::new(RefCell::new(App { field, surface }));
        setup_input_handlers(&window, app.clone())?;
        request_animation_frame(&window, app);

        log::info!("Soap bubbles running, space toggles the animation");
        Ok(())
    }

    fn setup_input_handlers(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Click pops bubbles under the pointer
        {
            let app_ref = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut app = app_ref.borrow_mut();
                let App { field, surface } = &mut *app;
                platform::pick(
                    field,
                    &*surface,
                    f64::from(event.offset_x()),
                    f64::from(event.offset_y()),
                );
            });
            app.borrow()
                .surface
                .canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window resize re-sizes the canvas and the field with it
        {
            let app_ref = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut app = app_ref.borrow_mut();
                app.surface.sync_size();
                let (width, height) = app.surface.size();
                app.field.resize(width, height);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Space toggles the animation
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    app.borrow_mut().toggle();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(window: &Window, app: Rc<RefCell<App>>) {
        let next_window = window.clone();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(&next_window, app);
        });
        if let Err(err) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", err);
        }
        closure.forget();
    }

    fn frame_loop(window: &Window, app: Rc<RefCell<App>>) {
        {
            let mut app = app.borrow_mut();
            let App { field, surface } = &mut *app;
            platform::tick(field, surface);
        }
        request_animation_frame(window, app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Soap bubbles (headless) starting...");
    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
