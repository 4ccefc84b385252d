//! Browser front end
//!
//! `mount_dot_grid` overlays a canvas on a container element and wires:
//! - a requestAnimationFrame loop calling [`DotGrid::frame`]
//! - window `mousemove` / `click` listeners (clicks are page-wide)
//! - a ResizeObserver on the container (window `resize` as fallback)
//!
//! Every closure is kept by the handle so `destroy` can unhook it again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver, Window};

use crate::config::{GridConfig, RendererPreference};
use crate::error::GridError;
use crate::grid::{DotGrid, Host, SurfaceSize};
use crate::renderer::{CanvasSurface, DotSurface, GpuSurface};

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("dot-grid logger: {e}").into());
        }
    });
}

impl From<GridError> for JsValue {
    fn from(e: GridError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

fn dom_err(what: &str) -> impl Fn(JsValue) -> GridError + '_ {
    move |e| GridError::Web(format!("{what}: {e:?}"))
}

fn now(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

// ============================================================================
// HOST
// ============================================================================

/// Measures the container the grid fills
struct ContainerHost {
    window: Window,
    container: HtmlElement,
}

impl ContainerHost {
    /// Computed-style width/height, for containers whose rect reads zero
    fn computed_size(&self) -> Option<SurfaceSize> {
        let style = self.window.get_computed_style(&self.container).ok()??;
        let px = |name: &str| -> Option<f32> {
            let value = style.get_property_value(name).ok()?;
            value.trim().trim_end_matches("px").parse().ok()
        };
        Some(SurfaceSize::new(px("width")?, px("height")?))
    }
}

impl Host for ContainerHost {
    fn measure(&self) -> Option<SurfaceSize> {
        if !self.container.is_connected() {
            return None;
        }
        let rect = self.container.get_bounding_client_rect();
        let size = SurfaceSize::new(rect.width() as f32, rect.height() as f32);
        if size.is_empty() {
            return self.computed_size().or(Some(size));
        }
        Some(size)
    }

    fn pixel_ratio(&self) -> f32 {
        self.window.device_pixel_ratio() as f32
    }
}

// ============================================================================
// INSTANCE STATE
// ============================================================================

struct Instance {
    grid: DotGrid,
    surface: Box<dyn DotSurface>,
    host: ContainerHost,
    canvas: HtmlCanvasElement,
}

impl Instance {
    fn frame(&mut self, now: f64) {
        self.grid.frame(now, &self.host, self.surface.as_mut());
    }

    /// Canvas top-left in client coordinates
    fn origin(&self) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Mounted {
    window: Window,
    state: Rc<RefCell<Instance>>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
    observer: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

impl Mounted {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), GridError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(dom_err("addEventListener"))?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn install_pointer(&mut self) -> Result<(), GridError> {
        let target: EventTarget = self.window.clone().into();

        let state = self.state.clone();
        let window = self.window.clone();
        self.listen(&target, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
            let mut s = state.borrow_mut();
            let origin = s.origin();
            let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            s.grid.pointer_moved(client, origin, now(&window));
        })?;

        let state = self.state.clone();
        self.listen(&target, "click", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
            let mut s = state.borrow_mut();
            let origin = s.origin();
            let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            s.grid.clicked(client, origin);
        })
    }

    fn install_resize(&mut self) -> Result<(), GridError> {
        let state = self.state.clone();
        let window = self.window.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
            state.borrow_mut().grid.notify_resize(now(&window));
        });

        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.state.borrow().host.container);
                self.observer = Some((observer, callback));
                Ok(())
            }
            Err(e) => {
                log::warn!("ResizeObserver unavailable ({e:?}), listening for window resize");
                let state = self.state.clone();
                let window = self.window.clone();
                let target: EventTarget = self.window.clone().into();
                self.listen(&target, "resize", move |_| {
                    state.borrow_mut().grid.notify_resize(now(&window));
                })
            }
        }
    }

    fn start_loop(&mut self) {
        let state = self.state.clone();
        let frame = self.frame.clone();
        let frame_id = self.frame_id.clone();
        let window = self.window.clone();

        *self.frame.borrow_mut() = Some(Closure::new(move |time: f64| {
            state.borrow_mut().frame(time);
            if let Some(callback) = frame.borrow().as_ref() {
                frame_id.set(window.request_animation_frame(callback.as_ref().unchecked_ref()).ok());
            }
        }));

        if let Some(callback) = self.frame.borrow().as_ref() {
            self.frame_id
                .set(self.window.request_animation_frame(callback.as_ref().unchecked_ref()).ok());
        }
    }

    fn teardown(self) {
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Dropping the loop closure breaks its self-reference
        self.frame.borrow_mut().take();

        for listener in &self.listeners {
            let _ = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref());
        }
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }

        let mut s = self.state.borrow_mut();
        s.grid.unmount();
        s.canvas.remove();
    }
}

// ============================================================================
// BACKEND SELECTION
// ============================================================================

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, GridError> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(dom_err("createElement"))?
        .dyn_into()
        .map_err(|_| GridError::Web("created element is not a canvas".into()))?;
    let style = canvas.style();
    for (name, value) in [
        ("position", "absolute"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("pointer-events", "none"),
    ] {
        style.set_property(name, value).map_err(dom_err("style"))?;
    }
    Ok(canvas)
}

async fn gpu_surface(canvas: &HtmlCanvasElement) -> Result<GpuSurface, GridError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| GridError::Gpu(format!("create_surface: {e}")))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| GridError::Gpu(format!("request_adapter: {e}")))?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);
    GpuSurface::new(surface, &adapter).await
}

/// Pick a backend. A canvas that handed out a WebGPU context can't give a 2D
/// one, so the fallback always starts from a fresh canvas.
async fn create_surface(
    document: &Document,
    preference: RendererPreference,
) -> Result<(HtmlCanvasElement, Box<dyn DotSurface>), GridError> {
    if preference != RendererPreference::Canvas {
        let canvas = create_canvas(document)?;
        match gpu_surface(&canvas).await {
            Ok(surface) => return Ok((canvas, Box::new(surface))),
            Err(e) if preference == RendererPreference::Gpu => return Err(e),
            Err(e) => log::warn!("{e}, falling back to Canvas 2D"),
        }
    }
    let canvas = create_canvas(document)?;
    let surface = CanvasSurface::new(canvas.clone())?;
    Ok((canvas, Box::new(surface)))
}

// ============================================================================
// JS API
// ============================================================================

/// A mounted grid. Call `destroy()` (or let JS `free()` it) to unmount.
#[wasm_bindgen]
pub struct DotGridHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl DotGridHandle {
    /// Apply new settings (JSON, same keys as mount). Dot size and gap
    /// changes rebuild the grid; the renderer choice is fixed at mount.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config_json: &str) -> Result<(), JsValue> {
        let Some(mounted) = &self.mounted else {
            return Ok(());
        };
        let config = GridConfig::from_json(config_json)?;
        mounted.state.borrow_mut().grid.set_config(config);
        Ok(())
    }

    /// Unmount: stop the loop, unhook listeners, remove the canvas
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown();
        }
    }
}

impl Drop for DotGridHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Mount a dot grid filling `container`.
///
/// `config_json` may be omitted or partial; missing keys take defaults.
#[wasm_bindgen(js_name = mountDotGrid)]
pub async fn mount_dot_grid(container: HtmlElement, config_json: Option<String>) -> Result<DotGridHandle, JsValue> {
    init_logging();
    let config = match config_json.as_deref() {
        Some(json) => GridConfig::from_json(json)?,
        None => GridConfig::default(),
    };

    let window = web_sys::window().ok_or_else(|| GridError::Web("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| GridError::Web("no document".into()))?;

    // The overlay is absolutely positioned against the container
    if let Ok(Some(style)) = window.get_computed_style(&container) {
        if style.get_property_value("position").ok().as_deref() == Some("static") {
            let _ = container.style().set_property("position", "relative");
        }
    }

    let (canvas, surface) = create_surface(&document, config.renderer).await?;
    container
        .append_child(&canvas)
        .map_err(dom_err("appendChild"))?;
    log::info!("Dot grid using {} backend", surface.name());

    let mut grid = DotGrid::new(config);
    grid.mount(now(&window));

    let state = Rc::new(RefCell::new(Instance {
        grid,
        surface,
        host: ContainerHost {
            window: window.clone(),
            container,
        },
        canvas,
    }));

    let mut mounted = Mounted {
        window,
        state,
        frame: Rc::new(RefCell::new(None)),
        frame_id: Rc::new(Cell::new(None)),
        listeners: Vec::new(),
        observer: None,
    };

    let installed = mounted.install_pointer().and_then(|_| mounted.install_resize());
    if let Err(e) = installed {
        mounted.teardown();
        return Err(e.into());
    }
    mounted.start_loop();

    Ok(DotGridHandle {
        mounted: Some(mounted),
    })
}
