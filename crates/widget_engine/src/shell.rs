//! Application shell - owns the tree, the bus, and the frame loop contract
//!
//! The host drives three calls per frame, in order: [`Shell::process_event`]
//! for each input event, [`Shell::tick`] once, then [`Shell::draw`]. The
//! shell itself opens no window; the surface comes from the host.

use crate::bus::{AddressBus, Packet, PacketData, Response, MASTER};
use crate::core::config::{Config, ConfigError, ToolkitConfig};
use crate::foundation::geometry::Rect;
use crate::foundation::time::Timer;
use crate::surface::DrawSurface;
use crate::theme::Theme;
use crate::tree::{dispatch_event, InputEvent, NodeId, WidgetCtx, WidgetTree};
use crate::widgets::Desktop;

/// Shell lifecycle errors
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The toolkit runtime
pub struct Shell {
    config: ToolkitConfig,
    tree: WidgetTree,
    bus: AddressBus,
    timer: Timer,
    root: NodeId,
    running: bool,
}

impl Shell {
    /// Build a shell from an in-memory configuration
    ///
    /// The root [`Desktop`] node is created sized to the configured surface
    /// and registered first, so it holds [`MASTER`].
    pub fn new(config: ToolkitConfig) -> Self {
        let mut tree = WidgetTree::new();
        let mut bus = AddressBus::new();

        let root = tree.insert(
            Desktop::new(),
            Rect::new(0, 0, config.window.width, config.window.height),
        );
        bus.register(&mut tree, root);

        let mut shell = Self {
            config,
            tree,
            bus,
            timer: Timer::new(),
            root,
            running: true,
        };
        let theme = shell.config.theme.to_theme();
        shell.broadcast_theme(theme);
        log::info!(
            "shell up: \"{}\" {}x{}",
            shell.config.window.title,
            shell.config.window.width,
            shell.config.window.height
        );
        shell
    }

    /// Build a shell from a TOML configuration file
    pub fn from_config_file(path: &str) -> Result<Self, ShellError> {
        Ok(Self::new(ToolkitConfig::load_from_file(path)?))
    }

    /// The active configuration
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// The widget tree
    pub fn tree(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The address bus
    pub fn bus(&mut self) -> &mut AddressBus {
        &mut self.bus
    }

    /// Key of the root desktop node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Register a node on the bus and return its address
    pub fn register(&mut self, key: NodeId) -> Option<crate::bus::Address> {
        self.bus.register(&mut self.tree, key)
    }

    /// Whether the loop should keep going
    pub fn running(&self) -> bool {
        self.running
    }

    /// Ask the loop to stop after the current frame
    pub fn quit(&mut self) {
        log::info!("shutdown requested");
        self.running = false;
    }

    /// Offer one input event to the tree; true when a widget consumed it
    ///
    /// A consumed event must not fall through to whatever the host renders
    /// behind the toolkit.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        dispatch_event(&mut self.tree, &mut self.bus, self.root, event)
    }

    /// Advance one frame: clock, bus flush, widget updates, reaping
    pub fn tick(&mut self) {
        self.timer.update();
        let dt = self.timer.delta_time();

        self.bus.pump(&mut self.tree);
        self.update_walk(self.root, dt);

        // Reap nodes destroyed this frame, after their BYEs have flushed.
        for key in self.tree.terminated_keys() {
            self.bus.unregister(&mut self.tree, key);
            self.tree.free(key);
        }
    }

    fn update_walk(&mut self, key: NodeId, dt: f32) {
        let Some(node) = self.tree.node(key) else {
            return;
        };
        if node.is_terminated() {
            return;
        }
        if let Some(mut widget) = self.tree.take_widget(key) {
            {
                let mut ctx = WidgetCtx::new(&mut self.tree, &mut self.bus, key);
                widget.update(&mut ctx, dt);
            }
            self.tree.put_widget(key, widget);
        }
        let children: Vec<NodeId> = self
            .tree
            .node(key)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        for child in children {
            self.update_walk(child, dt);
        }
    }

    /// Paint the whole tree back-to-front and clear the dirty flags
    pub fn draw(&mut self, surface: &mut dyn DrawSurface) {
        self.draw_walk(self.root, surface);
    }

    fn draw_walk(&mut self, key: NodeId, surface: &mut dyn DrawSurface) {
        let Some(node) = self.tree.node(key) else {
            return;
        };
        if !node.is_visible() || node.is_terminated() {
            return;
        }
        let Some(rect) = self.tree.absolute_rect(key) else {
            return;
        };
        if let Some(widget) = self.tree.widget(key) {
            widget.draw(surface, rect);
        }
        self.tree.clear_redraw(key);
        let children: Vec<NodeId> = self
            .tree
            .node(key)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        for child in children {
            self.draw_walk(child, surface);
        }
    }

    /// Broadcast a new palette to every registered node
    pub fn broadcast_theme(&mut self, theme: Theme) {
        self.bus.post(Packet::broadcast(
            MASTER,
            Response::Theme,
            PacketData::Theme(theme),
        ));
    }

    /// Recolor to a new base hue, keeping the configured contrast
    pub fn set_theme(&mut self, hue: f32) {
        self.broadcast_theme(Theme::new(hue, self.config.theme.contrast));
    }

    /// Broadcast a liveness ping from the root
    pub fn ping(&mut self) {
        self.bus.send_ping(MASTER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::geometry::Point;
    use crate::surface::recording::RecordingSurface;
    use crate::tree::PointerButton;
    use crate::widgets::{Panel, Window};

    fn shell() -> Shell {
        Shell::new(ToolkitConfig::default())
    }

    #[test]
    fn test_root_holds_master() {
        let mut shell = shell();
        let root = shell.root();
        assert_eq!(shell.tree().node(root).unwrap().address(), Some(MASTER));
    }

    #[test]
    fn test_unconsumed_event_falls_through() {
        let mut shell = shell();
        // The desktop itself consumes clicks inside its bounds; a click
        // outside the surface lands nowhere.
        let inside = InputEvent::PointerDown {
            pos: Point { x: 10, y: 10 },
            button: PointerButton::Left,
        };
        let outside = InputEvent::PointerDown {
            pos: Point { x: -50, y: -50 },
            button: PointerButton::Left,
        };
        assert!(shell.process_event(&inside));
        assert!(!shell.process_event(&outside));
    }

    #[test]
    fn test_tick_reaps_destroyed_subtrees() {
        let mut shell = shell();
        let root = shell.root();
        let win = shell.tree().insert(Window::new(), Rect::new(10, 10, 100, 80));
        shell.tree().add(root, win);
        shell.register(win);

        shell.tree().destroy(win);
        assert!(shell.tree().contains(win));
        shell.tick();
        assert!(!shell.tree().contains(win));
    }

    #[test]
    fn test_draw_skips_hidden_subtrees() {
        let mut shell = shell();
        let root = shell.root();
        let panel = shell.tree().insert(Panel::new(), Rect::new(10, 10, 50, 50));
        shell.tree().add(root, panel);
        shell.tree().set_visible(panel, false);

        let mut surface = RecordingSurface::new(1024, 768);
        shell.draw(&mut surface);
        // Only the desktop's background fill.
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn test_draw_clears_dirty_flags() {
        let mut shell = shell();
        let root = shell.root();
        assert!(shell.tree().node(root).unwrap().needs_redraw());
        let mut surface = RecordingSurface::new(1024, 768);
        shell.draw(&mut surface);
        assert!(!shell.tree().node(root).unwrap().needs_redraw());
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut shell = shell();
        assert!(shell.running());
        shell.quit();
        assert!(!shell.running());
    }

    #[test]
    fn test_theme_broadcast_reaches_widgets_on_tick() {
        let mut shell = shell();
        let root = shell.root();
        let panel = shell.tree().insert(Panel::new(), Rect::new(0, 0, 10, 10));
        shell.tree().add(root, panel);
        shell.register(panel);

        let before = shell.tree().widget_as_mut::<Panel>(panel).unwrap().background();
        shell.set_theme(0.0);
        shell.tick();
        let after = shell.tree().widget_as_mut::<Panel>(panel).unwrap().background();
        assert_ne!(before, after);
    }
}
