use compose_core::{location_key, ComposeError, Composition, Key, RuntimeHandle};

/// Passes after which [`ComposeTestRule::pump_until_idle`] gives up on a
/// composition that keeps scheduling itself.
const MAX_IDLE_PASSES: usize = 64;

/// Headless harness for exercising compositions in tests.
///
/// `ComposeTestRule` owns a [`Composition`] together with the content it
/// renders, so a test can install content once and then drive further passes
/// and effect flushes by hand.
pub struct ComposeTestRule {
    composition: Composition,
    content: Option<Box<dyn FnMut()>>, // Stored user content for reuse across passes.
    root_key: Key,
}

impl ComposeTestRule {
    pub fn new() -> Self {
        Self::with_composition(Composition::new())
    }

    /// Wraps an existing composition, e.g. one built over a custom scheduler.
    pub fn with_composition(composition: Composition) -> Self {
        Self {
            composition,
            content: None,
            root_key: location_key(file!(), line!(), column!()),
        }
    }

    /// Install the provided content and perform an initial render.
    pub fn set_content(&mut self, content: impl FnMut() + 'static) -> Result<(), ComposeError> {
        self.content = Some(Box::new(content));
        self.render()
    }

    /// Force a pass over the installed content.
    pub fn recompose(&mut self) -> Result<(), ComposeError> {
        self.render()
    }

    /// Flush passive effects and re-render until no update is pending.
    ///
    /// Returns the number of passes rendered. Panics when the content keeps
    /// scheduling itself past a fixed number of passes.
    pub fn pump_until_idle(&mut self) -> Result<usize, ComposeError> {
        let mut passes = 0;
        loop {
            self.composition.flush_effects();
            if !self.composition.should_render() {
                break;
            }
            passes += 1;
            if passes > MAX_IDLE_PASSES {
                panic!("composition still scheduling after {MAX_IDLE_PASSES} passes");
            }
            self.render()?;
        }
        log::trace!("idle after {passes} pass(es)");
        Ok(passes)
    }

    pub fn flush_effects(&mut self) -> usize {
        self.composition.flush_effects()
    }

    pub fn should_render(&self) -> bool {
        self.composition.should_render()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.composition.runtime_handle()
    }

    /// Drops the installed content and unmounts the tree.
    pub fn dispose(&mut self) {
        self.content = None;
        self.composition.dispose();
    }

    /// Gain mutable access to the raw composition for advanced scenarios.
    pub fn composition(&mut self) -> &mut Composition {
        &mut self.composition
    }

    fn render(&mut self) -> Result<(), ComposeError> {
        if let Some(content) = self.content.as_mut() {
            self.composition.render(self.root_key, &mut **content)?;
        }
        Ok(())
    }
}

impl Default for ComposeTestRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// `ComposeTestRule`.
pub fn run_test_composition<R>(f: impl FnOnce(&mut ComposeTestRule) -> R) -> R {
    let mut rule = ComposeTestRule::new();
    f(&mut rule)
}
