use anyhow::Context;

use super::{GameState, Transition};

pub struct GameStateManager<C> {
    stack: Vec<Box<dyn GameState<C>>>,
}

impl<C> Default for GameStateManager<C> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<C> GameStateManager<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `state` and makes it the active (top) state.
    ///
    /// A state whose `load` fails is not pushed.
    pub fn push_state(&mut self, mut state: Box<dyn GameState<C>>, ctx: &mut C) -> anyhow::Result<()> {
        log::info!("Entering state {}", state.name());
        state
            .load(ctx)
            .with_context(|| format!("failed to load state '{}'", state.name()))?;
        self.stack.push(state);
        Ok(())
    }

    /// Unloads and removes the top state. No-op on an empty stack.
    pub fn pop_state(&mut self, ctx: &mut C) {
        if let Some(mut state) = self.stack.pop() {
            log::info!("Exiting state {}", state.name());
            state.unload(ctx);
        }
    }

    /// Updates the top state, then applies the transition it returned.
    pub fn update(&mut self, ctx: &mut C) -> anyhow::Result<()> {
        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        match top.update(ctx) {
            Transition::None => Ok(()),
            Transition::Push(next) => self.push_state(next, ctx),
            Transition::Pop => {
                self.pop_state(ctx);
                Ok(())
            }
            Transition::Replace(next) => {
                self.pop_state(ctx);
                self.push_state(next, ctx)
            }
        }
    }

    /// Draws every state, bottom of the stack first.
    pub fn draw(&mut self, ctx: &mut C) {
        for state in &mut self.stack {
            state.draw(ctx);
        }
    }

    /// Unloads all states, top first.
    pub fn clear(&mut self, ctx: &mut C) {
        while !self.stack.is_empty() {
            self.pop_state(ctx);
        }
    }

    pub fn has_game_ended(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn active_state_name(&self) -> Option<&str> {
        self.stack.last().map(|s| s.name())
    }
}
