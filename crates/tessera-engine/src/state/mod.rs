//! Stack of game states (screens) driven by the application loop.

mod manager;

pub use manager::GameStateManager;

/// One screen of a game: a menu, a level, an overlay.
///
/// `C` is whatever context the application threads through each call
/// (renderer, input, textures, frame time).
pub trait GameState<C> {
    fn name(&self) -> &str;

    /// Acquires resources. Called once when the state is pushed.
    fn load(&mut self, ctx: &mut C) -> anyhow::Result<()>;

    /// Advances one frame and says what the stack should do next.
    fn update(&mut self, ctx: &mut C) -> Transition<C>;

    fn draw(&mut self, ctx: &mut C);

    /// Releases resources. Called once when the state leaves the stack.
    fn unload(&mut self, ctx: &mut C);
}

/// Stack change requested by [`GameState::update`], applied after it returns.
pub enum Transition<C> {
    None,
    Push(Box<dyn GameState<C>>),
    Pop,
    Replace(Box<dyn GameState<C>>),
}

impl<C> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::None => f.write_str("None"),
            Transition::Push(s) => write!(f, "Push({})", s.name()),
            Transition::Pop => f.write_str("Pop"),
            Transition::Replace(s) => write!(f, "Replace({})", s.name()),
        }
    }
}
