use std::io;

use crossterm::event::{self, Event};
use log::{info, warn};

use crate::action::Action;
use crate::command::{Command, parse_key};
use crate::cursor::Cursor;
use crate::persist::{SaveFile, SaveStore};
use crate::renderer::{Renderer, View};
use crate::state::GameState;

const WON: &str = "YOU WON! Press 'n' for a new game, 'q' to quit.";

/// The main game loop. `renderer` is injected so the engine stays
/// renderer-agnostic.
pub struct App<R: Renderer> {
    state: GameState,
    cursor: Cursor,
    renderer: R,
    store: Option<SaveStore>,
    status: String,
    show_help: bool,
    /// Seed for the next deal; `None` deals from OS entropy.
    seed: Option<u64>,
}

impl<R: Renderer> App<R> {
    pub fn new(state: GameState, renderer: R, store: Option<SaveStore>) -> Self {
        let mut app = App {
            state,
            cursor: Cursor::new(),
            renderer,
            store,
            status: "Solitaire".to_string(),
            show_help: false,
            seed: None,
        };
        app.refresh();
        app
    }

    /// Deal a new game, seeded if `seed` is given.
    pub fn deal(seed: Option<u64>, renderer: R, store: Option<SaveStore>) -> Self {
        let state = match seed {
            Some(seed) => GameState::deal_seeded(seed),
            None => GameState::deal_random(),
        };
        info!("Dealt a new game (seed {seed:?})");
        let mut app = Self::new(state, renderer, store);
        app.seed = seed.map(|s| s.wrapping_add(1));
        app
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run the interactive loop until the player quits.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.draw()?;

            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = parse_key(key) {
                    if self.handle(cmd) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn draw(&mut self) -> io::Result<()> {
        self.renderer.render(&View {
            state: &self.state,
            cursor: &self.cursor,
            status: &self.status,
            show_help: self.show_help,
        })
    }

    /// Dispatch a command. Returns `true` if the game should exit.
    pub fn handle(&mut self, cmd: Command) -> bool {
        let moving = self.cursor.is_moving();

        match cmd {
            Command::Quit => {
                info!("Quit");
                return true;
            }
            Command::Help => self.show_help = !self.show_help,
            Command::Up => self.cursor.up(&self.state),
            Command::Down => self.cursor.down(&self.state),
            Command::Left => self.cursor.left(&self.state),
            Command::Right => self.cursor.right(&self.state),
            Command::Select if moving => {
                if let Some(action) = self.cursor.drop_action(&self.state) {
                    self.status = action.execute(&mut self.state);
                }
                self.cursor.finish_move(&self.state);
            }
            Command::Select => {
                self.cursor.start_move(&self.state);
            }
            Command::Cancel => self.cursor.cancel_move(),
            // Everything below acts on the table and waits until a move
            // in progress is dropped or cancelled.
            _ if moving => {}
            Command::NextInPile => self.status = Action::NextInPile.execute(&mut self.state),
            Command::Resolve => {
                if let Some(action) = self.cursor.resolve_action(&self.state) {
                    self.status = action.execute(&mut self.state);
                }
            }
            Command::AutoResolve => {
                self.status = match self.state.auto_resolve() {
                    Some(n) => format!("Auto-resolved {n} card(s)"),
                    None => "Nothing to resolve!".to_string(),
                };
            }
            Command::Undo => self.status = self.state.undo_last(),
            Command::Save => self.save(),
            Command::Load => self.load(),
            Command::NewGame => {
                if self.state.is_won() {
                    self.new_game();
                }
            }
        }

        self.refresh();
        false
    }

    fn save(&mut self) {
        let Some(store) = &self.store else {
            self.status = "Cannot save state!".to_string();
            return;
        };
        match store.save(&SaveFile::capture(&self.state, &self.cursor)) {
            Ok(()) => self.status = "State saved!".to_string(),
            Err(e) => {
                warn!("Saving to {} failed: {e}", store.path().display());
                self.status = "Cannot save state!".to_string();
            }
        }
    }

    fn load(&mut self) {
        let Some(store) = &self.store else {
            self.status = "Cannot load state!".to_string();
            return;
        };
        match store.load().and_then(SaveFile::restore) {
            Ok((state, cursor)) => {
                self.state = state;
                self.cursor = cursor;
                self.status = "State loaded!".to_string();
            }
            Err(e) => {
                warn!("Loading from {} failed: {e}", store.path().display());
                self.status = "Cannot load state!".to_string();
            }
        }
    }

    fn new_game(&mut self) {
        self.state = match self.seed {
            Some(seed) => GameState::deal_seeded(seed),
            None => GameState::deal_random(),
        };
        info!("Dealt a new game (seed {:?})", self.seed);
        self.seed = self.seed.map(|s| s.wrapping_add(1));
        self.cursor = Cursor::new();
        self.status = "Solitaire".to_string();
    }

    /// Turn up exposed cards and put the cursor back on the table.
    fn refresh(&mut self) {
        self.state.reveal();
        self.cursor.settle(&self.state);
        if self.state.is_won() {
            self.status = WON.to_string();
        }
    }
}
