//! The environment controller.
//!
//! `AleInterface` owns one engine and everything the environment adds to it:
//! frame counters, controller state, the RNG, the palette and the cached
//! observations. Every operation is synchronous and takes `&self` or
//! `&mut self`, so one instance is driven by one caller at a time; separate
//! instances share nothing and can run on separate threads.

use std::path::Path;

use crate::action::{self, Action, Player};
use crate::capture::{self, ScreenExporter};
use crate::engine::{Engine, GameInfo};
use crate::error::{AleError, Result};
use crate::palette::ColourPalette;
use crate::ram::AleRam;
use crate::rng::Random;
use crate::screen::AleScreen;
use crate::session::Session;
use crate::settings::Settings;
use crate::state::AleState;

/// Where the environment is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No ROM loaded yet.
    Unloaded,
    /// ROM just loaded; no action taken yet.
    Loaded,
    /// An episode is running, including right after `reset_game`.
    Playing,
    /// The episode is over; `reset_game` starts another.
    Terminal,
}

pub struct AleInterface<E: Engine> {
    /// Settings applied at the next load.
    pending: Settings,
    /// Settings in effect for the loaded game.
    active: Settings,
    engine: Option<E>,
    session: Session,
    rng: Random,
    palette: ColourPalette,
    screen: AleScreen,
    ram: AleRam,
    terminal: bool,
    /// No action since the last `load_rom`.
    fresh: bool,
    state_stack: Vec<AleState>,
    recorder: Option<ScreenExporter>,
}

impl<E: Engine> Default for AleInterface<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> AleInterface<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            session: Session::new(settings.noop_reset_steps),
            rng: Random::new(settings.seed()),
            pending: settings.clone(),
            active: settings,
            engine: None,
            palette: ColourPalette::new(),
            screen: AleScreen::new(0, 0),
            ram: AleRam::new(),
            terminal: false,
            fresh: false,
            state_stack: Vec::new(),
            recorder: None,
        }
    }

    /// Settings that the next `load_rom` will apply.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.pending
    }

    /// Mutable access to the pending settings.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.pending
    }

    /// Settings in effect for the loaded game.
    #[must_use]
    pub fn active_settings(&self) -> &Settings {
        &self.active
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.engine.is_none() {
            Status::Unloaded
        } else if self.game_over() {
            Status::Terminal
        } else if self.fresh {
            Status::Loaded
        } else {
            Status::Playing
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Load a cartridge image from disk.
    pub fn load_rom(&mut self, path: &Path) -> Result<()> {
        let rom = std::fs::read(path).map_err(|e| AleError::io(e, path))?;
        self.load_rom_bytes(&rom)
    }

    /// Boot a cartridge image, apply the pending settings and start the first
    /// episode.
    ///
    /// The RNG is reseeded from `random_seed`, so repeated loads with the same
    /// settings are bit-identical. On any error the previously loaded game, if
    /// any, is left untouched.
    pub fn load_rom_bytes(&mut self, rom: &[u8]) -> Result<()> {
        let settings = self.pending.clone();
        settings.validate()?;

        let mut palette = self.palette.clone();
        if let Some(file) = &settings.user_palette_file {
            palette.load_user_table(file)?;
        }
        palette.configure(settings.palette, settings.display_format)?;

        let recorder = settings
            .record_screen_dir
            .as_ref()
            .map(|dir| ScreenExporter::with_dir(palette.clone(), dir))
            .transpose()?;

        let mut engine = E::boot(rom)?;
        let mut rng = Random::new(settings.seed());
        let mut session = Session::new(settings.noop_reset_steps);
        restart_episode(&mut engine, &mut session, &mut rng, settings.system_reset_steps);
        session.reset_counters();

        let game = engine.game();
        log::info!(
            "Loaded {}: {} minimal actions, {}",
            game.name,
            game.minimal_actions.len(),
            if game.uses_paddles { "paddles" } else { "joystick" }
        );

        let (height, width) = engine.screen_size();
        self.screen = AleScreen::new(height, width);
        self.terminal = engine.is_terminal();
        self.fresh = true;
        self.engine = Some(engine);
        self.session = session;
        self.rng = rng;
        self.palette = palette;
        self.recorder = recorder;
        self.state_stack.clear();
        self.active = settings;
        self.refresh_observations();
        Ok(())
    }

    /// Metadata of the loaded game.
    pub fn game(&self) -> Result<&GameInfo> {
        Ok(self.engine()?.game())
    }

    /// Apply `action` for one frame and return that frame's reward.
    ///
    /// Controller B actions drive port B while port A idles. Exactly one frame
    /// is emulated per call, including on a terminal screen. `SAVE_STATE` and
    /// `LOAD_STATE` act on the state stack and then run an idle frame.
    pub fn act(&mut self, action: Action) -> Result<i32> {
        self.engine()?;

        let (a, b) = match action {
            Action::SaveState => {
                self.save_state()?;
                idle()
            }
            Action::LoadState => {
                match self.load_state() {
                    Err(AleError::EmptyStateStack) => {
                        log::warn!("LOAD_STATE with an empty state stack; ignored");
                    }
                    other => other?,
                }
                idle()
            }
            _ => {
                let requested = match action.player() {
                    Some(Player::B) => (Action::noop(Player::A), action),
                    _ => (action, Action::noop(Player::B)),
                };
                self.sticky(requested)
            }
        };

        self.emulate(a, b)
    }

    /// True once the game signals a terminal state, the episode frame cap is
    /// reached, or (when enabled) a life has been lost.
    #[must_use]
    pub fn game_over(&self) -> bool {
        let Some(engine) = &self.engine else {
            return false;
        };
        if self.terminal {
            return true;
        }
        if self
            .active
            .frame_limit()
            .is_some_and(|limit| self.session.episode_frame_number() >= limit)
        {
            return true;
        }
        self.active.truncate_on_loss_of_life
            && engine.lives() < self.session.episode_start_lives()
    }

    /// Start a new episode of the loaded game.
    pub fn reset_game(&mut self) -> Result<()> {
        let engine = self.engine.as_mut().ok_or(AleError::NotLoaded)?;
        restart_episode(
            engine,
            &mut self.session,
            &mut self.rng,
            self.active.system_reset_steps,
        );
        self.terminal = engine.is_terminal();
        self.fresh = false;
        self.refresh_observations();
        Ok(())
    }

    /// Every controller A action, in code order.
    #[must_use]
    pub fn legal_action_set(&self) -> Vec<Action> {
        action::legal_action_set()
    }

    /// The actions that matter for the loaded game.
    pub fn minimal_action_set(&self) -> Result<Vec<Action>> {
        Ok(self.engine()?.game().minimal_actions.clone())
    }

    /// Frames emulated since the ROM was loaded.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.session.frame_number()
    }

    /// Frames emulated since the episode began.
    #[must_use]
    pub fn episode_frame_number(&self) -> u64 {
        self.session.episode_frame_number()
    }

    pub fn lives(&self) -> Result<i32> {
        Ok(self.engine()?.lives())
    }

    /// Raw palette codes of the current frame.
    #[must_use]
    pub fn screen(&self) -> &AleScreen {
        &self.screen
    }

    /// Current RAM contents.
    #[must_use]
    pub fn ram(&self) -> &AleRam {
        &self.ram
    }

    #[must_use]
    pub fn palette(&self) -> &ColourPalette {
        &self.palette
    }

    /// Copy the current frame as interleaved RGB into `dst`.
    pub fn screen_rgb(&self, dst: &mut [u8]) -> Result<()> {
        let required = self.screen.array_size() * 3;
        check_len(required, dst.len())?;
        self.palette
            .convert_buffer_rgb(&mut dst[..required], self.screen.as_slice());
        Ok(())
    }

    #[must_use]
    pub fn screen_rgb_vec(&self) -> Vec<u8> {
        let mut out = vec![0; self.screen.array_size() * 3];
        self.palette.convert_buffer_rgb(&mut out, self.screen.as_slice());
        out
    }

    /// Copy the current frame as one luminance byte per pixel into `dst`.
    pub fn screen_grayscale(&self, dst: &mut [u8]) -> Result<()> {
        let required = self.screen.array_size();
        check_len(required, dst.len())?;
        self.palette
            .convert_buffer_grayscale(&mut dst[..required], self.screen.as_slice());
        Ok(())
    }

    #[must_use]
    pub fn screen_grayscale_vec(&self) -> Vec<u8> {
        let mut out = vec![0; self.screen.array_size()];
        self.palette
            .convert_buffer_grayscale(&mut out, self.screen.as_slice());
        out
    }

    /// Planning snapshot of the current state.
    pub fn clone_state(&self) -> Result<AleState> {
        let engine = self.engine()?;
        Ok(AleState::Planning(
            self.session.capture(engine.save_dynamics()),
        ))
    }

    /// System snapshot: the planning snapshot plus the RNG.
    pub fn clone_system_state(&self) -> Result<AleState> {
        let engine = self.engine()?;
        Ok(AleState::System {
            dynamics: self.session.capture(engine.save_dynamics()),
            rng: self.rng.to_bytes()?,
        })
    }

    /// Restore engine, counters and controllers from either kind of snapshot.
    ///
    /// The RNG is left alone, so stochastic behaviour afterwards can differ
    /// from the original run.
    pub fn restore_state(&mut self, state: &AleState) -> Result<()> {
        let engine = self.engine.as_mut().ok_or(AleError::NotLoaded)?;
        let dynamics = state.dynamics();
        engine.load_dynamics(&dynamics.engine)?;
        self.session.restore(dynamics);
        self.terminal = engine.is_terminal();
        self.refresh_observations();
        log::debug!("Restored state at frame {}", dynamics.frame_number);
        Ok(())
    }

    /// Restore a system snapshot including the RNG. Planning snapshots are
    /// rejected with `InvalidState`.
    pub fn restore_system_state(&mut self, state: &AleState) -> Result<()> {
        let AleState::System { dynamics, rng } = state else {
            return Err(AleError::InvalidState(
                "planning snapshot has no rng state".into(),
            ));
        };
        let engine = self.engine.as_mut().ok_or(AleError::NotLoaded)?;
        let rng = Random::from_bytes(rng)?;
        engine.load_dynamics(&dynamics.engine)?;
        self.rng = rng;
        self.session.restore(dynamics);
        self.terminal = engine.is_terminal();
        self.refresh_observations();
        log::debug!("Restored system state at frame {}", dynamics.frame_number);
        Ok(())
    }

    /// Push a planning snapshot onto the state stack.
    pub fn save_state(&mut self) -> Result<()> {
        let state = self.clone_state()?;
        self.state_stack.push(state);
        log::debug!("Saved state ({} on stack)", self.state_stack.len());
        Ok(())
    }

    /// Pop the most recent snapshot off the state stack and restore it.
    pub fn load_state(&mut self) -> Result<()> {
        self.engine()?;
        let state = self.state_stack.pop().ok_or(AleError::EmptyStateStack)?;
        if let Err(err) = self.restore_state(&state) {
            self.state_stack.push(state);
            return Err(err);
        }
        log::debug!("Loaded state ({} left on stack)", self.state_stack.len());
        Ok(())
    }

    /// Write the current frame to `path` as a PNG.
    pub fn save_screen_png(&self, path: &Path) -> Result<()> {
        capture::save_png(&self.screen, &self.palette, path)
    }

    /// Exporter bound to the current palette.
    #[must_use]
    pub fn create_screen_exporter(&self) -> ScreenExporter {
        ScreenExporter::new(self.palette.clone())
    }

    fn engine(&self) -> Result<&E> {
        self.engine.as_ref().ok_or(AleError::NotLoaded)
    }

    /// With `repeat_action_probability`, each port keeps its previous action
    /// instead of taking the requested one.
    fn sticky(&mut self, (a, b): (Action, Action)) -> (Action, Action) {
        let p = f64::from(self.active.repeat_action_probability);
        if p <= 0.0 {
            return (a, b);
        }
        let [last_a, last_b] = self.session.last_actions();
        let a = if self.rng.next_f64() < p { last_a } else { a };
        let b = if self.rng.next_f64() < p { last_b } else { b };
        (a, b)
    }

    /// The frame counts even when recording it fails.
    fn emulate(&mut self, a: Action, b: Action) -> Result<i32> {
        let engine = self.engine.as_mut().ok_or(AleError::NotLoaded)?;
        let outcome = self.session.step(engine, &mut self.rng, a, b);
        self.terminal = outcome.terminal;
        self.fresh = false;
        self.refresh_observations();
        let recorded = self.recorder.as_mut().map(|r| r.save_next(&self.screen));
        if let Some(Err(err)) = recorded {
            log::warn!("Frame {} not recorded: {err}", self.session.frame_number());
        }
        Ok(outcome.reward)
    }

    fn refresh_observations(&mut self) {
        if let Some(engine) = &self.engine {
            self.screen.copy_from(engine.framebuffer());
            self.ram.copy_from(engine.ram());
        }
    }
}

/// Both controllers idle.
const fn idle() -> (Action, Action) {
    (Action::PlayerANoop, Action::PlayerBNoop)
}

fn check_len(required: usize, provided: usize) -> Result<()> {
    if provided < required {
        return Err(AleError::BufferTooSmall { required, provided });
    }
    Ok(())
}

/// Power-cycle into a new episode.
///
/// Boot frames (idle, console reset and the game's starting actions) count
/// toward the global frame counter only; the episode counter ends at zero.
fn restart_episode<E: Engine>(
    engine: &mut E,
    session: &mut Session,
    rng: &mut Random,
    reset_steps: u32,
) {
    let elapsed = session.frame_number();
    let boot = session.reset_to_start(engine, rng, reset_steps);
    let starting = engine.game().starting_actions.clone();
    for action in starting {
        session.step(engine, rng, action, Action::noop(Player::B));
    }
    session.increment_frame(elapsed + boot);
    session.reset_episode_frame_number();
    session.set_episode_start_lives(engine.lives());
}
