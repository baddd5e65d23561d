//! Who's that Pokemon? - terminal guessing game on tui-dispatch

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventKind, EventOutcome,
    RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use whosthat::action::Action;
use whosthat::api::{PokeApi, DEFAULT_API_BASE};
use whosthat::artwork::decode_artwork;
use whosthat::components::{Component, GameScreen, GameScreenProps};
use whosthat::effect::Effect;
use whosthat::logging;
use whosthat::reducer::reducer;
use whosthat::state::{dex_pool, AppState, Generation, LOADING_TICK_MS};
use whosthat::store::{ScoreStore, DEFAULT_PROFILE};

/// Who's that Pokemon? - guess the creature from its silhouette
#[derive(Parser, Debug)]
#[command(name = "whosthat")]
#[command(about = "Guess the Pokemon from its silhouette")]
struct Args {
    /// Only draw from these generations (repeatable, default: all)
    #[arg(long = "generation", value_enum)]
    generations: Vec<Generation>,

    /// Key the score is stored under
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Score file (default: <local data dir>/whosthat/score.json)
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// PokeAPI base URL (falls back to WHOSTHAT_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Do not read or write the on-disk response cache
    #[arg(long)]
    no_cache: bool,

    /// Append logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(Clone, Debug)]
struct RuntimeConfig {
    api: PokeApi,
    store: ScoreStore,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init_file_logging(path)?;
    }

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let api_base = args
        .api_base
        .or_else(|| std::env::var("WHOSTHAT_API_BASE").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let mut api = PokeApi::new(api_base);
    if args.no_cache {
        api = api.without_cache();
    }
    let store = ScoreStore::new(
        args.score_file.unwrap_or_else(ScoreStore::default_path),
        args.profile,
    );
    let config = Arc::new(RuntimeConfig { api, store });

    let score = match config.store.load() {
        Ok(score) => score,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Fix or move the file aside, or pass --score-file to use another one.");
            std::process::exit(1);
        }
    };
    tracing::info!(
        api_base = config.api.base(),
        profile = config.store.profile(),
        path = %config.store.path().display(),
        wins = score.wins,
        losses = score.losses,
        "score loaded"
    );

    let pool = dex_pool(&args.generations);
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(score, pool))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, config).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: Arc<RuntimeConfig>,
) -> io::Result<DebugRunOutput<AppState>> {
    let screen = RefCell::new(GameScreen::new());

    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::RoundStart),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            |frame, area, state, render_ctx: RenderContext| {
                let props = GameScreenProps {
                    state,
                    is_focused: render_ctx.is_focused(),
                };
                screen.borrow_mut().render(frame, area, props);
            },
            |event, state| -> EventOutcome<Action> { handle_event(&screen, event, state) },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, config.clone()),
        )
        .await
}

fn handle_event(
    screen: &RefCell<GameScreen>,
    event: &EventKind,
    state: &AppState,
) -> EventOutcome<Action> {
    if let EventKind::Resize(_, _) = event {
        return EventOutcome::ignored().with_render();
    }
    let props = GameScreenProps {
        state,
        is_focused: true,
    };
    EventOutcome::from_actions(screen.borrow_mut().handle_event(event, props))
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: Arc<RuntimeConfig>) {
    match effect {
        Effect::FetchPuzzle { id } => {
            let api = config.api.clone();
            ctx.tasks().spawn(TaskKey::new("puzzle"), async move {
                match api.fetch_puzzle(id).await {
                    Ok(puzzle) => {
                        tracing::debug!(id, clue = %puzzle.name, "puzzle loaded");
                        Action::RoundDidLoad(puzzle)
                    }
                    Err(err) => {
                        tracing::warn!(id, error = %err, "puzzle fetch failed");
                        Action::RoundDidError(err.to_string())
                    }
                }
            });
        }
        Effect::FetchArtwork { id, url } => {
            let api = config.api.clone();
            ctx.tasks().spawn(TaskKey::new("artwork"), async move {
                let bytes = match api.fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        tracing::warn!(id, %url, error = %err, "sprite fetch failed");
                        return Action::ArtworkDidError {
                            id,
                            error: err.to_string(),
                        };
                    }
                };
                match decode_artwork(&bytes) {
                    Ok(artwork) => Action::ArtworkDidLoad { id, artwork },
                    Err(err) => {
                        tracing::warn!(id, %url, error = %err, "sprite decode failed");
                        api.evict(&url).await;
                        Action::ArtworkDidError {
                            id,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::SaveScore { score } => {
            let store = config.store.clone();
            ctx.tasks().spawn(TaskKey::new("score_save"), async move {
                match store.save(score).await {
                    Ok(()) => {
                        tracing::info!(wins = score.wins, losses = score.losses, "score saved");
                        Action::ScoreDidSave
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "score save failed");
                        Action::ScoreDidError(err.to_string())
                    }
                }
            });
        }
    }
}
