use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use pager_core::{update, FetchError, ListMode, ListState, Msg, QueryKey};
use pager_engine::{CredentialProvider, EngineError, EnvToken, HttpCollection, NoCredentials};
use pager_logging::pager_info;
use thiserror::Error;

use crate::commands::{self, Command, HELP};
use crate::config::{AppConfig, CliArgs};
use crate::effects::EffectRunner;
use crate::movie::MovieSummary;
use crate::render;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot build collection endpoint: {0}")]
    Endpoint(#[from] FetchError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}

/// Everything the update loop reacts to.
pub enum Inbox {
    Command(Command),
    Engine(Msg<MovieSummary>),
}

pub fn run(config: AppConfig, args: CliArgs) -> Result<(), AppError> {
    let credentials: Arc<dyn CredentialProvider> = match config.token_env.as_deref() {
        Some(var) => Arc::new(EnvToken::new(var)),
        None => Arc::new(NoCredentials),
    };
    let endpoint = Arc::new(HttpCollection::<MovieSummary>::new(
        config.endpoint_settings(),
        credentials,
    )?);

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(endpoint, inbox_tx.clone())?;
    spawn_input_reader(inbox_tx);

    let mut session = Session {
        config,
        mode: args.mode,
        state: ListState::new(),
        runner,
    };
    // Not locked for the whole session: the terminal logger writes from engine threads.
    let mut out = io::stdout();
    writeln!(out, "{HELP}")?;

    session.dispatch(
        Msg::Initialize {
            key: args.initial_key(&session.config),
            mode: session.mode,
        },
        &mut out,
    )?;

    while let Ok(event) = inbox_rx.recv() {
        let msg = match event {
            Inbox::Engine(msg) => msg,
            Inbox::Command(Command::Quit) => {
                session.dispatch(Msg::Unmounted, &mut out)?;
                break;
            }
            Inbox::Command(Command::Help) => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Inbox::Command(Command::Unknown(text)) => {
                writeln!(out, "unknown command `{text}`; type `help`")?;
                continue;
            }
            Inbox::Command(command) => match session.translate(command) {
                Some(msg) => msg,
                None => continue,
            },
        };
        session.dispatch(msg, &mut out)?;
    }

    pager_info!("Session ended");
    Ok(())
}

struct Session {
    config: AppConfig,
    mode: ListMode,
    state: ListState<MovieSummary>,
    runner: EffectRunner,
}

impl Session {
    fn translate(&mut self, command: Command) -> Option<Msg<MovieSummary>> {
        match command {
            Command::Next => Some(Msg::AdvanceRequested),
            Command::Prev => Some(Msg::RetractRequested),
            Command::Retry => Some(Msg::RetryRequested),
            Command::Open { path, search } => {
                let key = QueryKey::new(path);
                let key = match search {
                    Some(term) => key.with_search(term),
                    None => key,
                };
                Some(self.initialize(key))
            }
            Command::Search(term) => Some(self.initialize(self.config.search_key(&term))),
            Command::Mode(mode) => {
                self.mode = mode;
                let key = self.state.query().cloned()?;
                Some(self.initialize(key))
            }
            Command::Help | Command::Quit | Command::Empty | Command::Unknown(_) => None,
        }
    }

    fn initialize(&self, key: QueryKey) -> Msg<MovieSummary> {
        Msg::Initialize {
            key,
            mode: self.mode,
        }
    }

    fn dispatch(&mut self, msg: Msg<MovieSummary>, out: &mut impl Write) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        let dirty = state.consume_dirty();
        let view = dirty.then(|| state.view());
        self.state = state;

        if let Some(view) = view {
            for line in render::render(&view) {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        }
        Ok(())
    }
}

fn spawn_input_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = commands::parse(&line);
            if command == Command::Empty {
                continue;
            }
            let quit = command == Command::Quit;
            if tx.send(Inbox::Command(command)).is_err() || quit {
                return;
            }
        }
        // End of input behaves like `quit`.
        let _ = tx.send(Inbox::Command(Command::Quit));
    });
}

#[cfg(test)]
mod tests {
    use pager_core::Status;

    use super::*;

    fn session(mode: ListMode) -> Session {
        let config = AppConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::default()
        };
        let endpoint = Arc::new(
            HttpCollection::<MovieSummary>::new(config.endpoint_settings(), Arc::new(NoCredentials))
                .unwrap(),
        );
        let (tx, _rx) = mpsc::channel();
        Session {
            config,
            mode,
            state: ListState::new(),
            runner: EffectRunner::new(endpoint, tx).unwrap(),
        }
    }

    #[test]
    fn search_command_uses_configured_collection() {
        let mut session = session(ListMode::Accumulate);
        let msg = session.translate(Command::Search("ponyo".to_string()));

        assert_eq!(
            msg,
            Some(Msg::Initialize {
                key: QueryKey::new("search/movie").with_search("ponyo"),
                mode: ListMode::Accumulate,
            })
        );
    }

    #[test]
    fn mode_switch_reinitializes_current_query() {
        let mut session = session(ListMode::Replace);
        assert_eq!(session.translate(Command::Mode(ListMode::Accumulate)), None);

        let mut sink = Vec::new();
        session
            .dispatch(
                Msg::Initialize {
                    key: QueryKey::new("movie/popular"),
                    mode: ListMode::Accumulate,
                },
                &mut sink,
            )
            .unwrap();
        assert_eq!(session.state.status(), Status::Loading);
        assert!(String::from_utf8(sink).unwrap().starts_with("[loading] movie/popular"));

        let msg = session.translate(Command::Mode(ListMode::Replace));
        assert_eq!(
            msg,
            Some(Msg::Initialize {
                key: QueryKey::new("movie/popular"),
                mode: ListMode::Replace,
            })
        );
    }
}
