//! Shell context, command dispatch and error reporting.

use std::{
    env, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tracing::{debug, warn};

use intake_config::{default_base_dir, AddressLookupMode, Config, ConfigManager};
use intake_core::{
    AddressProvider, AuthService, CoreError, Dashboard, GuestAuth, KeyValueStore, ManualEntry,
    OrderFormController, StaticPlaces, StepReport,
};
use intake_storage_json::JsonFileStore;

pub use crate::errors::CliError;
use crate::errors::IntakeError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

pub const HOME_ENV: &str = "MOVE_INTAKE_HOME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub config_manager: Option<ConfigManager>,
    pub base_dir: PathBuf,
    pub store: Arc<dyn KeyValueStore>,
    pub auth: Arc<GuestAuth>,
    pub provider: Box<dyn AddressProvider>,
    pub dashboard: Option<Dashboard>,
    /// Text of the last catalog search that matched nothing.
    pub pending_prefill: Option<String>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_base_dir);

        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load_or_init()?;
        cli_io::apply_config(&config);
        crate::init_with_filter(&config.log_filter);

        let data_dir = config.resolve_data_dir(&base_dir);
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open_or_recover(&data_dir)?);
        debug!(path = %data_dir.display(), "draft store opened");

        let mut context = Self::with_store(mode, config, store, base_dir);
        context.config_manager = Some(config_manager);
        context.resume_session();
        Ok(context)
    }

    /// Builds a context over an existing store without touching the filesystem.
    pub fn with_store(
        mode: CliMode,
        config: Config,
        store: Arc<dyn KeyValueStore>,
        base_dir: PathBuf,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let auth = Arc::new(GuestAuth::with_delay(
            Arc::clone(&store),
            Duration::from_millis(config.guest_login_delay_ms),
        ));
        let provider = address_provider(config.address_lookup);

        Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config,
            config_manager: None,
            base_dir,
            store,
            auth,
            provider,
            dashboard: None,
            pending_prefill: None,
            last_command: None,
            running: true,
        }
    }

    /// Reopens the dashboard when a guest session survived the last run.
    pub(crate) fn resume_session(&mut self) {
        if self.auth.current_user().is_none() {
            return;
        }
        match self.mount_dashboard() {
            Ok(()) => {
                if let Some(dashboard) = &self.dashboard {
                    let draft = dashboard.controller().draft();
                    if !draft.is_empty() {
                        cli_io::print_info(format!(
                            "Restored saved draft ({} items, step {}).",
                            draft.total_items(),
                            dashboard.controller().step()
                        ));
                    }
                }
            }
            Err(err) => warn!(%err, "could not resume session"),
        }
    }

    pub(crate) fn mount_dashboard(&mut self) -> Result<(), CommandError> {
        let auth: Arc<dyn AuthService> = self.auth.clone();
        let dashboard = Dashboard::mount(auth, Arc::clone(&self.store))?;
        self.dashboard = Some(dashboard);
        Ok(())
    }

    pub fn prompt(&self) -> String {
        match &self.dashboard {
            Some(dashboard) => format!(
                "move-intake[{}]> ",
                dashboard.controller().step().to_string().to_lowercase()
            ),
            None => "move-intake> ".to_string(),
        }
    }

    /// `(name, usage)` pairs for completion and hints.
    pub fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub(crate) fn dashboard(&self) -> Result<&Dashboard, CommandError> {
        self.dashboard.as_ref().ok_or(CommandError::NotSignedIn)
    }

    pub(crate) fn dashboard_mut(&mut self) -> Result<&mut Dashboard, CommandError> {
        self.dashboard.as_mut().ok_or(CommandError::NotSignedIn)
    }

    pub(crate) fn controller(&self) -> Result<&OrderFormController, CommandError> {
        self.dashboard().map(Dashboard::controller)
    }

    pub(crate) fn controller_mut(&mut self) -> Result<&mut OrderFormController, CommandError> {
        self.dashboard_mut().map(Dashboard::controller_mut)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotSignedIn => {
                cli_io::print_error(CommandError::NotSignedIn);
                cli_io::print_hint("Try `login` to start a guest session.");
                Ok(())
            }
            CommandError::Validation(messages) => {
                cli_io::print_error("Please fix the following:");
                for message in messages {
                    cli_io::print_warning(format!("  - {}", message));
                }
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

/// Script mode never prompts; it needs the caller's explicit approval.
pub(crate) fn confirm_with(
    mode: CliMode,
    theme: &ColorfulTheme,
    prompt: &str,
    approved: bool,
) -> Result<bool, CommandError> {
    if approved {
        return Ok(true);
    }
    match mode {
        CliMode::Interactive => cli_io::confirm_action(theme, prompt, false),
        CliMode::Script => {
            cli_io::print_warning(format!("{} Declined (pass --yes to confirm).", prompt));
            Ok(false)
        }
    }
}

pub(crate) fn address_provider(mode: AddressLookupMode) -> Box<dyn AddressProvider> {
    match mode {
        AddressLookupMode::Static => Box::new(StaticPlaces::sydney()),
        AddressLookupMode::Manual => Box::new(ManualEntry),
    }
}

/// Prints the messages that keep `report` from advancing.
pub(crate) fn print_step_report(report: &StepReport) {
    cli_io::print_warning(format!("{} step is incomplete:", report.step));
    for message in &report.errors {
        cli_io::print_warning(format!("  - {}", message));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Not signed in. Use `login` first.")]
    NotSignedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CommandError::NotSignedIn,
            CoreError::Validation(errors) => CommandError::Validation(errors.messages()),
            other => CommandError::Intake(IntakeError::from(other)),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Intake(inner) => CommandError::Intake(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Runs `lines` against an in-memory store with no login delay.
#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    let store: Arc<dyn KeyValueStore> = Arc::new(intake_core::MemoryStore::new());
    process_script_with(store, lines)
}

#[cfg(test)]
pub(crate) fn process_script_with(
    store: Arc<dyn KeyValueStore>,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let config = Config {
        guest_login_delay_ms: 0,
        ..Config::default()
    };
    let mut app = ShellContext::with_store(CliMode::Script, config, store, PathBuf::from("."));
    app.resume_session();
    for line in lines {
        let outcome = app.process_line(line);
        match outcome {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::MemoryStore;
    use intake_domain::{AddressSide, Step};

    const FULL_ORDER: &[&str] = &[
        "login",
        "address pickup \"1 Martin Place, Sydney NSW 2000\"",
        "pickup-time 2026-11-02 09:30",
        "contact-add pickup \"Alex Smith\" 0412345678 alex@example.com",
        "next",
        "address drop \"Bondi Beach, Bondi NSW 2026\"",
        "contact-add drop \"Sam Lee\" \"+61498765432\" sam@example.com",
        "next",
        "add \"3-Seater Sofa\"",
        "inc \"3-Seater Sofa\"",
        "add \"Queen Bed\"",
    ];

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("contact-add pickup \"Alex Smith\" 0412345678")
                .unwrap();
        assert_eq!(tokens, vec!["contact-add", "pickup", "Alex Smith", "0412345678"]);
    }

    #[test]
    fn commands_require_a_session() {
        let mut context = process_script(&[]).unwrap();
        let err = context.process_line("add Desk").unwrap_err();
        assert!(matches!(err, CommandError::NotSignedIn));
    }

    #[test]
    fn script_walks_through_every_step() {
        let context = process_script(FULL_ORDER).unwrap();
        let controller = context.controller().unwrap();

        assert_eq!(controller.step(), Step::Items);
        assert_eq!(controller.draft().total_items(), 3);
        assert!(controller.draft().distance > 0.0);
        assert_eq!(controller.draft().contacts(AddressSide::Drop).len(), 1);
        assert!(controller.can_submit());
    }

    #[test]
    fn next_stays_put_when_the_step_is_incomplete() {
        let context = process_script(&["login", "next"]).unwrap();
        assert_eq!(context.controller().unwrap().step(), Step::Shipper);
    }

    #[test]
    fn reset_without_approval_keeps_the_draft_in_script_mode() {
        let mut lines = FULL_ORDER.to_vec();
        lines.push("reset items");
        let context = process_script(&lines).unwrap();
        assert_eq!(context.controller().unwrap().draft().total_items(), 3);

        let mut lines = FULL_ORDER.to_vec();
        lines.push("reset items --yes");
        let context = process_script(&lines).unwrap();
        assert!(context.controller().unwrap().draft().items.is_empty());
    }

    #[test]
    fn submit_clears_the_persisted_draft() {
        let store = Arc::new(MemoryStore::new());
        let mut lines = FULL_ORDER.to_vec();
        lines.push("submit");
        let context = process_script_with(store.clone(), &lines).unwrap();

        assert!(context.controller().unwrap().draft().is_empty());
        assert!(store
            .keys()
            .unwrap()
            .iter()
            .all(|key| !key.starts_with("orderForm_")));
    }

    #[test]
    fn session_and_draft_survive_a_restart() {
        let store = Arc::new(MemoryStore::new());
        process_script_with(store.clone(), &["login", "add Desk", "exit"]).unwrap();

        let context = process_script_with(store, &[]).unwrap();
        let controller = context.controller().unwrap();
        assert_eq!(controller.draft().total_items(), 1);
    }

    #[test]
    fn logout_drops_the_session_and_draft() {
        let store = Arc::new(MemoryStore::new());
        let context = process_script_with(store.clone(), &["login", "add Desk", "logout"]).unwrap();
        assert!(context.dashboard.is_none());

        let context = process_script_with(store, &["login"]).unwrap();
        assert!(context.controller().unwrap().draft().is_empty());
    }

    #[test]
    fn unknown_commands_do_not_stop_the_script() {
        let context = process_script(&["lgoin", "login"]).unwrap();
        assert!(context.dashboard.is_some());
        assert!(context.running);
    }

    #[test]
    fn prompt_shows_the_active_step() {
        let context = process_script(&[]).unwrap();
        assert_eq!(context.prompt(), "move-intake> ");

        let context = process_script(&["login"]).unwrap();
        assert_eq!(context.prompt(), "move-intake[shipper]> ");
    }
}
