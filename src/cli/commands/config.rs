use intake_config::{AddressLookupMode, Config};
use crate::cli::core::{address_provider, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "General",
        "View and change shell preferences",
        "config [show|reset|set <color|lookup|login-delay|log-filter|locale> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <color|lookup|login-delay|log-filter|locale> <value>".into(),
                ));
            }
            let value = args[2..].join(" ");
            apply_setting(&mut context.config, args[1], value.trim())?;
            context.provider = address_provider(context.config.address_lookup);
            io::apply_config(&context.config);
            persist(context)?;
            io::print_success(format!("Updated `{}`.", args[1]));
            if matches!(args[1], "login-delay" | "log-filter") {
                io::print_hint("Takes effect the next time the shell starts.");
            }
            Ok(())
        }
        "reset" => {
            context.config = match &context.config_manager {
                Some(manager) => manager
                    .reset()
                    .map_err(|err| CommandError::Intake(err.into()))?,
                None => Config::default(),
            };
            context.provider = address_provider(context.config.address_lookup);
            io::apply_config(&context.config);
            io::print_success("Preferences restored to defaults.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  Locale       : {}", config.locale));
    io::print_info(format!("  Colors       : {}", on_off(config.ui_color_enabled)));
    io::print_info(format!("  Address      : {}", config.address_lookup));
    io::print_info(format!("  Login delay  : {} ms", config.guest_login_delay_ms));
    io::print_info(format!("  Log filter   : {}", config.log_filter));
    io::print_info(format!(
        "  Data dir     : {}",
        config.resolve_data_dir(context.base_dir()).display()
    ));
    if let Some(manager) = &context.config_manager {
        io::print_info(format!("  Config file  : {}", manager.config_path().display()));
    }
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    match key.to_lowercase().as_str() {
        "color" | "colors" => {
            config.ui_color_enabled = super::parse_bool(value).ok_or_else(|| {
                CommandError::InvalidArguments("color expects on or off".into())
            })?;
        }
        "lookup" | "address-lookup" => {
            config.address_lookup = AddressLookupMode::from_str(value);
        }
        "login-delay" => {
            config.guest_login_delay_ms = value.parse().map_err(|_| {
                CommandError::InvalidArguments("login-delay expects milliseconds".into())
            })?;
        }
        "log-filter" => config.log_filter = value.to_string(),
        "locale" => config.locale = value.to_string(),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    Ok(())
}

fn persist(context: &ShellContext) -> CommandResult {
    match &context.config_manager {
        Some(manager) => manager
            .save(&context.config)
            .map_err(|err| CommandError::Intake(err.into())),
        None => Ok(()),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
