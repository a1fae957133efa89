use intake_core::{AuthService, DashboardTab, TabContent};
use tracing::info;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const GROUP: &str = "Session";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("login", GROUP, "Sign in as the guest user", "login", cmd_login),
        CommandEntry::new(
            "logout",
            GROUP,
            "Sign out and discard the draft",
            "logout",
            cmd_logout,
        ),
        CommandEntry::new("whoami", GROUP, "Show the signed-in user", "whoami", cmd_whoami),
        CommandEntry::new(
            "tab",
            GROUP,
            "List dashboard tabs or switch to one",
            "tab [order|bids|track|payments|profile]",
            cmd_tab,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if let Some(user) = context.dashboard.as_ref().and_then(|d| d.viewer()) {
        io::print_info(format!("Already signed in as {}.", user.display_name));
        return Ok(());
    }

    io::print_info("Signing in as guest...");
    let user = context.auth.sign_in_as_guest().map_err(|err| {
        CommandError::Message(format!("Failed to sign in as guest. {}", err))
    })?;
    context.mount_dashboard()?;
    info!(uid = %user.uid, "shell session started");
    io::print_success(format!("Signed in as {}.", user.display_name));

    if let Ok(controller) = context.controller() {
        let draft = controller.draft();
        if !draft.is_empty() {
            io::print_info(format!(
                "Restored saved draft ({} items, step {}).",
                draft.total_items(),
                controller.step()
            ));
        }
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.dashboard_mut()?.logout()?;
    context.dashboard = None;
    context.pending_prefill = None;
    io::print_success("Signed out. The draft was discarded.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.auth.current_user() {
        Some(user) => {
            io::print_info(format!("{} <{}>", user.display_name, user.email));
            if user.is_anonymous {
                io::print_hint("Guest session.");
            }
        }
        None => io::print_info("Not signed in."),
    }
    Ok(())
}

fn cmd_tab(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        let dashboard = context.dashboard()?;
        output_section("Dashboard");
        for tab in DashboardTab::ALL {
            let marker = if tab == dashboard.tab() { "*" } else { " " };
            let note = if tab.is_available() { "" } else { " (coming soon)" };
            io::print_info(format!("{} {:<9} {}{}", marker, tab.slug(), tab.label(), note));
        }
        return Ok(());
    };

    let tab = DashboardTab::parse(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown tab `{}`", raw)))?;
    let content = context.dashboard_mut()?.select_tab(tab);
    render_tab(tab, content);
    Ok(())
}

fn render_tab(tab: DashboardTab, content: TabContent) {
    output_section(tab.label());
    match content {
        TabContent::OrderForm => {
            io::print_info("Use `status` to review the draft and `help` for form commands.");
        }
        TabContent::ComingSoon(label) => io::print_info(format!("{} is coming soon.", label)),
        TabContent::Profile(user) => {
            io::print_info(format!("  Name   : {}", user.display_name));
            io::print_info(format!("  Email  : {}", user.email));
            io::print_info(format!("  User ID: {}", user.uid));
        }
    }
}
