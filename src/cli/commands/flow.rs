use intake_core::{SubmitOutcome, Transition};
use intake_domain::{Panel, ResetScope, Step};

use crate::cli::core::{confirm_with, print_step_report, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block as output_block, section as output_section};
use crate::cli::registry::CommandEntry;

const GROUP: &str = "Order form";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            GROUP,
            "Show the order summary",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "step",
            GROUP,
            "Show the current step and what it still needs",
            "step",
            cmd_step,
        ),
        CommandEntry::new(
            "next",
            GROUP,
            "Continue to the next step",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", GROUP, "Return to the previous step", "back", cmd_back),
        CommandEntry::new(
            "goto",
            GROUP,
            "Jump to a step",
            "goto <shipper|consignee|items>",
            cmd_goto,
        ),
        CommandEntry::new(
            "reset",
            GROUP,
            "Clear the pickup, drop or item details",
            "reset <pickup|drop|items> [--yes]",
            cmd_reset,
        ),
        CommandEntry::new(
            "submit",
            GROUP,
            "Submit the order once every step is complete",
            "submit [--json]",
            cmd_submit,
        ),
        CommandEntry::new(
            "panel",
            GROUP,
            "Open or close a form section",
            "panel <pickup-address|pickup-contacts|drop-address|drop-contacts|items|custom-item>",
            cmd_panel,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let controller = context.controller()?;
    output_section("Order summary");
    output_block(controller.summary());
    Ok(())
}

fn cmd_step(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let controller = context.controller()?;
    let step = controller.step();
    let position = Step::ALL.iter().position(|s| *s == step).map_or(1, |i| i + 1);
    io::print_info(format!(
        "Step {} of {}: {}",
        position,
        Step::ALL.len(),
        step
    ));
    let report = controller.validate_step(step);
    if report.is_valid() {
        io::print_success("This step is complete.");
    } else {
        print_step_report(&report);
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transition = context.controller_mut()?.next()?;
    match transition {
        Transition::Stayed(_) => {
            io::print_info("This is the last step. Use `submit` when the order is ready.");
        }
        other => report_transition(other),
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transition = context.controller_mut()?.back()?;
    report_transition(transition);
    Ok(())
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step = args
        .first()
        .and_then(|raw| Step::parse(raw))
        .ok_or_else(|| {
            CommandError::InvalidArguments("usage: goto <shipper|consignee|items>".into())
        })?;
    let transition = context.controller_mut()?.go_to(step)?;
    report_transition(transition);
    Ok(())
}

fn report_transition(transition: Transition) {
    match transition {
        Transition::Moved { from, to } => {
            io::print_success(format!("{} -> {}", from, to));
        }
        Transition::Blocked(report) => print_step_report(&report),
        Transition::Stayed(step) => io::print_info(format!("Staying on {}.", step)),
    }
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (approved, rest) = super::take_yes_flag(args);
    let scope = rest
        .first()
        .and_then(|raw| ResetScope::parse(raw))
        .ok_or_else(|| {
            CommandError::InvalidArguments("usage: reset <pickup|drop|items> [--yes]".into())
        })?;

    let ShellContext {
        dashboard,
        mode,
        theme,
        ..
    } = context;
    let controller = dashboard
        .as_mut()
        .ok_or(CommandError::NotSignedIn)?
        .controller_mut();

    let mut failure = None;
    let reset = controller.reset(scope, &mut |prompt: &str| {
        match confirm_with(*mode, &*theme, prompt, approved) {
            Ok(answer) => answer,
            Err(err) => {
                failure = Some(err);
                false
            }
        }
    })?;
    if let Some(err) = failure {
        return Err(err);
    }

    if reset {
        io::print_success(format!("Cleared {} details.", scope));
    } else {
        io::print_info("Nothing was reset.");
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_json = args.iter().any(|arg| *arg == "--json");
    let outcome = context.controller_mut()?.submit(None)?;
    match outcome {
        SubmitOutcome::Blocked(reports) => {
            io::print_warning("The order cannot be submitted yet.");
            for report in &reports {
                print_step_report(report);
            }
        }
        SubmitOutcome::Submitted(record) => {
            io::print_success(format!("Order submitted. Reference {}.", record.reference));
            io::print_info(format!(
                "  {} line items, status {}",
                record.items.len(),
                record.status
            ));
            if let Some(distance) = record.distance {
                io::print_info(format!("  Distance {} km", distance));
            }
            if as_json {
                output_block(serde_json::to_string_pretty(&record)?);
            }
        }
    }
    Ok(())
}

fn cmd_panel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let panel = args.first().and_then(|raw| parse_panel(raw)).ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: panel <pickup-address|pickup-contacts|drop-address|drop-contacts|items|custom-item>"
                .into(),
        )
    })?;
    let controller = context.controller_mut()?;
    controller.toggle_panel(panel);
    match controller.open_panel() {
        Some(open) => io::print_info(format!("Open section: {}", panel_slug(open))),
        None => io::print_info("All sections closed."),
    }
    Ok(())
}

fn parse_panel(raw: &str) -> Option<Panel> {
    let panel = match raw.trim().to_ascii_lowercase().as_str() {
        "pickup-address" => Panel::PickupAddress,
        "pickup-contacts" => Panel::PickupContacts,
        "drop-address" | "dropoff-address" => Panel::DropAddress,
        "drop-contacts" | "dropoff-contacts" => Panel::DropContacts,
        "items" => Panel::Items,
        "custom-item" | "custom" => Panel::CustomItem,
        _ => return None,
    };
    Some(panel)
}

fn panel_slug(panel: Panel) -> &'static str {
    match panel {
        Panel::PickupAddress => "pickup-address",
        Panel::PickupContacts => "pickup-contacts",
        Panel::DropAddress => "drop-address",
        Panel::DropContacts => "drop-contacts",
        Panel::Items => "items",
        Panel::CustomItem => "custom-item",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;

    #[test]
    fn goto_skips_validation() {
        let context = process_script(&["login", "goto items"]).unwrap();
        assert_eq!(context.controller().unwrap().step(), Step::Items);

        let context = process_script(&["login", "goto items", "back"]).unwrap();
        assert_eq!(context.controller().unwrap().step(), Step::Consignee);
    }

    #[test]
    fn approved_reset_reopens_its_step() {
        let context =
            process_script(&["login", "goto items", "add Desk", "reset pickup -y"]).unwrap();
        let controller = context.controller().unwrap();
        assert_eq!(controller.step(), Step::Shipper);
        assert_eq!(controller.draft().total_items(), 1);
    }

    #[test]
    fn blocked_submit_keeps_the_draft() {
        let context = process_script(&["login", "add Desk", "submit"]).unwrap();
        assert_eq!(context.controller().unwrap().draft().total_items(), 1);
    }

    #[test]
    fn panel_names_round_trip() {
        for raw in [
            "pickup-address",
            "pickup-contacts",
            "drop-address",
            "drop-contacts",
            "items",
            "custom-item",
        ] {
            let panel = parse_panel(raw).unwrap();
            assert_eq!(panel_slug(panel), raw);
        }
    }
}
