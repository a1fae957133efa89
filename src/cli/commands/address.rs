use chrono::NaiveDateTime;
use intake_core::{describe_address, AddressSource};
use intake_domain::{Address, AddressSide, PropertyType};

use super::{parse_bool, parse_side};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const GROUP: &str = "Addresses";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "address",
            GROUP,
            "Look up and set an address, or show it",
            "address <pickup|drop> [text...]",
            cmd_address,
        ),
        CommandEntry::new(
            "property",
            GROUP,
            "Set the property type",
            "property <pickup|drop> <single|multi>",
            cmd_property,
        ),
        CommandEntry::new(
            "unit",
            GROUP,
            "Set the unit number of a multi-unit property",
            "unit <pickup|drop> <number|none>",
            cmd_unit,
        ),
        CommandEntry::new(
            "level",
            GROUP,
            "Set the level, counting the ground floor as 1",
            "level <pickup|drop> <number|none>",
            cmd_level,
        ),
        CommandEntry::new(
            "lift",
            GROUP,
            "Record whether a lift is available",
            "lift <pickup|drop> <yes|no|unset>",
            cmd_lift,
        ),
        CommandEntry::new(
            "driveway",
            GROUP,
            "Record whether a driveway is available",
            "driveway <pickup|drop> <yes|no>",
            cmd_driveway,
        ),
        CommandEntry::new(
            "notes",
            GROUP,
            "Set access notes; no text clears them",
            "notes <pickup|drop> [text...]",
            cmd_notes,
        ),
        CommandEntry::new(
            "pickup-time",
            GROUP,
            "Set the pickup date and time",
            "pickup-time <YYYY-MM-DD> <HH:MM>",
            cmd_pickup_time,
        ),
    ]
}

fn cmd_address(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let side = parse_side(args, "address <pickup|drop> [text...]")?;
    let text = args[1..].join(" ");

    if text.trim().is_empty() {
        let address = context.controller()?.draft().address(side);
        for line in describe_address(address) {
            io::print_info(line);
        }
        return Ok(());
    }

    let dashboard = context.dashboard.as_mut().ok_or(CommandError::NotSignedIn)?;
    let controller = dashboard.controller_mut();
    let source = controller.lookup_address(side, context.provider.as_ref(), &text)?;
    let address = controller.draft().address(side);

    match source {
        AddressSource::Provider => io::print_success(format!(
            "{} address set to {}.",
            side_label(side),
            address.formatted_address
        )),
        AddressSource::Manual => {
            io::print_info(format!(
                "No known place matched; {} address saved as typed.",
                side
            ));
        }
        AddressSource::ProviderUnavailable => {
            io::print_info(format!("{} address saved as typed.", side_label(side)));
        }
    }
    if controller.draft().distance > 0.0 {
        io::print_info(format!("Trip distance: {} km", controller.draft().distance));
    }
    Ok(())
}

fn cmd_property(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "property <pickup|drop> <single|multi>";
    let side = parse_side(args, usage)?;
    let property_type = args
        .get(1)
        .and_then(|raw| PropertyType::parse(raw))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    edit(context, side, |address| address.with_property_type(property_type))
}

fn cmd_unit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let side = parse_side(args, "unit <pickup|drop> <number|none>")?;
    let unit = args
        .get(1)
        .filter(|raw| !raw.eq_ignore_ascii_case("none"))
        .map(|raw| raw.to_string());
    edit(context, side, |address| address.with_unit_number(unit))
}

fn cmd_level(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "level <pickup|drop> <number|none>";
    let side = parse_side(args, usage)?;
    let level = match args.get(1) {
        None => return Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
        Some(raw) if raw.eq_ignore_ascii_case("none") => None,
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a level number", raw))
        })?),
    };
    edit(context, side, |address| address.with_level(level))?;

    let address = context.controller()?.draft().address(side);
    if address.needs_lift_answer() && address.has_lift.is_none() {
        io::print_hint(format!("Use `lift {} yes|no` for levels above the ground floor.", side));
    }
    Ok(())
}

fn cmd_lift(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "lift <pickup|drop> <yes|no|unset>";
    let side = parse_side(args, usage)?;
    let answer = match args.get(1) {
        Some(raw) if raw.eq_ignore_ascii_case("unset") => None,
        Some(raw) => Some(
            parse_bool(raw)
                .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?,
        ),
        None => return Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    };
    edit(context, side, |address| address.with_lift(answer))
}

fn cmd_driveway(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "driveway <pickup|drop> <yes|no>";
    let side = parse_side(args, usage)?;
    let answer = args
        .get(1)
        .and_then(|raw| parse_bool(raw))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    edit(context, side, |address| address.with_driveway(answer))
}

fn cmd_notes(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let side = parse_side(args, "notes <pickup|drop> [text...]")?;
    let notes = Some(args[1..].join(" "));
    edit(context, side, |address| address.with_notes(notes))
}

fn cmd_pickup_time(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let when = parse_date_time(&args.join(" "))?;
    edit(context, AddressSide::Pickup, |address| {
        address.with_pickup_date_time(Some(when))
    })
}

fn edit<F>(context: &mut ShellContext, side: AddressSide, change: F) -> CommandResult
where
    F: FnOnce(Address) -> Address,
{
    context.controller_mut()?.update_address(side, change)?;
    io::print_success(format!("{} address updated.", side_label(side)));
    Ok(())
}

pub(crate) fn parse_date_time(input: &str) -> Result<NaiveDateTime, CommandError> {
    let trimmed = input.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "invalid date and time `{}` (use YYYY-MM-DD HH:MM)",
                trimmed
            ))
        })
}

fn side_label(side: AddressSide) -> &'static str {
    match side {
        AddressSide::Pickup => "Pickup",
        AddressSide::Drop => "Drop",
    }
}
