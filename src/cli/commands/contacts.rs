use intake_core::validate_contact;
use intake_domain::{Contact, ContactType, Displayable};

use super::parse_side;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const GROUP: &str = "Contacts";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "contacts",
            GROUP,
            "List the contacts for one side",
            "contacts <pickup|drop>",
            cmd_contacts,
        ),
        CommandEntry::new(
            "contact-add",
            GROUP,
            "Add a contact; the first one on a side is primary",
            "contact-add <pickup|drop> <name> <phone> <email>",
            cmd_contact_add,
        ),
        CommandEntry::new(
            "contact-remove",
            GROUP,
            "Remove a contact by its list number",
            "contact-remove <pickup|drop> <number>",
            cmd_contact_remove,
        ),
    ]
}

fn cmd_contacts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let side = parse_side(args, "contacts <pickup|drop>")?;
    let contacts = context.controller()?.draft().contacts(side);
    if contacts.is_empty() {
        io::print_info(format!("No {} contacts yet.", side));
        return Ok(());
    }
    for (index, contact) in contacts.iter().enumerate() {
        io::print_info(format!("{:>2}. {}", index + 1, contact.display_label()));
    }
    Ok(())
}

fn cmd_contact_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "contact-add <pickup|drop> <name> <phone> <email>";
    let side = parse_side(args, usage)?;
    let [_, name, phone, email] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    };

    let contact = Contact::new(*name, *phone, *email, ContactType::Primary);
    let contact = validate_contact(&contact)
        .map_err(|errors| CommandError::Validation(errors.messages()))?;
    let label = contact.name.clone();
    context.controller_mut()?.add_contact(side, contact)?;

    let added = context
        .controller()?
        .draft()
        .contacts(side)
        .last()
        .map(|contact| contact.kind)
        .unwrap_or_default();
    io::print_success(format!("Added {} as {} {} contact.", label, added, side));
    Ok(())
}

fn cmd_contact_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "contact-remove <pickup|drop> <number>";
    let side = parse_side(args, usage)?;
    let number = args
        .get(1)
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|number| *number >= 1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;

    let count = context.controller()?.draft().contacts(side).len();
    if number > count {
        return Err(CommandError::InvalidArguments(format!(
            "there is no {} contact #{}",
            side, number
        )));
    }
    context.controller_mut()?.remove_contact(side, number - 1)?;
    io::print_success(format!("Removed {} contact #{}.", side, number));
    Ok(())
}
