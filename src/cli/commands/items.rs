use intake_core::CustomItemForm;
use intake_domain::{search_catalog, Category, DimensionUnit, Displayable, CATALOG};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const GROUP: &str = "Items";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("items", GROUP, "List the items in the order", "items", cmd_items),
        CommandEntry::new(
            "categories",
            GROUP,
            "List item categories",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "search",
            GROUP,
            "Search the item catalog",
            "search [text...]",
            cmd_search,
        ),
        CommandEntry::new(
            "add",
            GROUP,
            "Add one of a catalog item",
            "add <catalog item name>",
            cmd_add,
        ),
        CommandEntry::new("inc", GROUP, "Increase an item's quantity", "inc <item>", cmd_inc),
        CommandEntry::new(
            "dec",
            GROUP,
            "Decrease an item's quantity; at zero it is removed",
            "dec <item>",
            cmd_dec,
        ),
        CommandEntry::new(
            "qty",
            GROUP,
            "Set an item's quantity",
            "qty <item> <quantity>",
            cmd_qty,
        ),
        CommandEntry::new(
            "remove-item",
            GROUP,
            "Remove an item from the order",
            "remove-item <item>",
            cmd_remove_item,
        ),
        CommandEntry::new(
            "custom",
            GROUP,
            "Start describing an item that is not in the catalog",
            "custom [name...]",
            cmd_custom,
        ),
        CommandEntry::new(
            "custom-set",
            GROUP,
            "Fill in a custom item field",
            "custom-set <name|category|weight|length|width|height|unit|quantity|description> <value...>",
            cmd_custom_set,
        ),
        CommandEntry::new(
            "custom-save",
            GROUP,
            "Validate the custom item and add it",
            "custom-save",
            cmd_custom_save,
        ),
        CommandEntry::new(
            "custom-cancel",
            GROUP,
            "Discard the custom item",
            "custom-cancel",
            cmd_custom_cancel,
        ),
    ]
}

fn cmd_items(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let draft = context.controller()?.draft();
    if draft.items.is_empty() {
        io::print_info("No items added.");
        return Ok(());
    }
    output_section(format!("Items ({} total)", draft.total_items()));
    for item in &draft.items {
        io::print_info(format!("  {}", item.display_label()));
    }
    Ok(())
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for category in Category::ALL {
        let meta = category.meta();
        let count = CATALOG
            .iter()
            .filter(|entry| entry.category == category)
            .count();
        io::print_info(format!("  {:<12} {:<12} {} items", meta.slug, meta.label, count));
    }
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = args.join(" ");
    let results = search_catalog(&query);

    if results.match_count() == 0 {
        io::print_info(format!("No catalog items match `{}`.", query.trim()));
        if let Some(prefill) = results.custom_prefill {
            io::print_hint(format!("Use `custom` to add \"{}\" as a custom item.", prefill));
            context.pending_prefill = Some(prefill);
        }
        return Ok(());
    }

    context.pending_prefill = None;
    for group in &results.groups {
        io::print_info(format!("{}:", group.category));
        for entry in &group.items {
            io::print_info(format!(
                "  {:<18} {} ({}kg - {})",
                entry.name,
                entry.description,
                entry.weight,
                entry.dimensions()
            ));
        }
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = item_name(args, "add <catalog item name>")?;
    if context.controller_mut()?.select_catalog_item(&name)? {
        report_quantity(context, &name)
    } else {
        Err(CommandError::InvalidArguments(format!(
            "`{}` is not in the catalog. Try `search {}` or `custom {}`.",
            name, name, name
        )))
    }
}

fn cmd_inc(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = existing_item(context, args, "inc <item>")?;
    context.controller_mut()?.increment_item(&name)?;
    report_quantity(context, &name)
}

fn cmd_dec(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = existing_item(context, args, "dec <item>")?;
    context.controller_mut()?.decrement_item(&name)?;
    report_quantity(context, &name)
}

fn cmd_qty(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "qty <item> <quantity>";
    let (quantity, rest) = args
        .split_last()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    let quantity = quantity.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a quantity", quantity))
    })?;
    let name = existing_item(context, rest, usage)?;
    context.controller_mut()?.set_quantity(&name, quantity)?;
    report_quantity(context, &name)
}

fn cmd_remove_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = existing_item(context, args, "remove-item <item>")?;
    context.controller_mut()?.remove_item(&name)?;
    io::print_success(format!("Removed {}.", name));
    Ok(())
}

fn cmd_custom(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let prefill = if args.is_empty() {
        context.pending_prefill.take()
    } else {
        Some(args.join(" "))
    };
    let form = context.controller_mut()?.begin_custom_item(prefill).clone();
    print_form(&form);
    io::print_hint("Fill it in with `custom-set`, then `custom-save`.");
    Ok(())
}

fn cmd_custom_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "custom-set <field> <value...>";
    let (field, value) = match args {
        [field, rest @ ..] => (field.to_lowercase(), rest.join(" ")),
        [] => return Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    };
    let form = context
        .controller_mut()?
        .custom_item_mut()
        .ok_or_else(|| CommandError::Message("No custom item in progress. Use `custom`.".into()))?;
    set_field(form, &field, &value)?;
    Ok(())
}

fn cmd_custom_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let item = context.controller_mut()?.commit_custom_item()?;
    io::print_success(format!("Added {}.", item.display_label()));
    Ok(())
}

fn cmd_custom_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let controller = context.controller_mut()?;
    if controller.custom_item().is_none() {
        io::print_info("No custom item in progress.");
        return Ok(());
    }
    controller.cancel_custom_item();
    io::print_info("Custom item discarded.");
    Ok(())
}

fn set_field(form: &mut CustomItemForm, field: &str, value: &str) -> CommandResult {
    match field {
        "name" => form.name = value.to_string(),
        "category" => {
            let category = Category::from_slug(value).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown category `{}` (see `categories`)",
                    value
                ))
            })?;
            form.category = Some(category);
        }
        "weight" => form.weight = value.to_string(),
        "length" => form.length = value.to_string(),
        "width" => form.width = value.to_string(),
        "height" => form.height = value.to_string(),
        "unit" => {
            form.unit = DimensionUnit::parse(value).ok_or_else(|| {
                CommandError::InvalidArguments("unit must be one of mm, cm, m, in".into())
            })?;
        }
        "quantity" => form.quantity = value.to_string(),
        "description" => form.description = value.to_string(),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown custom item field `{}`",
                other
            )))
        }
    }
    Ok(())
}

fn print_form(form: &CustomItemForm) {
    output_section("Custom item");
    let category = form
        .category
        .map(|category| category.to_string())
        .unwrap_or_else(|| "Other".into());
    io::print_info(format!("  Name       : {}", form.name));
    io::print_info(format!("  Category   : {}", category));
    io::print_info(format!("  Weight (kg): {}", form.weight));
    io::print_info(format!(
        "  Dimensions : {} x {} x {} {}",
        form.length, form.width, form.height, form.unit
    ));
    io::print_info(format!("  Quantity   : {}", form.quantity));
    if !form.description.is_empty() {
        io::print_info(format!("  Notes      : {}", form.description));
    }
}

fn item_name(args: &[&str], usage: &str) -> Result<String, CommandError> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    Ok(name.trim().to_string())
}

/// Resolves the typed name against the draft, ignoring case.
fn existing_item(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<String, CommandError> {
    let name = item_name(args, usage)?;
    context
        .controller()?
        .draft()
        .items
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(&name))
        .map(|item| item.name.clone())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{}` is not in the order", name)))
}

fn report_quantity(context: &ShellContext, name: &str) -> CommandResult {
    let quantity = context
        .controller()?
        .draft()
        .items
        .iter()
        .find(|item| item.name == name)
        .map(|item| item.quantity);
    match quantity {
        Some(quantity) => io::print_success(format!("{} x {}", quantity, name)),
        None => io::print_success(format!("Removed {}.", name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;

    #[test]
    fn decrement_to_zero_removes_the_item() {
        let context = process_script(&["login", "add Desk", "inc desk", "dec Desk", "dec Desk"])
            .unwrap();
        assert!(context.controller().unwrap().draft().items.is_empty());
    }

    #[test]
    fn qty_sets_an_absolute_quantity() {
        let context = process_script(&["login", "add \"Dining Chair\"", "qty dining chair 6"])
            .unwrap();
        assert_eq!(context.controller().unwrap().draft().items[0].quantity, 6);
    }

    #[test]
    fn failed_search_prefills_the_custom_item() {
        let context = process_script(&[
            "login",
            "search Grand Piano",
            "custom",
            "custom-set category other",
            "custom-set weight 300",
            "custom-set length 150",
            "custom-set width 160",
            "custom-set height 100",
            "custom-save",
        ])
        .unwrap();
        let items = &context.controller().unwrap().draft().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Grand Piano");
        assert_eq!(items[0].weight, Some(300.0));
    }

    #[test]
    fn invalid_custom_item_stays_open() {
        let context = process_script(&["login", "custom Piano", "custom-save"]).unwrap();
        let controller = context.controller().unwrap();
        assert!(controller.draft().items.is_empty());
        assert_eq!(
            controller.custom_item().map(|form| form.name.as_str()),
            Some("Piano")
        );
    }

    #[test]
    fn unknown_custom_field_is_rejected() {
        let mut form = CustomItemForm::new();
        assert!(set_field(&mut form, "colour", "red").is_err());
        set_field(&mut form, "unit", "in").unwrap();
        assert_eq!(form.unit, DimensionUnit::Inch);
    }
}
