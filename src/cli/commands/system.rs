use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output::{self, field_line, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::config::SCREEN_NAME;
use crate::storage::STORE_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("topic", "Show the help note of this screen", "topic", cmd_topic),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
    ]
}

fn cmd_topic(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let topic = context.config.help_topic(SCREEN_NAME);
    if topic.is_empty() {
        output::info("Aucune note d'aide pour cette fenêtre.");
    } else {
        output_section("Note d'aide");
        println!("{}", topic);
    }
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Nomenclature editor {}", meta.version));
    output::info(format!("  Store schema : v{}", STORE_SCHEMA_VERSION));
    output::info(format!("  Store file   : {}", context.session.store().path().display()));
    output::info(format!("  Locale       : {}", context.config.locale));
    output::info(format!(
        "  Config file  : {}",
        context.config_manager.path().display()
    ));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let Some(entry) = context.registry.get(&name.to_lowercase()) else {
            context.suggest_command(name);
            return Err(CommandError::InvalidArguments(format!(
                "No help for `{}`.",
                name
            )));
        };
        output_section(entry.name);
        println!("{}", entry.description);
        println!("Usage: {}", entry.usage);
        if !entry.aliases.is_empty() {
            println!("Aliases: {}", entry.aliases.join(", "));
        }
        return Ok(());
    }

    output_section("Commands");
    let entries = context.registry.list();
    let width = entries
        .iter()
        .map(|entry| entry.usage.chars().count())
        .max()
        .unwrap_or(0);
    for entry in entries {
        println!("{}", field_line(entry.usage, entry.description, None, width));
    }
    Ok(())
}
