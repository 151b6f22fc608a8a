use std::str::FromStr;

use dialoguer::Select;

use crate::cli::core::{report_close, CommandError, CommandResult};
use crate::cli::output::{self, field_line, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::core::CommitOutcome;
use crate::domain::{Displayable, Field, NomenclatureType};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("show", "Show the current field values", "show", cmd_show),
        CommandEntry::new(
            "set",
            "Edit a field (empty value clears optional fields)",
            "set <field> [value]",
            cmd_set,
        ),
        CommandEntry::new(
            "article",
            "Enter an article code, or show the linked article",
            "article [code]",
            cmd_article,
        ),
        CommandEntry::new(
            "pick",
            "Choose the article from the catalog",
            "pick [code]",
            cmd_pick,
        ),
        CommandEntry::new(
            "type",
            "Set the nomenclature type and derive its classification",
            "type <n>",
            cmd_type,
        ),
        CommandEntry::new(
            "validate",
            "Check the mandatory fields",
            "validate",
            cmd_validate,
        ),
        CommandEntry::new("save", "Save the nomenclature", "save", cmd_save),
        CommandEntry::new("ok", "Save pending changes and close", "ok", cmd_ok),
        CommandEntry::new(
            "close",
            "Close, asking to save pending changes",
            "close",
            cmd_close,
        )
        .with_aliases(&["quit", "exit"]),
    ]
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    let state = if session.is_dirty() {
        "modifiée"
    } else {
        "enregistrée"
    };
    output_section(format!(
        "Nomenclature {} ({}, {})",
        session.key(),
        session.effective_mode(),
        state
    ));

    let width = Field::ALL
        .iter()
        .map(|field| field.label().chars().count())
        .max()
        .unwrap_or(0);
    let values = session.values();
    for field in Field::ALL {
        let value = values.display(field);
        let note = match field {
            Field::ArticleCode => session.article_labels().map(|labels| labels.display_label()),
            _ if session.is_locked(field) => Some("lecture seule".to_string()),
            _ => None,
        };
        println!(
            "{}",
            field_line(field.label(), &value, note.as_deref(), width)
        );
    }
    if let Some(saved_at) = session.last_saved_at() {
        output::info(format!("Dernier enregistrement : {}", saved_at.to_rfc3339()));
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((name, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: set <field> [value]".into(),
        ));
    };
    let field =
        Field::from_str(name).map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let value = rest.join(" ");

    if field == Field::ArticleCode {
        return enter_article(context, &value);
    }
    context.session.edit_text(field, &value)?;
    if field == Field::Type {
        announce_classification(context);
    }
    Ok(())
}

fn cmd_article(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        match context.session.article_labels() {
            Some(labels) => output::info(labels.display_label()),
            None => output::info("Aucun article associé."),
        }
        return Ok(());
    }
    enter_article(context, &args.join(" "))
}

/// Types the code into the article field, then leaves it.
fn enter_article(context: &mut ShellContext, code: &str) -> CommandResult {
    if !context.session.is_locked(Field::ArticleCode) {
        context.session.edit_text(Field::ArticleCode, code)?;
    }
    let outcome = context.session.on_article_code_committed(code)?;
    report_commit(outcome);
    Ok(())
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let selection = match args.first() {
        Some(code) => Some(code.to_string()),
        None => choose_article(context)?,
    };
    let Some(selection) = selection else {
        return Ok(());
    };
    let outcome = context.session.on_article_picked(&selection)?;
    report_commit(outcome);
    Ok(())
}

fn choose_article(context: &mut ShellContext) -> Result<Option<String>, CommandError> {
    if context.session.lookup().is_empty() {
        output::warning("Le catalogue d'articles est vide.");
        return Ok(None);
    }
    let entries: Vec<(String, String)> = context
        .session
        .lookup()
        .entries()
        .map(|(code, labels)| (code.to_string(), labels.display_label()))
        .collect();
    if context.mode == CliMode::Script {
        output_section("Articles");
        let width = entries
            .iter()
            .map(|(code, _)| code.chars().count())
            .max()
            .unwrap_or(0);
        for (code, label) in &entries {
            println!("{}", field_line(code, label, None, width));
        }
        return Err(CommandError::InvalidArguments(
            "usage: pick <code> in script mode".into(),
        ));
    }

    let items: Vec<String> = entries
        .iter()
        .map(|(code, label)| format!("{}  {}", code, label))
        .collect();
    let choice = Select::with_theme(&context.theme)
        .with_prompt("Article")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.and_then(|index| entries.get(index).map(|(code, _)| code.clone())))
}

fn cmd_type(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: type <n>".into()));
    };
    let value = raw.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("type must be a number, got `{}`", raw))
    })?;
    if !NomenclatureType::new(value).is_known() {
        output::warning(format!("Type {} inconnu, classification par défaut.", value));
    }
    context.session.on_type_changed(value)?;
    announce_classification(context);
    Ok(())
}

fn cmd_validate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context
        .session
        .validate()
        .map_err(|err| CommandError::Editor(err.into()))?;
    output::success("Saisie complète.");
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.save()?;
    output::success(format!("Nomenclature {} enregistrée.", context.session.key()));
    Ok(())
}

fn cmd_ok(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.session.confirm()?;
    report_close(outcome);
    context.running = false;
    Err(CommandError::ExitRequested)
}

fn cmd_close(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.close_session()?;
    Err(CommandError::ExitRequested)
}

fn report_commit(outcome: CommitOutcome) {
    match outcome {
        CommitOutcome::Skipped => {}
        CommitOutcome::Resolved(labels) => {
            output::success(format!("Article : {}", labels.display_label()))
        }
    }
}

fn announce_classification(context: &mut ShellContext) {
    if let Some(code) = context.session.values().classification {
        output::info(format!("Code de classification : {}", code));
    }
    if let Some(field) = context.session.take_focus() {
        output::info(format!("Vérifiez le champ {}.", field));
    }
}
