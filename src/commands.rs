//! Command dispatch.
//!
//! Every command runs through [`Explorer::run`], so failures are logged (and, unless they
//! are plain input mistakes, appended to the error log) before they reach `main`.

use explorer_core::repositories::users::NewUser;
use explorer_core::{CodeRepository, CodeSystem, Explorer, ExplorerError, ExplorerResult};

use crate::cli::{AdminCommand, Cli, CodeCommand, Commands, UserCommand};
use crate::render;

pub fn dispatch(explorer: &mut Explorer, cli: &Cli) -> ExplorerResult<()> {
    let (user, password) = cli.credentials();

    match &cli.command {
        Commands::Init => {
            let config = explorer.config();
            println!("{}", explorer.settings().login_title);
            println!("config:     {}", config.config_path().display());
            println!("ICD-10:     {}", config.icd10_file().display());
            println!("CPT:        {}", config.cpt_file().display());
            println!("users:      {}", config.user_db_file().display());
            println!("settings:   {}", config.settings_file().display());
            println!("error log:  {}", config.error_log_file().display());
            println!("log file:   {}", config.log_file().display());
            Ok(())
        }
        Commands::Login => explorer.run("login", |e| {
            e.login(user, password)?;
            println!("{}", e.settings().login_title);
            if let Some(status) = e.session().status_line() {
                println!("{status}");
            }
            Ok(())
        }),
        Commands::Icd10 { action } => {
            explorer.run("login", |e| e.login(user, password).map(|_| ()))?;
            code_command(explorer, CodeSystem::Icd10, action)
        }
        Commands::Cpt { action } => {
            explorer.run("login", |e| e.login(user, password).map(|_| ()))?;
            code_command(explorer, CodeSystem::Cpt, action)
        }
        Commands::User { action } => user_command(explorer, cli, action),
        Commands::Admin { action } => {
            explorer.run("admin login", |e| e.admin_login(user, password))?;
            admin_command(explorer, action)
        }
    }
}

fn code_command(
    explorer: &mut Explorer,
    system: CodeSystem,
    action: &CodeCommand,
) -> ExplorerResult<()> {
    match action {
        CodeCommand::List => explorer.run("list codes", |e| {
            print!("{}", render::tree(system, &e.repository(system)?.tree()));
            Ok(())
        }),
        CodeCommand::Search { query } => explorer.run("search codes", |e| {
            print!("{}", render::tree(system, &e.repository(system)?.search(query)));
            Ok(())
        }),
        CodeCommand::Show { code } => explorer.run("show code", |e| {
            let repo = e.repository(system)?;
            let code = code.trim();
            let (category, description) =
                repo.lookup(code)
                    .ok_or_else(|| ExplorerError::CodeNotFound {
                        system,
                        code: code.to_owned(),
                    })?;
            print!("{}", render::details(system, &category, code, &description));
            Ok(())
        }),
        CodeCommand::Add {
            category,
            code,
            description,
        } => mutate(explorer, system, "add code", |repo| {
            repo.add_code(category, code, description)?;
            Ok(format!(
                "{} code {} added to {}.",
                system,
                code.trim(),
                category.trim()
            ))
        }),
        CodeCommand::AddCategory {
            name,
            code,
            description,
        } => {
            let seed = code.as_deref().zip(description.as_deref());
            mutate(explorer, system, "add category", |repo| {
                repo.add_category_with_code(name, seed)?;
                Ok(format!("Category {} added.", name.trim()))
            })
        }
        CodeCommand::Edit {
            code,
            new_code,
            new_description,
        } => mutate(explorer, system, "edit code", |repo| {
            let categories = repo.edit_code(code, new_code, new_description)?;
            Ok(format!(
                "{} code {} in {} updated.",
                system,
                code.trim(),
                categories.join(", ")
            ))
        }),
        CodeCommand::Delete { code } => mutate(explorer, system, "delete code", |repo| {
            let category = repo.delete_code(code)?;
            Ok(format!(
                "{} code {} deleted from {}.",
                system,
                code.trim(),
                category
            ))
        }),
        CodeCommand::DeleteCategory { name } => {
            mutate(explorer, system, "delete category", |repo| {
                repo.delete_category(name)?;
                Ok(format!("Category {} deleted.", name.trim()))
            })
        }
    }
}

/// Applies one change, then re-renders the tree from the in-memory document.
fn mutate(
    explorer: &mut Explorer,
    system: CodeSystem,
    action: &str,
    f: impl FnOnce(&mut dyn CodeRepository) -> ExplorerResult<String>,
) -> ExplorerResult<()> {
    explorer.run(action, |e| {
        let message = f(e.repository_mut(system)?)?;
        println!("{message}");
        print!("{}", render::tree(system, &e.repository(system)?.tree()));
        Ok(())
    })
}

fn user_command(explorer: &mut Explorer, cli: &Cli, action: &UserCommand) -> ExplorerResult<()> {
    let (user, password) = cli.credentials();

    if let UserCommand::Create {
        first_name,
        last_name,
        provider_type,
    } = action
    {
        return explorer.run("create account", |e| {
            let profile = e.create_account(NewUser {
                username: user,
                password,
                first_name,
                last_name,
                provider_type,
            })?;
            println!("Account {} created.", profile.username);
            Ok(())
        });
    }

    explorer.run("login", |e| e.login(user, password).map(|_| ()))?;
    match action {
        UserCommand::Create { .. } => Ok(()),
        UserCommand::List => explorer.run("list users", |e| {
            print!("{}", render::users(&e.list_users()?));
            Ok(())
        }),
        UserCommand::Remove { username } => explorer.run("remove user", |e| {
            e.remove_user(username)?;
            println!("User {} removed.", username.trim());
            Ok(())
        }),
        UserCommand::Passwd {
            username,
            new_password,
        } => explorer.run("change password", |e| {
            e.change_password(username, new_password)?;
            println!("Password for {} changed.", username.trim());
            Ok(())
        }),
    }
}

fn admin_command(explorer: &mut Explorer, action: &AdminCommand) -> ExplorerResult<()> {
    match action {
        AdminCommand::Show => explorer.run("show settings", |e| {
            print!("{}", render::settings(e.settings())?);
            Ok(())
        }),
        AdminCommand::SetTitle { title } => explorer.run("set login title", |e| {
            e.set_login_title(title)?;
            println!("Login title: {}", e.settings().login_title);
            Ok(())
        }),
        AdminCommand::Set { key, value } => explorer.run("update setting", |e| {
            e.update_setting(key, parse_setting_value(value))?;
            print!("{}", render::settings(e.settings())?);
            Ok(())
        }),
        AdminCommand::ImportLogo { target, path } => explorer.run("import logo", |e| {
            e.import_logo((*target).into(), path)?;
            print!("{}", render::settings(e.settings())?);
            Ok(())
        }),
        AdminCommand::Errors => explorer.run("show error log", |e| {
            print!("{}", render::errors(&e.error_entries()?));
            Ok(())
        }),
    }
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()))
}
