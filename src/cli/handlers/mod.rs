mod init;
pub use init::cmd_init;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::gateway::Gateway;
use crate::io::mirror::{self, Mirror, MirrorNotice};
use crate::io::storage::FileStorage;
use crate::io::transfer;
use crate::model::config::AppConfig;
use crate::model::entries::TRACKED_DAYS;
use crate::model::snapshot::TrackerData;
use crate::model::user::UserProfile;
use crate::ops::editor::{CategoryPatch, EditSession, ResetOutcome};
use crate::ops::session::Session;

const NO_USER: &str = "no active user (run `ibadah init <name>` first)";

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let data_dir = config_io::data_dir(cli.data_dir.as_deref().map(Path::new));
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    if let Commands::Init(args) = cli.command {
        return cmd_init(args, &data_dir);
    }

    let mut ctx = Context::open(&data_dir);
    match cli.command {
        Commands::Init(_) => Ok(()),
        Commands::User(args) => cmd_user(&mut ctx, args, json),
        Commands::Show(args) => cmd_show(&ctx, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut ctx, args, json),
        Commands::Stats => cmd_stats(&ctx, json),
        Commands::Cat(args) => cmd_cat(&mut ctx, args),
        Commands::Item(args) => cmd_item(&mut ctx, args),
        Commands::Reset(args) => cmd_reset(&mut ctx, args),
        Commands::Collapse(args) => cmd_collapse(&mut ctx, args),
        Commands::Export(args) => cmd_export(&ctx, args),
        Commands::Import(args) => cmd_import(&mut ctx, args),
        Commands::Colors => cmd_colors(&ctx, json),
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

struct Context {
    data_dir: PathBuf,
    config: AppConfig,
    session: Session<FileStorage>,
    mirror: Box<dyn Mirror>,
}

impl Context {
    fn open(data_dir: &Path) -> Self {
        let config = config_io::load_config(data_dir);
        let mirror = mirror::from_config(data_dir, &config.mirror);
        let session = Session::open(Gateway::new(FileStorage::new(data_dir)));
        Context {
            data_dir: data_dir.to_path_buf(),
            config,
            session,
            mirror,
        }
    }

    fn style(&self) -> Style {
        Style {
            color: self.config.display.color && std::io::stdout().is_terminal(),
            show_sub_items: self.config.display.show_sub_items,
        }
    }

    fn notify(&mut self, notices: &[MirrorNotice]) {
        mirror::dispatch(self.mirror.as_mut(), notices);
    }

    fn require_user(&self) -> Result<(&UserProfile, &TrackerData), Box<dyn std::error::Error>> {
        match (self.session.profile(), self.session.data()) {
            (Some(profile), Some(data)) => Ok((profile, data)),
            _ => Err(NO_USER.into()),
        }
    }

    /// Run one edit against the active snapshot and persist it if anything
    /// changed
    fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut EditSession) -> Result<T, String>,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let mut edit = self.session.begin_edit().ok_or(NO_USER)?;
        let out = f(&mut edit)?;
        if edit.is_dirty() {
            self.session.commit_edit(&edit)?;
        }
        Ok(out)
    }
}

fn check_day(day: u32) -> Result<u32, String> {
    if (1..=TRACKED_DAYS).contains(&day) {
        Ok(day)
    } else {
        Err(format!("day must be between 1 and {}, got {}", TRACKED_DAYS, day))
    }
}

fn has_category(edit: &EditSession, id: &str) -> Result<(), String> {
    if edit.categories().iter().any(|c| c.id == id) {
        Ok(())
    } else {
        Err(format!("category not found: {}", id))
    }
}

fn has_item(edit: &EditSession, id: &str) -> Result<(), String> {
    if edit.items().iter().any(|i| i.id == id) {
        Ok(())
    } else {
        Err(format!("item not found: {}", id))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn cmd_user(ctx: &mut Context, args: UserCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        UserAction::List => {
            let users = ctx.session.gateway().list_users();
            let active = ctx.session.profile().map(|p| p.id.as_str());
            if json {
                let out: Vec<UserJson> = users.iter().map(|u| user_to_json(u, active)).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if users.is_empty() {
                println!("no users");
            } else {
                for user in &users {
                    println!("{}", format_user_line(user, active == Some(user.id.as_str())));
                }
            }
            Ok(())
        }
        UserAction::Add(args) => {
            if args.name.trim().is_empty() {
                return Err("user name cannot be empty".into());
            }
            let (user, notices) = ctx.session.create_user(&args.name);
            ctx.notify(&notices);
            if json {
                println!("{}", serde_json::to_string_pretty(&user_to_json(&user, Some(user.id.as_str())))?);
            } else {
                println!("{}", user.id);
            }
            Ok(())
        }
        UserAction::Rename(args) => {
            if args.name.trim().is_empty() {
                return Err("user name cannot be empty".into());
            }
            let (renamed, notices) = match &args.id {
                Some(id) => ctx.session.rename_user(id, &args.name),
                None => {
                    ctx.require_user()?;
                    ctx.session.rename_active_user(&args.name)
                }
            };
            if !renamed {
                return Err(format!("user not found: {}", args.id.unwrap_or_default()).into());
            }
            ctx.notify(&notices);
            Ok(())
        }
        UserAction::Rm(args) => {
            let notices = ctx.session.delete_user(&args.id);
            if notices.is_empty() {
                return Err(format!("user not found: {}", args.id).into());
            }
            ctx.notify(&notices);
            match ctx.session.profile() {
                Some(next) => println!("deleted {}; active user: {} ({})", args.id, next.name, next.id),
                None => println!("deleted {}; no users left", args.id),
            }
            Ok(())
        }
        UserAction::Switch(args) => {
            if !ctx.session.switch_user(&args.id) {
                return Err(format!("user not found: {}", args.id).into());
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let day = args.day.map(check_day).transpose()?;
    let (profile, data) = ctx.require_user()?;
    let view = ctx.session.gateway().view_state();

    if json {
        let out = show_to_json(data, profile, &view, day);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let lines = match day {
        Some(day) => format_day_checklist(data, &view, day, ctx.style()),
        None => format_grid(data, &view, ctx.style()),
    };
    for line in &lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_toggle(ctx: &mut Context, args: ToggleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let day = check_day(args.day)?;
    let (_, data) = ctx.require_user()?;
    let name = data
        .find_item(&args.item)
        .map(|i| i.name.clone())
        .ok_or_else(|| format!("item not found: {}", args.item))?;

    let checked = ctx.session.toggle(day, &args.item).ok_or(NO_USER)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "day": day, "item": args.item, "checked": checked })
        );
    } else {
        println!("{} {} (day {})", if checked { "[x]" } else { "[ ]" }, name, day);
    }
    Ok(())
}

fn cmd_stats(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, data) = ctx.require_user()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(data))?);
    } else {
        for line in format_stats(data, ctx.style()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_collapse(ctx: &mut Context, args: CollapseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, data) = ctx.require_user()?;
    if data.find_category(&args.category).is_none() {
        return Err(format!("category not found: {}", args.category).into());
    }
    let gateway = ctx.session.gateway_mut();
    let mut view = gateway.view_state();
    let collapsed = view.toggle_collapsed(&args.category);
    gateway.save_view_state(&view);
    println!(
        "{} {}",
        if collapsed { "collapsed" } else { "expanded" },
        args.category
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

fn cmd_cat(ctx: &mut Context, args: CatCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        CatAction::Add(args) => {
            let color = args.color.as_deref().map(parse_color).transpose()?;
            let id = ctx.edit(|e| {
                let id = e.add_category(args.name.as_deref());
                if color.is_some() {
                    e.update_category(&id, CategoryPatch { name: None, color });
                }
                Ok(id)
            })?;
            println!("{}", id);
        }
        CatAction::Rename(args) => ctx.edit(|e| {
            has_category(e, &args.id)?;
            e.update_category(
                &args.id,
                CategoryPatch {
                    name: Some(args.name),
                    color: None,
                },
            );
            Ok(())
        })?,
        CatAction::Color(args) => {
            let color = parse_color(&args.color)?;
            ctx.edit(|e| {
                has_category(e, &args.id)?;
                e.update_category(
                    &args.id,
                    CategoryPatch {
                        name: None,
                        color: Some(color),
                    },
                );
                Ok(())
            })?
        }
        CatAction::Rm(args) => {
            ctx.edit(|e| {
                has_category(e, &args.id)?;
                e.delete_category(&args.id);
                Ok(())
            })?;
            let gateway = ctx.session.gateway_mut();
            let mut view = gateway.view_state();
            if view.is_collapsed(&args.id) {
                view.retain_categories(|id| id != args.id);
                gateway.save_view_state(&view);
            }
        }
        CatAction::Up(args) => ctx.edit(|e| {
            has_category(e, &args.id)?;
            e.move_category_up(&args.id);
            Ok(())
        })?,
        CatAction::Down(args) => ctx.edit(|e| {
            has_category(e, &args.id)?;
            e.move_category_down(&args.id);
            Ok(())
        })?,
    }
    Ok(())
}

fn cmd_item(ctx: &mut Context, args: ItemCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ItemAction::Add(args) => {
            let id = ctx.edit(|e| {
                e.add_item(&args.category, args.name.as_deref())
                    .ok_or_else(|| format!("category not found: {}", args.category))
            })?;
            println!("{}", id);
        }
        ItemAction::Sub(args) => {
            let id = ctx.edit(|e| {
                has_item(e, &args.parent)?;
                e.add_sub_item(&args.parent, args.name.as_deref())
                    .ok_or_else(|| format!("{} is already a sub-item", args.parent))
            })?;
            println!("{}", id);
        }
        ItemAction::Rename(args) => ctx.edit(|e| {
            has_item(e, &args.id)?;
            e.rename_item(&args.id, &args.name);
            Ok(())
        })?,
        ItemAction::Rm(args) => ctx.edit(|e| {
            has_item(e, &args.id)?;
            e.delete_item(&args.id);
            Ok(())
        })?,
        ItemAction::Up(args) => ctx.edit(|e| {
            has_item(e, &args.id)?;
            e.move_item_up(&args.id);
            Ok(())
        })?,
        ItemAction::Down(args) => ctx.edit(|e| {
            has_item(e, &args.id)?;
            e.move_item_down(&args.id);
            Ok(())
        })?,
    }
    Ok(())
}

fn cmd_reset(ctx: &mut Context, args: ResetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = ctx.edit(|e| {
        let mut outcome = e.request_reset();
        if args.yes {
            outcome = e.request_reset();
        }
        Ok(outcome)
    })?;
    match outcome {
        ResetOutcome::Armed => {
            println!("nothing changed; run `ibadah reset --yes` to restore the built-in checklist");
            println!("(every category and item is replaced and completions for removed items are deleted)");
        }
        ResetOutcome::Reset => println!("restored the built-in checklist"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

fn cmd_export(ctx: &Context, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (profile, _) = ctx.require_user()?;
    let text = ctx.session.export().ok_or(NO_USER)??;

    match args.out {
        None => println!("{}", text),
        Some(out) => {
            let mut path = PathBuf::from(out);
            if path.is_dir() {
                path = path.join(transfer::export_file_name(&profile.name, chrono::Utc::now()));
            }
            fs::write(&path, text + "\n")
                .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn cmd_import(ctx: &mut Context, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_user()?;
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let imported = ctx.session.import(&text)?.ok_or(NO_USER)?;
    println!(
        "imported {} categories, {} items{}",
        imported.data.categories.len(),
        imported.data.items.len(),
        if imported.user_name.is_empty() {
            String::new()
        } else {
            format!(" (exported by {})", imported.user_name)
        }
    );
    tracing::debug!(dir = %ctx.data_dir.display(), "import applied");
    Ok(())
}

fn cmd_colors(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&colors_to_json())?);
    } else {
        for line in format_colors(ctx.style().color) {
            println!("{}", line);
        }
    }
    Ok(())
}
